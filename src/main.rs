//! Spikewatch entrypoint: reads a billing CSV (path argument, or `-` / nothing for stdin),
//! writes each detected spike as an ndjson line followed by one summary line.

use spikewatch::{
    config::DetectorConfig,
    ingest::reader::read_csv,
    logging::StructuredLogger,
    report::{AnomalyPoint, SummaryResponse},
    SpikeDetector,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // An explicitly named config must load; the implicit ./config.json may fall back.
    let (config_path, config, fallback) = match std::env::var_os("SPIKEWATCH_CONFIG_PATH") {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = DetectorConfig::try_load(&path)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
            (path, config, None)
        }
        None => {
            let path = PathBuf::from("config.json");
            let (config, fallback) = DetectorConfig::load(&path);
            (path, config, fallback)
        }
    };

    StructuredLogger::init(config.log.json, &config.log.level);
    if let Some(e) = fallback {
        warn!(path = %config_path.display(), error = %e, "ignoring unusable config file, using defaults");
    }

    let input = std::env::args().nth(1).unwrap_or_else(|| "-".to_string());
    info!(input = %input, config = %config_path.display(), "spikewatch starting");

    let table = if input == "-" {
        read_csv(std::io::stdin().lock())?
    } else {
        read_csv(std::fs::File::open(&input)?)?
    };

    let detector = SpikeDetector::new(config)?;
    let run = detector.run(&table)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for r in run.scored.iter().filter(|r| r.is_anomaly) {
        StructuredLogger::emit_json(&AnomalyPoint::from(r), &mut out)?;
    }
    StructuredLogger::emit_json(&SummaryResponse::new(&run.scored, run.summary), &mut out)?;
    out.flush()?;

    Ok(())
}
