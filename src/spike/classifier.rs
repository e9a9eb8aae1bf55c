//! Combines ensemble output with the record's direction of movement.

use crate::features::FeaturizedRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpikeVerdict {
    /// Not among the ensemble outliers
    Normal,
    /// Ensemble outlier, but cost fell or sat at/below its baseline
    Suppressed,
    /// Ensemble outlier above baseline and up from the previous observation
    Spike,
}

impl SpikeVerdict {
    pub fn from_record(record: &FeaturizedRecord, ensemble_flagged: bool) -> Self {
        if !ensemble_flagged {
            SpikeVerdict::Normal
        } else if record.cost_vs_rollmean > 0.0 && record.pct_change > 0.0 {
            SpikeVerdict::Spike
        } else {
            SpikeVerdict::Suppressed
        }
    }
}

/// Featurized record with its ensemble score and final decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub features: FeaturizedRecord,
    pub anomaly_score: f64,
    pub ensemble_flagged: bool,
    pub is_anomaly: bool,
}

impl ScoredRecord {
    pub fn verdict(&self) -> SpikeVerdict {
        SpikeVerdict::from_record(&self.features, self.ensemble_flagged)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpikeClassifier;

impl SpikeClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, features: FeaturizedRecord, anomaly_score: f64, ensemble_flagged: bool) -> ScoredRecord {
        let verdict = SpikeVerdict::from_record(&features, ensemble_flagged);
        ScoredRecord {
            features,
            anomaly_score,
            ensemble_flagged,
            is_anomaly: verdict == SpikeVerdict::Spike,
        }
    }

    /// Zip featurized records with their scores and flags, preserving order.
    pub fn classify_all(
        &self,
        records: Vec<FeaturizedRecord>,
        scores: &[f64],
        flags: &[bool],
    ) -> Vec<ScoredRecord> {
        records
            .into_iter()
            .zip(scores.iter().zip(flags))
            .map(|(f, (&score, &flagged))| self.classify(f, score, flagged))
            .collect()
    }
}
