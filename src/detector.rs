//! End-to-end detection: normalize → featurize → score → classify → explain.

use crate::config::DetectorConfig;
use crate::error::{DetectError, Result};
use crate::explain::{Explainer, ExplanationSummary};
use crate::features::{feature_matrix, FeatureBuilder};
use crate::ingest::{normalize, RawTable, RecordSet};
use crate::model::{IsolationForest, MIN_SAMPLES};
use crate::spike::{ScoredRecord, SpikeClassifier};
use tracing::{debug, info};

/// Scored rows plus their explanation.
#[derive(Debug, Clone)]
pub struct DetectionRun {
    pub scored: Vec<ScoredRecord>,
    pub summary: ExplanationSummary,
}

pub struct SpikeDetector {
    config: DetectorConfig,
    features: FeatureBuilder,
    forest: IsolationForest,
    classifier: SpikeClassifier,
    explainer: Explainer,
}

impl SpikeDetector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            features: FeatureBuilder::new(&config.features),
            forest: IsolationForest::new(config.forest.clone()),
            classifier: SpikeClassifier::new(),
            explainer: Explainer::new(&config.explain),
            config,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Score every record; output is one row per input, in input order. Fails
    /// atomically: either the whole batch is scored or nothing is returned.
    pub fn detect(&self, records: &RecordSet) -> Result<Vec<ScoredRecord>> {
        if records.len() < MIN_SAMPLES {
            return Err(DetectError::InsufficientData {
                needed: MIN_SAMPLES,
                have: records.len(),
            });
        }

        let featurized = self.features.build(records.as_slice());
        let x = feature_matrix(&featurized);
        let fitted = self.forest.fit(x.view())?;
        let scores = fitted.score_samples(x.view());
        let flags = fitted.flag_outliers(&scores);
        let flagged = flags.iter().filter(|f| **f).count();

        let scored = self.classifier.classify_all(featurized, &scores, &flags);
        let spikes = scored.iter().filter(|r| r.is_anomaly).count();
        debug!(flagged, suppressed = flagged - spikes, "applied spike filter");
        info!(rows = scored.len(), spikes, "detection complete");
        Ok(scored)
    }

    pub fn explain(&self, scored: &[ScoredRecord]) -> ExplanationSummary {
        let summary = self.explainer.explain(scored);
        debug!(
            services = summary.top_services.len(),
            total = summary.total_anomalous_cost,
            "explained anomalies"
        );
        summary
    }

    pub fn run(&self, table: &RawTable) -> Result<DetectionRun> {
        let records = normalize(table)?;
        let scored = self.detect(&records)?;
        let summary = self.explain(&scored);
        Ok(DetectionRun { scored, summary })
    }
}

/// [`SpikeDetector::detect`] with default parameters.
pub fn detect(records: &RecordSet) -> Result<Vec<ScoredRecord>> {
    SpikeDetector::new(DetectorConfig::default())?.detect(records)
}

/// [`SpikeDetector::explain`] with default parameters.
pub fn explain(scored: &[ScoredRecord]) -> ExplanationSummary {
    Explainer::default().explain(scored)
}
