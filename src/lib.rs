//! Spikewatch: cloud cost spike detection over daily billing records.
//!
//! Modular structure:
//! - [`ingest`] — Raw tabular payload → typed, (service, date)-sorted records
//! - [`features`] — Calendar fields and per-service rolling statistics
//! - [`model`] — Isolation forest anomaly scoring
//! - [`spike`] — Directional filter: spend increases only
//! - [`explain`] — Ranked summary of anomalous spend
//! - [`detector`] — End-to-end pipeline
//! - [`report`] — Response shapes for the serving layer
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod ingest;
pub mod features;
pub mod model;
pub mod spike;
pub mod explain;
pub mod detector;
pub mod report;
pub mod logging;

pub use config::DetectorConfig;
pub use error::{DetectError, Result};
pub use ingest::{normalize, RawTable, RawValue, Record, RecordSet};
pub use features::{FeatureBuilder, FeaturizedRecord};
pub use model::IsolationForest;
pub use spike::{ScoredRecord, SpikeClassifier};
pub use explain::{Explainer, ExplanationSummary, ServiceCost};
pub use detector::{detect, explain, DetectionRun, SpikeDetector};
pub use logging::StructuredLogger;
