//! Directional filter: keeps ensemble outliers that are upward spikes, drops cost decreases.

mod classifier;

pub use classifier::{ScoredRecord, SpikeClassifier, SpikeVerdict};
