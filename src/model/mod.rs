//! Isolation forest anomaly scoring. Trained on the batch it scores; no state survives a call.

mod forest;
mod tree;

pub use forest::{average_path_length, flag_above_quantile, quantile, FittedForest, IsolationForest, MIN_SAMPLES};
pub use tree::IsolationTree;
