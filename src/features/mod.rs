//! Calendar and per-service rolling features derived from normalized billing records.

mod pipeline;
mod rolling;

pub use pipeline::{feature_matrix, FeatureBuilder};
pub use rolling::{group_by_service, pct_changes, RollingWindow, ServiceGroups, WindowStats};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Width of the model input vector.
pub const FEATURE_DIM: usize = 7;

/// Column order of the model input vector.
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "cost",
    "day_of_week",
    "day_of_month",
    "month",
    "pct_change",
    "cost_vs_rollmean",
    "roll_std_filled",
];

/// A billing record plus every derived attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturizedRecord {
    pub date: NaiveDate,
    pub service: String,
    pub cost: f64,
    /// Monday = 0 … Sunday = 6
    pub day_of_week: u32,
    pub day_of_month: u32,
    pub month: u32,
    /// Undefined until the service has `min_periods` observations
    pub rolling_mean_7: Option<f64>,
    /// Sample standard deviation (ddof = 1) over the same window
    pub rolling_std_7: Option<f64>,
    pub pct_change: f64,
    pub cost_vs_rollmean: f64,
    pub roll_std_filled: f64,
}

impl FeaturizedRecord {
    /// Model input in [`FEATURE_NAMES`] order; non-finite values become 0.
    pub fn to_vector(&self) -> [f64; FEATURE_DIM] {
        let raw = [
            self.cost,
            f64::from(self.day_of_week),
            f64::from(self.day_of_month),
            f64::from(self.month),
            self.pct_change,
            self.cost_vs_rollmean,
            self.roll_std_filled,
        ];
        raw.map(|v| if v.is_finite() { v } else { 0.0 })
    }
}
