//! Feature pipeline: records → calendar fields + per-service rolling stats → model matrix.

use super::rolling::{group_by_service, pct_changes, RollingWindow, WindowStats};
use super::{FeaturizedRecord, FEATURE_DIM};
use crate::config::FeaturesConfig;
use crate::ingest::Record;
use chrono::Datelike;
use ndarray::Array2;

pub struct FeatureBuilder {
    window: RollingWindow,
}

impl FeatureBuilder {
    pub fn new(config: &FeaturesConfig) -> Self {
        Self {
            window: RollingWindow::new(config.window, config.min_periods),
        }
    }

    /// Featurize a (service, date)-sorted batch. Output has the same length and order.
    pub fn build(&self, records: &[Record]) -> Vec<FeaturizedRecord> {
        let n = records.len();
        let mut stats = vec![WindowStats::default(); n];
        let mut changes = vec![0.0; n];

        for indices in group_by_service(records).values() {
            let costs: Vec<f64> = indices.iter().map(|&i| records[i].cost).collect();
            let group_stats = self.window.stats(&costs);
            let group_changes = pct_changes(&costs);
            for (k, &i) in indices.iter().enumerate() {
                stats[i] = group_stats[k];
                changes[i] = group_changes[k];
            }
        }

        let out: Vec<FeaturizedRecord> = records
            .iter()
            .zip(stats)
            .zip(changes)
            .map(|((r, s), pct_change)| FeaturizedRecord {
                date: r.date,
                service: r.service.clone(),
                cost: r.cost,
                day_of_week: r.date.weekday().num_days_from_monday(),
                day_of_month: r.date.day(),
                month: r.date.month(),
                rolling_mean_7: s.mean,
                rolling_std_7: s.std,
                pct_change,
                cost_vs_rollmean: s.mean.map_or(0.0, |m| r.cost - m),
                roll_std_filled: s.std.unwrap_or(0.0),
            })
            .collect();

        tracing::debug!(
            records = n,
            window = self.window.size,
            min_periods = self.window.min_periods,
            "built features"
        );
        out
    }
}

/// Stack feature vectors into an N × [`FEATURE_DIM`] matrix.
pub fn feature_matrix(records: &[FeaturizedRecord]) -> Array2<f64> {
    let rows: Vec<[f64; FEATURE_DIM]> = records.iter().map(FeaturizedRecord::to_vector).collect();
    Array2::from_shape_fn((rows.len(), FEATURE_DIM), |(i, j)| rows[i][j])
}
