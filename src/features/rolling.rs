//! Per-service grouping and trailing count-based window statistics.

use crate::ingest::Record;
use std::collections::BTreeMap;

/// Service identifier → indices of its records, in input order.
pub type ServiceGroups<'a> = BTreeMap<&'a str, Vec<usize>>;

/// Single grouping pass over the batch. With a sorted record set each index list is
/// in date order, so every window below only looks backwards in time.
pub fn group_by_service(records: &[Record]) -> ServiceGroups<'_> {
    let mut groups: ServiceGroups<'_> = BTreeMap::new();
    for (i, r) in records.iter().enumerate() {
        groups.entry(r.service.as_str()).or_default().push(i);
    }
    groups
}

/// Trailing window over the last `size` observations, defined once `min_periods` exist.
#[derive(Debug, Clone, Copy)]
pub struct RollingWindow {
    pub size: usize,
    pub min_periods: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowStats {
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

impl RollingWindow {
    pub fn new(size: usize, min_periods: usize) -> Self {
        Self { size, min_periods }
    }

    /// Statistics of the window ending at (and including) `values[end]`.
    pub fn stats_at(&self, values: &[f64], end: usize) -> WindowStats {
        let start = (end + 1).saturating_sub(self.size);
        let window = &values[start..=end];
        let n = window.len();
        if n < self.min_periods.max(1) {
            return WindowStats::default();
        }
        let mean = window.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let ss: f64 = window.iter().map(|v| (v - mean).powi(2)).sum();
            Some((ss / (n - 1) as f64).sqrt())
        } else {
            None
        };
        WindowStats {
            mean: Some(mean),
            std,
        }
    }

    pub fn stats(&self, values: &[f64]) -> Vec<WindowStats> {
        (0..values.len()).map(|i| self.stats_at(values, i)).collect()
    }
}

/// Fractional change vs. the previous observation; 0 for the first one or a zero prior.
pub fn pct_changes(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let change = match prev {
            Some(p) if p != 0.0 => (v - p) / p,
            _ => 0.0,
        };
        out.push(change);
        prev = Some(v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(day: u32, service: &str, cost: f64) -> Record {
        Record::new(NaiveDate::from_ymd_opt(2025, 1, day).unwrap(), service, cost)
    }

    #[test]
    fn groups_keep_record_order() {
        let records = vec![rec(1, "EC2", 1.0), rec(1, "S3", 2.0), rec(2, "EC2", 3.0)];
        let groups = group_by_service(&records);
        assert_eq!(groups["EC2"], vec![0, 2]);
        assert_eq!(groups["S3"], vec![1]);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["EC2", "S3"]);
    }

    #[test]
    fn window_needs_min_periods() {
        let w = RollingWindow::new(7, 3);
        let stats = w.stats(&[1.0, 2.0, 3.0]);
        assert_eq!(stats[0], WindowStats::default());
        assert_eq!(stats[1], WindowStats::default());
        assert_eq!(stats[2].mean, Some(2.0));
        assert_eq!(stats[2].std, Some(1.0));
    }

    #[test]
    fn window_is_count_based_and_trailing() {
        let w = RollingWindow::new(3, 3);
        let values = [1.0, 2.0, 3.0, 10.0];
        let last = w.stats_at(&values, 3);
        assert_eq!(last.mean, Some(5.0));
        // only values[..=i] are read
        assert_eq!(w.stats_at(&values[..3], 2), w.stats_at(&values, 2));
    }

    #[test]
    fn constant_window_has_zero_std() {
        let w = RollingWindow::new(7, 3);
        let s = w.stats_at(&[10.0; 7], 6);
        assert_eq!(s.mean, Some(10.0));
        assert_eq!(s.std, Some(0.0));
    }

    #[test]
    fn pct_change_handles_zero_prior() {
        assert_eq!(pct_changes(&[10.0, 15.0, 0.0, 5.0]), vec![0.0, 0.5, -1.0, 0.0]);
        assert!(pct_changes(&[]).is_empty());
    }
}
