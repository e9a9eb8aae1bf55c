//! Response shapes handed to the serving layer.

use crate::explain::ExplanationSummary;
use crate::spike::ScoredRecord;
use serde::{Deserialize, Serialize};

/// One anomalous row as displayed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPoint {
    /// ISO 8601 calendar date
    pub date: String,
    pub service: String,
    pub cost: f64,
    pub anomaly_score: f64,
    pub cost_pct_change: f64,
    pub cost_rolling_mean_7: Option<f64>,
}

impl From<&ScoredRecord> for AnomalyPoint {
    fn from(r: &ScoredRecord) -> Self {
        let f = &r.features;
        Self {
            date: f.date.format("%Y-%m-%d").to_string(),
            service: f.service.clone(),
            cost: f.cost,
            anomaly_score: r.anomaly_score,
            cost_pct_change: f.pct_change,
            cost_rolling_mean_7: f.rolling_mean_7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectResponse {
    pub anomalies: Vec<AnomalyPoint>,
    pub total_rows: usize,
    pub total_anomalies: usize,
}

impl DetectResponse {
    pub fn from_scored(scored: &[ScoredRecord]) -> Self {
        let anomalies: Vec<AnomalyPoint> = scored
            .iter()
            .filter(|r| r.is_anomaly)
            .map(AnomalyPoint::from)
            .collect();
        Self {
            total_rows: scored.len(),
            total_anomalies: anomalies.len(),
            anomalies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total_rows: usize,
    pub total_anomalies: usize,
    pub explanation: ExplanationSummary,
}

impl SummaryResponse {
    pub fn new(scored: &[ScoredRecord], explanation: ExplanationSummary) -> Self {
        Self {
            total_rows: scored.len(),
            total_anomalies: scored.iter().filter(|r| r.is_anomaly).count(),
            explanation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeaturizedRecord;
    use chrono::NaiveDate;

    fn scored(day: u32, cost: f64, is_anomaly: bool) -> ScoredRecord {
        ScoredRecord {
            features: FeaturizedRecord {
                date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
                service: "EC2".into(),
                cost,
                day_of_week: 0,
                day_of_month: day,
                month: 1,
                rolling_mean_7: if day > 2 { Some(10.0) } else { None },
                rolling_std_7: None,
                pct_change: 0.5,
                cost_vs_rollmean: 1.0,
                roll_std_filled: 0.0,
            },
            anomaly_score: 0.66,
            ensemble_flagged: is_anomaly,
            is_anomaly,
        }
    }

    #[test]
    fn detect_response_only_lists_anomalies() {
        let rows = vec![scored(1, 10.0, false), scored(8, 40.0, true)];
        let resp = DetectResponse::from_scored(&rows);
        assert_eq!(resp.total_rows, 2);
        assert_eq!(resp.total_anomalies, 1);
        assert_eq!(resp.anomalies[0].date, "2025-01-08");
        assert_eq!(resp.anomalies[0].cost_rolling_mean_7, Some(10.0));
    }

    #[test]
    fn rolling_mean_serializes_as_null_when_undefined() {
        let p = AnomalyPoint::from(&scored(1, 10.0, true));
        let v = serde_json::to_value(&p).unwrap();
        assert!(v["cost_rolling_mean_7"].is_null());
    }

    #[test]
    fn health_is_ok() {
        let v = serde_json::to_value(HealthStatus::ok()).unwrap();
        assert_eq!(v["status"], "ok");
    }
}
