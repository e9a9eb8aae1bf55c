//! Business-facing summary of flagged spend: totals and the services behind them.

use crate::config::ExplainConfig;
use crate::spike::ScoredRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCost {
    pub service: String,
    pub anomalous_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplanationSummary {
    pub top_services: Vec<ServiceCost>,
    /// Sum over every anomalous record, not only the listed services
    pub total_anomalous_cost: f64,
}

pub struct Explainer {
    top_n: usize,
}

impl Explainer {
    pub fn new(config: &ExplainConfig) -> Self {
        Self { top_n: config.top_n }
    }

    pub fn explain(&self, scored: &[ScoredRecord]) -> ExplanationSummary {
        let mut by_service: Vec<ServiceCost> = Vec::new();
        let mut slot: HashMap<&str, usize> = HashMap::new();
        let mut total = 0.0;

        // Sums accumulate in record order so results are reproducible for a given input.
        for r in scored.iter().filter(|r| r.is_anomaly) {
            let f = &r.features;
            total += f.cost;
            let i = *slot.entry(f.service.as_str()).or_insert_with(|| {
                by_service.push(ServiceCost {
                    service: f.service.clone(),
                    anomalous_cost: 0.0,
                });
                by_service.len() - 1
            });
            by_service[i].anomalous_cost += f.cost;
        }

        if by_service.is_empty() {
            return ExplanationSummary::default();
        }

        // stable: equal sums stay in first-encountered order
        by_service.sort_by(|a, b| b.anomalous_cost.total_cmp(&a.anomalous_cost));
        by_service.truncate(self.top_n);

        ExplanationSummary {
            top_services: by_service,
            total_anomalous_cost: total,
        }
    }
}

impl Default for Explainer {
    fn default() -> Self {
        Self::new(&ExplainConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeaturizedRecord;
    use chrono::NaiveDate;

    fn scored(service: &str, cost: f64, is_anomaly: bool) -> ScoredRecord {
        ScoredRecord {
            features: FeaturizedRecord {
                date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                service: service.into(),
                cost,
                day_of_week: 5,
                day_of_month: 1,
                month: 2,
                rolling_mean_7: None,
                rolling_std_7: None,
                pct_change: 0.0,
                cost_vs_rollmean: 0.0,
                roll_std_filled: 0.0,
            },
            anomaly_score: 0.7,
            ensemble_flagged: is_anomaly,
            is_anomaly,
        }
    }

    #[test]
    fn empty_when_nothing_flagged() {
        let s = Explainer::default().explain(&[scored("EC2", 5.0, false)]);
        assert_eq!(s.total_anomalous_cost, 0.0);
        assert!(s.top_services.is_empty());
        assert_eq!(Explainer::default().explain(&[]), ExplanationSummary::default());
    }

    #[test]
    fn ranks_services_by_summed_cost() {
        let s = Explainer::default().explain(&[
            scored("EC2", 10.0, true),
            scored("RDS", 30.0, true),
            scored("EC2", 25.0, true),
            scored("S3", 99.0, false),
        ]);
        assert_eq!(s.total_anomalous_cost, 65.0);
        let names: Vec<&str> = s.top_services.iter().map(|t| t.service.as_str()).collect();
        assert_eq!(names, vec!["EC2", "RDS"]);
        assert_eq!(s.top_services[0].anomalous_cost, 35.0);
    }

    #[test]
    fn ties_keep_first_seen_order_and_total_covers_all() {
        let records: Vec<ScoredRecord> = ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .map(|s| scored(s, 1.0, true))
            .collect();
        let s = Explainer::default().explain(&records);
        assert_eq!(s.top_services.len(), 5);
        let names: Vec<&str> = s.top_services.iter().map(|t| t.service.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(s.total_anomalous_cost, 7.0);
    }
}
