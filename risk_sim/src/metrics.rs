//! Risk metrics and portfolio-relative scoring

use crate::config::RiskConfig;
use crate::error::Result;
use serde::Serialize;
use std::cmp::Ordering;
use stock_math::statistics::{mean, min_max_normalize, percentile, population_std};

/// Summary of one entity's simulated profit distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskMetrics {
    pub expected_profit_mean: f64,
    pub profit_std: f64,
    /// 5th percentile of profit
    pub var_95: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// |VaR95| / (|mean| + epsilon), before portfolio scaling
    pub raw_risk_score: f64,
}

/// Compute the metrics of a profit sample
pub fn compute_risk_metrics(profits: &[f64], epsilon: f64) -> Result<RiskMetrics> {
    let expected_profit_mean = mean(profits)?;
    let var_95 = percentile(profits, 5.0)?;

    Ok(RiskMetrics {
        expected_profit_mean,
        profit_std: population_std(profits)?,
        var_95,
        ci_lower: percentile(profits, 2.5)?,
        ci_upper: percentile(profits, 97.5)?,
        raw_risk_score: var_95.abs() / (expected_profit_mean.abs() + epsilon),
    })
}

/// Portfolio-relative risk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a normalized score against the two cut-points
    pub fn classify(score: f64, medium_threshold: f64, high_threshold: f64) -> Self {
        if score < medium_threshold {
            RiskLevel::Low
        } else if score < high_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row of the risk table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskRecord {
    pub entity_id: String,
    pub expected_profit_mean: f64,
    pub profit_std: f64,
    pub var_95: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    #[serde(skip)]
    pub raw_risk_score: f64,
}

/// Min-max scale raw scores across the run and classify them.
///
/// The result is ordered by descending score, ties by ascending entity id.
pub fn score_portfolio(results: Vec<(String, RiskMetrics)>, config: &RiskConfig) -> Vec<RiskRecord> {
    let raw: Vec<f64> = results.iter().map(|(_, m)| m.raw_risk_score).collect();
    let scores = min_max_normalize(&raw, config.tie_tolerance);

    let mut records: Vec<RiskRecord> = results
        .into_iter()
        .zip(scores)
        .map(|((entity_id, m), risk_score)| RiskRecord {
            entity_id,
            expected_profit_mean: m.expected_profit_mean,
            profit_std: m.profit_std,
            var_95: m.var_95,
            ci_lower: m.ci_lower,
            ci_upper: m.ci_upper,
            risk_score,
            risk_level: RiskLevel::classify(
                risk_score,
                config.medium_threshold,
                config.high_threshold,
            ),
            raw_risk_score: m.raw_risk_score,
        })
        .collect();

    records.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    records
}
