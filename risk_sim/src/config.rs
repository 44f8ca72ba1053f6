//! Risk stage configuration

use crate::error::{Result, RiskError};
use serde::{Deserialize, Serialize};

/// Tunables for the Monte Carlo risk stage.
///
/// Every fallback default is a policy that keeps the run alive on
/// incomplete feature data; none of them is an estimate of the true value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Draws per entity
    pub n_simulations: usize,
    /// Pin the generator for reproducible runs; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Demand std as a fraction of the forecast mean
    pub demand_cv: f64,
    /// Unit cost std as a fraction of the unit cost
    pub cost_cv: f64,
    /// Lower bound applied to every std
    pub min_std: f64,
    pub default_unit_cost: f64,
    pub default_lead_time_days: f64,
    /// Half-width of the lead time range around its center
    pub lead_time_spread_days: f64,
    /// Price = unit cost * markup when no price column is present
    pub price_markup: f64,
    /// Stock = demand mean * cover days when no stock column is present
    pub stock_cover_days: f64,
    /// Holding cost per day = unit cost * rate when not given
    pub holding_cost_rate: f64,
    /// Added to |mean| in the raw risk ratio
    pub risk_epsilon: f64,
    /// Raw score spread under which every normalized score is 0
    pub tie_tolerance: f64,
    /// Scores below this are Low
    pub medium_threshold: f64,
    /// Scores at or above this are High
    pub high_threshold: f64,
    /// Rows in the report's ranking table
    pub report_top_n: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            n_simulations: 2000,
            seed: None,
            demand_cv: 0.15,
            cost_cv: 0.05,
            min_std: 1e-6,
            default_unit_cost: 1.0,
            default_lead_time_days: 7.0,
            lead_time_spread_days: 2.0,
            price_markup: 1.3,
            stock_cover_days: 7.0,
            holding_cost_rate: 0.01,
            risk_epsilon: 1e-6,
            tie_tolerance: 1e-9,
            medium_threshold: 0.33,
            high_threshold: 0.66,
            report_top_n: 10,
        }
    }
}

impl RiskConfig {
    /// Checks the configuration before a run
    pub fn validate(&self) -> Result<()> {
        if self.n_simulations == 0 {
            return Err(RiskError::InvalidParameter(
                "n_simulations must be at least 1".to_string(),
            ));
        }
        let non_negative = [
            ("demand_cv", self.demand_cv),
            ("cost_cv", self.cost_cv),
            ("lead_time_spread_days", self.lead_time_spread_days),
            ("stock_cover_days", self.stock_cover_days),
            ("holding_cost_rate", self.holding_cost_rate),
            ("risk_epsilon", self.risk_epsilon),
            ("tie_tolerance", self.tie_tolerance),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(RiskError::InvalidParameter(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if !(self.min_std > 0.0) {
            return Err(RiskError::InvalidParameter(
                "min_std must be positive".to_string(),
            ));
        }
        if !(0.0 < self.medium_threshold && self.medium_threshold <= self.high_threshold) {
            return Err(RiskError::InvalidParameter(format!(
                "risk thresholds must satisfy 0 < medium ({}) <= high ({})",
                self.medium_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}
