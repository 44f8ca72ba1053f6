//! Forecast stage configuration

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the short-term forecast.
///
/// The reliability ratio is a heuristic cut-off with no statistical
/// derivation; it is exposed so that it can be tuned per dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Days projected past the last observed date
    pub horizon_days: usize,
    /// Entities whose filled history is shorter than this are skipped
    pub min_history_days: usize,
    /// Candidate level coefficients
    pub alpha_grid: Vec<f64>,
    /// Candidate trend coefficients
    pub beta_grid: Vec<f64>,
    /// A fit is "good" when in-sample MAE < ratio * mean(series)
    pub reliability_mae_ratio: f64,
    /// Wall-clock budget for the whole stage; entities not reached are skipped
    pub deadline_secs: Option<u64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 28,
            min_history_days: 14,
            alpha_grid: vec![0.1, 0.3, 0.5, 0.7, 0.9],
            beta_grid: vec![0.05, 0.15, 0.25, 0.35, 0.45],
            reliability_mae_ratio: 0.3,
            deadline_secs: None,
        }
    }
}

impl ForecastConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Checks the configuration before a run
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon_days must be at least 1".to_string(),
            ));
        }
        if self.min_history_days < 2 {
            return Err(ForecastError::InvalidParameter(
                "min_history_days must be at least 2".to_string(),
            ));
        }
        for (name, grid) in [("alpha_grid", &self.alpha_grid), ("beta_grid", &self.beta_grid)] {
            if grid.is_empty() {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must not be empty",
                    name
                )));
            }
            if let Some(bad) = grid.iter().find(|&&v| !(v > 0.0 && v < 1.0)) {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} value {} is outside (0, 1)",
                    name, bad
                )));
            }
        }
        if !(self.reliability_mae_ratio > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "reliability_mae_ratio must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
