//! Holt's linear exponential smoothing with grid-searched parameters

use crate::data::DailySeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use serde::Serialize;
use stock_math::forecasting::holt_pass;
use stock_math::statistics::mean_absolute_error;

pub const MODEL_LABEL: &str = "Holt's Linear Exponential Smoothing";

/// Grid search over (alpha, beta) by in-sample MAE
#[derive(Debug, Clone)]
pub struct HoltGridSearch {
    alphas: Vec<f64>,
    betas: Vec<f64>,
}

/// Fitted parameters and final state for one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothingModel {
    pub alpha: f64,
    pub beta: f64,
    pub level: f64,
    pub trend: f64,
    pub mae: f64,
}

/// Reliability label attached to a fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reliability {
    Good,
    Limited,
}

impl Reliability {
    pub fn label(&self) -> &'static str {
        match self {
            Reliability::Good => "Good reliability for short-term",
            Reliability::Limited => "Limited reliability - monitor closely",
        }
    }
}

impl std::fmt::Display for Reliability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl HoltGridSearch {
    /// Create a grid search over the given candidate coefficients
    pub fn new(alphas: Vec<f64>, betas: Vec<f64>) -> Result<Self> {
        if alphas.is_empty() || betas.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Parameter grids must not be empty".to_string(),
            ));
        }
        Ok(Self { alphas, betas })
    }

    /// Number of (alpha, beta) pairs evaluated per fit
    pub fn size(&self) -> usize {
        self.alphas.len() * self.betas.len()
    }

    /// Fit a raw series.
    ///
    /// Pairs are scored in alpha-major order and only a strictly lower MAE
    /// replaces the incumbent, so ties keep the earliest pair.
    pub fn fit(&self, series: &[f64]) -> Result<SmoothingModel> {
        if series.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "Series too short for fitting Holt's model ({} points)",
                series.len()
            )));
        }

        let actual = &series[1..];
        let mut best: Option<(f64, f64, f64)> = None;
        for &alpha in &self.alphas {
            for &beta in &self.betas {
                let pass = holt_pass(series, alpha, beta)?;
                let mae = mean_absolute_error(actual, &pass.one_step)?;
                if best.map_or(true, |(_, _, best_mae)| mae < best_mae) {
                    best = Some((alpha, beta, mae));
                }
            }
        }

        let (alpha, beta, mae) = best.ok_or_else(|| {
            ForecastError::ComputationError("Parameter grid produced no candidate".to_string())
        })?;
        if !mae.is_finite() {
            return Err(ForecastError::ComputationError(format!(
                "Best in-sample MAE is not finite ({})",
                mae
            )));
        }

        // Rerun with the winning pair for the final state
        let pass = holt_pass(series, alpha, beta)?;
        Ok(SmoothingModel {
            alpha,
            beta,
            level: pass.level,
            trend: pass.trend,
            mae,
        })
    }
}

impl ForecastModel for HoltGridSearch {
    type Trained = SmoothingModel;

    fn train(&self, series: &DailySeries) -> Result<Self::Trained> {
        self.fit(series.values())
    }

    fn name(&self) -> &str {
        MODEL_LABEL
    }
}

impl SmoothingModel {
    /// `level + h * trend` for h = 1..=horizon, clamped at zero
    pub fn project(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|h| (self.level + h as f64 * self.trend).max(0.0))
            .collect()
    }

    /// Good when MAE is below `ratio` times the mean of the history
    pub fn reliability(&self, series_mean: f64, ratio: f64) -> Reliability {
        if self.mae < series_mean * ratio {
            Reliability::Good
        } else {
            Reliability::Limited
        }
    }
}

impl TrainedForecastModel for SmoothingModel {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(self.project(horizon))
    }

    fn in_sample_mae(&self) -> f64 {
        self.mae
    }
}
