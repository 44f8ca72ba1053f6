//! Holt's linear (double exponential) smoothing.
//!
//! The recursion starts from `level = x[0]`, `trend = 0`. Every later
//! observation is first predicted as `level + trend` and then folded into
//! the state:
//!
//! ```text
//! level' = alpha * x + (1 - alpha) * (level + trend)
//! trend' = beta * (level' - level) + (1 - beta) * trend
//! ```

use crate::{MathError, Result};

/// Double Exponential Smoothing (Holt's Method) implementation
#[derive(Debug, Clone)]
pub struct HoltLinear {
    alpha: f64,
    beta: f64,
    level: Option<f64>,
    trend: Option<f64>,
    values_seen: usize,
}

impl HoltLinear {
    /// Create a new Holt smoother with the specified parameters
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(MathError::InvalidInput(
                "Alpha must be between 0 and 1 (exclusive)".to_string(),
            ));
        }
        if beta <= 0.0 || beta >= 1.0 {
            return Err(MathError::InvalidInput(
                "Beta must be between 0 and 1 (exclusive)".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            beta,
            level: None,
            trend: None,
            values_seen: 0,
        })
    }

    /// Fold a new observation into the state.
    ///
    /// Returns the one-step-ahead forecast that was made for `value` before
    /// it was observed, or `None` for the first observation.
    pub fn update(&mut self, value: f64) -> Result<Option<f64>> {
        if !value.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Observation {} is not finite",
                self.values_seen
            )));
        }
        self.values_seen += 1;

        match (self.level, self.trend) {
            (None, None) => {
                self.level = Some(value);
                self.trend = Some(0.0);
                Ok(None)
            }
            (Some(prev_level), Some(prev_trend)) => {
                let one_step = prev_level + prev_trend;
                let new_level = self.alpha * value + (1.0 - self.alpha) * one_step;
                let new_trend =
                    self.beta * (new_level - prev_level) + (1.0 - self.beta) * prev_trend;

                self.level = Some(new_level);
                self.trend = Some(new_trend);
                Ok(Some(one_step))
            }
            _ => Err(MathError::CalculationError(
                "Inconsistent state: level and trend should both be Some or None".to_string(),
            )),
        }
    }

    /// Get the current level
    pub fn level(&self) -> Result<f64> {
        self.level
            .ok_or_else(|| MathError::InsufficientData("Level not calculated yet".to_string()))
    }

    /// Get the current trend
    pub fn trend(&self) -> Result<f64> {
        self.trend
            .ok_or_else(|| MathError::InsufficientData("Trend not calculated yet".to_string()))
    }
}

/// Final state and in-sample one-step forecasts of a full pass over a series.
#[derive(Debug, Clone, PartialEq)]
pub struct HoltPass {
    pub level: f64,
    pub trend: f64,
    /// One-step forecasts for `series[1..]`
    pub one_step: Vec<f64>,
}

/// Runs the recursion over the whole series.
///
/// Needs at least two observations so that there is one forecast to score.
pub fn holt_pass(series: &[f64], alpha: f64, beta: f64) -> Result<HoltPass> {
    if series.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Holt smoothing needs at least 2 observations, got {}",
            series.len()
        )));
    }

    let mut smoother = HoltLinear::new(alpha, beta)?;
    let mut one_step = Vec::with_capacity(series.len() - 1);
    for &value in series {
        if let Some(forecast) = smoother.update(value)? {
            one_step.push(forecast);
        }
    }

    Ok(HoltPass {
        level: smoother.level()?,
        trend: smoother.trend()?,
        one_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_holt_update_sequence() {
        let mut holt = HoltLinear::new(0.5, 0.5).unwrap();

        assert_eq!(holt.update(10.0).unwrap(), None);
        assert_relative_eq!(holt.level().unwrap(), 10.0);
        assert_relative_eq!(holt.trend().unwrap(), 0.0);

        // forecast 10, level = 0.5*20 + 0.5*10 = 15, trend = 0.5*5 + 0 = 2.5
        assert_eq!(holt.update(20.0).unwrap(), Some(10.0));
        assert_relative_eq!(holt.level().unwrap(), 15.0);
        assert_relative_eq!(holt.trend().unwrap(), 2.5);

        // next forecast is level + trend
        assert_eq!(holt.update(0.0).unwrap(), Some(17.5));
    }

    #[test]
    fn test_holt_rejects_out_of_range_parameters() {
        assert!(HoltLinear::new(0.0, 0.5).is_err());
        assert!(HoltLinear::new(0.5, 1.0).is_err());
        assert!(HoltLinear::new(1.2, 0.1).is_err());
    }

    #[test]
    fn test_state_before_data_fails() {
        let holt = HoltLinear::new(0.3, 0.1).unwrap();
        assert!(matches!(holt.level(), Err(MathError::InsufficientData(_))));
        assert!(matches!(holt.trend(), Err(MathError::InsufficientData(_))));
    }

    #[test]
    fn test_pass_on_constant_series() {
        let series = vec![10.0; 20];
        let pass = holt_pass(&series, 0.3, 0.15).unwrap();

        assert_relative_eq!(pass.level, 10.0);
        assert_relative_eq!(pass.trend, 0.0);
        assert_eq!(pass.one_step.len(), 19);
        assert!(pass.one_step.iter().all(|&f| (f - 10.0).abs() < 1e-12));
    }

    #[test]
    fn test_pass_rejects_short_series() {
        assert!(matches!(
            holt_pass(&[1.0], 0.3, 0.15),
            Err(MathError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_non_finite_observation_is_rejected() {
        assert!(holt_pass(&[1.0, f64::NAN, 2.0], 0.3, 0.15).is_err());
    }
}
