//! Per-entity distribution parameters for the profit simulation

use crate::config::RiskConfig;
use crate::error::{Result, RiskError};
use crate::inputs::ResolvedInputs;
use stock_math::statistics::mean;

/// Mean and standard deviation of a clamped normal draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalParams {
    pub mean: f64,
    pub std: f64,
}

/// Inclusive integer range for a discrete-uniform lead time draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadTimeRange {
    pub low: u32,
    pub high: u32,
}

/// Everything one simulation call needs for one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionParams {
    pub demand: NormalParams,
    pub cost: NormalParams,
    pub lead_time: LeadTimeRange,
    pub price: f64,
    pub available_stock: f64,
    pub holding_cost_per_day: f64,
}

/// Mean of the entity's forecast quantities
pub fn demand_mean(forecast: &[f64]) -> Result<f64> {
    let value = mean(forecast)?;
    if !value.is_finite() {
        return Err(RiskError::ComputationError(format!(
            "Forecast mean is not finite ({})",
            value
        )));
    }
    Ok(value)
}

/// Inclusive day range `[round(center - spread), round(center + spread)]`,
/// with `low >= 1` and `high > low`
pub fn lead_time_range(center: f64, spread: f64) -> Result<LeadTimeRange> {
    let low = (center - spread).round().max(1.0);
    let high = (center + spread).round();
    // high must stay representable after the `low + 1` adjustment
    if !low.is_finite() || !high.is_finite() || low.max(high) >= u32::MAX as f64 {
        return Err(RiskError::ComputationError(format!(
            "Lead time {} days is outside the supported range",
            center
        )));
    }

    let low = low as u32;
    let high = (high.max(0.0) as u32).max(low + 1);
    Ok(LeadTimeRange { low, high })
}

/// Build the distributions for one entity.
///
/// Demand and cost use fixed coefficients of variation rather than fitted
/// ones; both standard deviations are floored at `min_std`.
pub fn define_distributions(
    forecast: &[f64],
    inputs: &ResolvedInputs,
    config: &RiskConfig,
) -> Result<DistributionParams> {
    let demand_mean = demand_mean(forecast)?;
    let unit_cost = inputs.unit_cost.value;

    let lead_time = lead_time_range(inputs.lead_time_days.value, config.lead_time_spread_days)?;

    Ok(DistributionParams {
        demand: NormalParams {
            mean: demand_mean,
            std: (demand_mean * config.demand_cv).max(config.min_std),
        },
        cost: NormalParams {
            mean: unit_cost,
            std: (unit_cost * config.cost_cv).max(config.min_std),
        },
        lead_time,
        price: inputs.price.value,
        available_stock: inputs.available_stock.value,
        holding_cost_per_day: inputs.holding_cost_per_day.value,
    })
}
