//! Monte Carlo profit simulation

use crate::distributions::DistributionParams;
use crate::error::{Result, RiskError};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// One simulated period for one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitDraw {
    pub demand: f64,
    /// `min(demand, available_stock)`; unmet demand is lost, not backordered
    pub realized_sales: f64,
    pub unit_cost: f64,
    pub lead_time_days: u32,
    pub profit: f64,
}

fn normal(mean: f64, std: f64, what: &str) -> Result<Normal<f64>> {
    if !mean.is_finite() {
        return Err(RiskError::ComputationError(format!(
            "{} mean is not finite ({})",
            what, mean
        )));
    }
    Normal::new(mean, std).map_err(|e| {
        RiskError::ComputationError(format!(
            "Invalid {} distribution (mean={}, std={}): {}",
            what, mean, std, e
        ))
    })
}

/// Draw `n` independent periods.
///
/// Demand and unit cost are normal draws clamped at zero, lead time is
/// discrete-uniform over its inclusive range.
pub fn simulate_draws<R: Rng>(
    params: &DistributionParams,
    n: usize,
    rng: &mut R,
) -> Result<Vec<ProfitDraw>> {
    if n == 0 {
        return Err(RiskError::InvalidParameter(
            "Number of simulations must be at least 1".to_string(),
        ));
    }

    let demand_dist = normal(params.demand.mean, params.demand.std, "demand")?;
    let cost_dist = normal(params.cost.mean, params.cost.std, "cost")?;
    let lead_time = params.lead_time;

    let mut draws = Vec::with_capacity(n);
    for _ in 0..n {
        let demand = demand_dist.sample(rng).max(0.0);
        let unit_cost = cost_dist.sample(rng).max(0.0);
        let lead_time_days = rng.gen_range(lead_time.low..=lead_time.high);

        let realized_sales = demand.min(params.available_stock);
        let revenue = realized_sales * params.price;
        let variable_cost = realized_sales * unit_cost;
        let holding_cost = lead_time_days as f64 * params.holding_cost_per_day;

        draws.push(ProfitDraw {
            demand,
            realized_sales,
            unit_cost,
            lead_time_days,
            profit: revenue - variable_cost - holding_cost,
        });
    }

    Ok(draws)
}

/// Simulated profit samples, one per draw
pub fn run_monte_carlo<R: Rng>(
    params: &DistributionParams,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    Ok(simulate_draws(params, n, rng)?
        .into_iter()
        .map(|draw| draw.profit)
        .collect())
}
