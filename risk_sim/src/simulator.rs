//! Portfolio risk run: simulate every forecast entity, then score them together

use crate::config::RiskConfig;
use crate::distributions::{define_distributions, demand_mean};
use crate::error::{Result, RiskError};
use crate::inputs::{DemandForecasts, FeatureRow, FeatureTable, ResolvedInputs};
use crate::metrics::{compute_risk_metrics, score_portfolio, RiskMetrics, RiskRecord};
use crate::monte_carlo::run_monte_carlo;
use crate::report::{render_csv, render_markdown, RiskSummary};
use dss_core::fs::write_all_atomic;
use dss_core::RunContext;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Why an entity is missing from the risk table
#[derive(Debug, Clone, PartialEq)]
pub enum RiskSkipReason {
    MissingFeatures,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskSkip {
    pub entity_id: String,
    pub reason: RiskSkipReason,
}

/// Metrics of one entity and the inputs they were simulated from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityRisk {
    pub metrics: RiskMetrics,
    pub inputs: ResolvedInputs,
}

/// Ranked risk records of one run plus the entities left out
#[derive(Debug, Clone)]
pub struct RiskOutcome {
    pub records: Vec<RiskRecord>,
    pub skipped: Vec<RiskSkip>,
    /// Inputs taken from a fallback policy, per entity that used any
    pub fallbacks: BTreeMap<String, Vec<&'static str>>,
    pub report_top_n: usize,
}

impl RiskOutcome {
    pub fn summary(&self) -> RiskSummary {
        RiskSummary::of(&self.records, self.fallbacks.len())
    }

    /// Persist the risk CSV and the Markdown report.
    ///
    /// Both bodies are rendered and staged before either target is replaced.
    pub fn write<P: AsRef<Path>, Q: AsRef<Path>>(&self, risk_csv: P, report_md: Q) -> Result<()> {
        let csv = render_csv(&self.records)?;
        let markdown = render_markdown(&self.records, &self.summary(), self.report_top_n);
        write_all_atomic(&[
            (risk_csv.as_ref(), csv.as_slice()),
            (report_md.as_ref(), markdown.as_bytes()),
        ])?;
        Ok(())
    }

    pub fn record(&self, entity_id: &str) -> Option<&RiskRecord> {
        self.records.iter().find(|r| r.entity_id == entity_id)
    }
}

/// Generator for a run: pinned by the seed when given, otherwise from entropy
pub fn rng_for(config: &RiskConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Simulate every entity of `forecasts` and score the portfolio.
///
/// Entities without a feature row are skipped with a warning, entities whose
/// simulation fails are soft-failed. The run fails on invalid configuration
/// or when no entity produced metrics.
pub fn run_risk_simulation(
    forecasts: &DemandForecasts,
    features: &FeatureTable,
    config: &RiskConfig,
    ctx: &mut RunContext,
) -> Result<RiskOutcome> {
    config.validate()?;
    let span = ctx.span();
    let _guard = span.enter();

    info!(
        entities = forecasts.len(),
        simulations = config.n_simulations,
        seeded = config.seed.is_some(),
        "Risk simulation started"
    );
    ctx.add_rows_in(forecasts.rows());

    let mut rng = rng_for(config);
    let mut results: Vec<(String, RiskMetrics)> = Vec::with_capacity(forecasts.len());
    let mut skipped = Vec::new();
    let mut fallbacks = BTreeMap::new();

    // ascending id order keeps a seeded run reproducible
    for (entity_id, forecast) in forecasts.iter() {
        let Some(row) = features.get(entity_id) else {
            warn!(entity = entity_id, "Skipping entity (missing features)");
            skipped.push(RiskSkip {
                entity_id: entity_id.to_string(),
                reason: RiskSkipReason::MissingFeatures,
            });
            continue;
        };

        match simulate_entity(forecast, row, config, &mut rng) {
            Ok(EntityRisk { metrics, inputs }) => {
                debug!(
                    entity = entity_id,
                    mean = metrics.expected_profit_mean,
                    var_95 = metrics.var_95,
                    unit_cost = %inputs.unit_cost.provenance,
                    price = %inputs.price.provenance,
                    available_stock = %inputs.available_stock.provenance,
                    lead_time_days = %inputs.lead_time_days.provenance,
                    holding_cost_per_day = %inputs.holding_cost_per_day.provenance,
                    "Entity simulated"
                );
                let used = inputs.fallbacks();
                if !used.is_empty() {
                    info!(entity = entity_id, inputs = ?used, "Fallback inputs used");
                    fallbacks.insert(entity_id.to_string(), used);
                }
                results.push((entity_id.to_string(), metrics));
            }
            Err(err) => {
                warn!(entity = entity_id, error = %err, "Soft-fail for entity");
                skipped.push(RiskSkip {
                    entity_id: entity_id.to_string(),
                    reason: RiskSkipReason::Failed(err.to_string()),
                });
            }
        }
    }

    if results.is_empty() {
        warn!(skipped = skipped.len(), "No entities simulated");
        return Err(RiskError::EmptyResult {
            skipped: skipped.len(),
        });
    }

    let records = score_portfolio(results, config);
    ctx.add_rows_out(records.len());
    info!(
        entities = records.len(),
        skipped = skipped.len(),
        with_fallbacks = fallbacks.len(),
        "Risk simulation completed"
    );
    ctx.finish("SUCCESS");

    Ok(RiskOutcome {
        records,
        skipped,
        fallbacks,
        report_top_n: config.report_top_n,
    })
}

/// Resolve inputs, build distributions, draw and summarise one entity
pub fn simulate_entity<R: Rng>(
    forecast: &[f64],
    features: &FeatureRow,
    config: &RiskConfig,
    rng: &mut R,
) -> Result<EntityRisk> {
    let mean = demand_mean(forecast)?;
    let inputs = ResolvedInputs::resolve(features, mean, config);
    let params = define_distributions(forecast, &inputs, config)?;
    let profits = run_monte_carlo(&params, config.n_simulations, rng)?;
    Ok(EntityRisk {
        metrics: compute_risk_metrics(&profits, config.risk_epsilon)?,
        inputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    fn seeded(seed: u64) -> RiskConfig {
        RiskConfig {
            seed: Some(seed),
            n_simulations: 500,
            ..RiskConfig::default()
        }
    }

    #[test]
    fn test_simulate_entity_zero_variance() {
        // zero demand leaves only the holding cost, which is the same in every draw
        let row = FeatureRow::new()
            .with("unit_cost", 2.0)
            .with("lead_time_days", 1.0)
            .with("holding_cost_per_day", 0.0);
        let metrics = simulate_entity(&[0.0; 28], &row, &seeded(1), &mut StdRng::seed_from_u64(1))
            .unwrap()
            .metrics;

        assert!(metrics.profit_std.abs() < 1e-3);
        assert!((metrics.var_95 - metrics.expected_profit_mean).abs() < 1e-3);
    }

    #[test]
    fn test_missing_features_are_skipped() {
        let forecasts = DemandForecasts::new(BTreeMap::from([
            ("A".to_string(), vec![10.0; 28]),
            ("B".to_string(), vec![5.0; 28]),
        ]));
        let features = FeatureTable::new(HashMap::from([(
            "A".to_string(),
            FeatureRow::new().with("unit_cost", 3.0),
        )]));
        let mut ctx = RunContext::with_run_id("t").stage("RISK_SIMULATION");

        let outcome = run_risk_simulation(&forecasts, &features, &seeded(7), &mut ctx).unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped[0].entity_id, "B");
        assert_eq!(outcome.skipped[0].reason, RiskSkipReason::MissingFeatures);
        assert_eq!(ctx.rows_in(), 56);
        assert_eq!(ctx.rows_out(), 1);
        assert_eq!(
            outcome.fallbacks["A"],
            vec!["price", "available_stock", "lead_time_days", "holding_cost_per_day"]
        );
    }

    #[test]
    fn test_huge_lead_time_soft_fails_entity() {
        let forecasts = DemandForecasts::new(BTreeMap::from([
            ("A".to_string(), vec![10.0; 28]),
            ("B".to_string(), vec![10.0; 28]),
        ]));
        let features = FeatureTable::new(HashMap::from([
            ("A".to_string(), FeatureRow::new().with("unit_cost", 2.0)),
            ("B".to_string(), FeatureRow::new().with("lead_time_days", 5.0e9)),
        ]));
        let mut ctx = RunContext::new();

        let outcome = run_risk_simulation(&forecasts, &features, &seeded(3), &mut ctx).unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].entity_id, "A");
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].entity_id, "B");
        assert!(matches!(outcome.skipped[0].reason, RiskSkipReason::Failed(_)));
    }

    #[test]
    fn test_fully_specified_entity_has_no_fallbacks() {
        let forecasts =
            DemandForecasts::new(BTreeMap::from([("A".to_string(), vec![10.0; 28])]));
        let row = FeatureRow::new()
            .with("unit_cost", 2.0)
            .with("price", 3.0)
            .with("current_stock", 80.0)
            .with("lead_time_days", 6.0)
            .with("holding_cost_per_day", 0.05);
        let features = FeatureTable::new(HashMap::from([("A".to_string(), row)]));

        let outcome =
            run_risk_simulation(&forecasts, &features, &seeded(5), &mut RunContext::new()).unwrap();

        assert!(outcome.fallbacks.is_empty());
        assert_eq!(outcome.summary().fallback_entities, 0);
    }

    #[test]
    fn test_no_features_at_all_is_empty_result() {
        let forecasts =
            DemandForecasts::new(BTreeMap::from([("A".to_string(), vec![10.0; 28])]));
        let mut ctx = RunContext::new();

        let result =
            run_risk_simulation(&forecasts, &FeatureTable::default(), &seeded(7), &mut ctx);

        assert!(matches!(result, Err(RiskError::EmptyResult { skipped: 1 })));
    }
}
