//! Stage orchestration: load inputs, run a stage, then persist its outputs

use crate::config::PipelineConfig;
use crate::error::Result;
use demand_forecast::{run_short_term_forecast, ForecastOutcome, SalesLoader};
use dss_core::RunContext;
use risk_sim::{run_risk_simulation, DemandForecasts, FeatureTable, RiskLevel, RiskOutcome};
use tracing::info;

pub const FORECAST_STAGE: &str = "SHORT_TERM_FORECAST";
pub const RISK_STAGE: &str = "RISK_SIMULATION";

/// Counts reported at the end of a full run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    pub run_id: String,
    pub forecast_entities: usize,
    pub forecast_skipped: usize,
    pub risk_entities: usize,
    pub risk_skipped: usize,
    /// Scored entities with at least one fallback input
    pub risk_fallbacks: usize,
    pub high_risk: usize,
}

/// Forecast stage on its own: sales CSV in, forecast CSV and evaluation out.
///
/// Nothing is written unless the stage succeeds.
pub fn forecast(config: &PipelineConfig, ctx: &RunContext) -> Result<ForecastOutcome> {
    let mut stage = ctx.stage(FORECAST_STAGE);
    let sales = SalesLoader::from_csv(&config.paths.sales_csv)?;
    let outcome = run_short_term_forecast(&sales, &config.forecast, &mut stage)?;
    outcome.write(&config.paths.forecast_csv, &config.paths.evaluation_md)?;
    info!(
        run_id = ctx.run_id(),
        path = %config.paths.forecast_csv.display(),
        "Forecast outputs written"
    );
    Ok(outcome)
}

/// Risk stage on its own, reading the forecast CSV a previous run produced
pub fn risk(config: &PipelineConfig, ctx: &RunContext) -> Result<RiskOutcome> {
    let forecasts = DemandForecasts::from_csv(&config.paths.forecast_csv)?;
    let features = FeatureTable::from_csv(&config.paths.features_csv)?;
    risk_from(&forecasts, &features, config, ctx)
}

fn risk_from(
    forecasts: &DemandForecasts,
    features: &FeatureTable,
    config: &PipelineConfig,
    ctx: &RunContext,
) -> Result<RiskOutcome> {
    let mut stage = ctx.stage(RISK_STAGE);
    let outcome = run_risk_simulation(forecasts, features, &config.risk, &mut stage)?;
    outcome.write(&config.paths.risk_csv, &config.paths.risk_md)?;
    info!(
        run_id = ctx.run_id(),
        path = %config.paths.risk_csv.display(),
        "Risk outputs written"
    );
    Ok(outcome)
}

/// Both stages. The forecast batch goes to the risk stage in memory; the
/// forecast CSV is written for inspection, not re-read.
///
/// The feature table is loaded before forecasting, so a missing or malformed
/// feature file fails the run without writing any output.
pub fn run(config: &PipelineConfig, ctx: &RunContext) -> Result<PipelineSummary> {
    config.validate()?;
    let span = ctx.span();
    let _guard = span.enter();
    info!("Pipeline started");

    let features = FeatureTable::from_csv(&config.paths.features_csv)?;
    let forecast_outcome = forecast(config, ctx)?;
    let forecasts = DemandForecasts::from(&forecast_outcome.batch);
    let risk_outcome = risk_from(&forecasts, &features, config, ctx)?;

    let summary = PipelineSummary {
        run_id: ctx.run_id().to_string(),
        forecast_entities: forecast_outcome.evaluation.entries.len(),
        forecast_skipped: forecast_outcome.evaluation.skipped.len(),
        risk_entities: risk_outcome.records.len(),
        risk_skipped: risk_outcome.skipped.len(),
        risk_fallbacks: risk_outcome.fallbacks.len(),
        high_risk: risk_outcome
            .records
            .iter()
            .filter(|r| r.risk_level == RiskLevel::High)
            .count(),
    };
    info!(
        forecast_entities = summary.forecast_entities,
        risk_entities = summary.risk_entities,
        risk_fallbacks = summary.risk_fallbacks,
        high_risk = summary.high_risk,
        "Pipeline completed"
    );
    Ok(summary)
}
