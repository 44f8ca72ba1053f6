//! Per-entity forecast run over a whole sales table

use crate::config::ForecastConfig;
use crate::data::{DailySeries, SalesTable};
use crate::error::{ForecastError, Result};
use crate::evaluation::{EvaluationEntry, EvaluationReport, SkipReason, SkippedEntity};
use crate::models::holt::HoltGridSearch;
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::records::{ForecastBatch, ForecastRecord};
use chrono::Duration;
use dss_core::fs::write_all_atomic;
use dss_core::RunContext;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Result of a forecast run: the rows for the risk stage plus the evaluation
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub batch: ForecastBatch,
    pub evaluation: EvaluationReport,
}

impl ForecastOutcome {
    /// Persist the forecast CSV and the evaluation report.
    ///
    /// Both bodies are rendered and staged before either target is replaced.
    pub fn write<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        forecast_csv: P,
        evaluation_md: Q,
    ) -> Result<()> {
        let csv = self.batch.to_csv_bytes()?;
        let markdown = self.evaluation.to_markdown();
        write_all_atomic(&[
            (forecast_csv.as_ref(), csv.as_slice()),
            (evaluation_md.as_ref(), markdown.as_bytes()),
        ])?;
        Ok(())
    }
}

/// Forecast every entity in `sales`.
///
/// Entities with a short history, a failed fit, or reached after the
/// deadline are skipped and listed in the evaluation. The run fails only
/// on invalid configuration or when no entity could be forecast.
pub fn run_short_term_forecast(
    sales: &SalesTable,
    config: &ForecastConfig,
    ctx: &mut RunContext,
) -> Result<ForecastOutcome> {
    config.validate()?;
    let span = ctx.span();
    let _guard = span.enter();

    info!(rows = sales.len(), "Short-term forecast started");
    ctx.add_rows_in(sales.len());

    let model = HoltGridSearch::new(config.alpha_grid.clone(), config.beta_grid.clone())?;
    let started = Instant::now();
    let deadline = config.deadline();

    let mut batch = ForecastBatch::default();
    let mut evaluation = EvaluationReport::new(config.min_history_days, config.horizon_days);

    for series in sales.daily_series() {
        let skip = |reason| SkippedEntity {
            entity_id: series.entity_id().to_string(),
            days: series.len(),
            reason,
        };

        if deadline.is_some_and(|limit| started.elapsed() >= limit) {
            warn!(entity = series.entity_id(), "Deadline exceeded, entity not fitted");
            evaluation.skipped.push(skip(SkipReason::DeadlineExceeded));
            continue;
        }

        if series.len() < config.min_history_days {
            warn!(
                entity = series.entity_id(),
                days = series.len(),
                "Skipping entity - insufficient data"
            );
            evaluation.skipped.push(skip(SkipReason::InsufficientHistory));
            continue;
        }

        match forecast_entity(&model, &series, config) {
            Ok((records, entry)) => {
                info!(
                    entity = series.entity_id(),
                    mae = entry.mae,
                    alpha = entry.alpha,
                    beta = entry.beta,
                    "Forecast completed"
                );
                batch.extend(records);
                evaluation.entries.push(entry);
            }
            Err(err) => {
                warn!(entity = series.entity_id(), error = %err, "Soft-fail for entity");
                evaluation.skipped.push(skip(SkipReason::Failed(err.to_string())));
            }
        }
    }

    if batch.is_empty() {
        warn!(skipped = evaluation.skipped.len(), "No entities forecast");
        return Err(ForecastError::EmptyResult {
            skipped: evaluation.skipped.len(),
        });
    }

    ctx.add_rows_out(batch.len());
    info!(
        entities = evaluation.entries.len(),
        skipped = evaluation.skipped.len(),
        "Short-term forecast completed"
    );
    ctx.finish("SUCCESS");

    Ok(ForecastOutcome { batch, evaluation })
}

/// Fit one entity and build its horizon rows
pub fn forecast_entity(
    model: &HoltGridSearch,
    series: &DailySeries,
    config: &ForecastConfig,
) -> Result<(Vec<ForecastRecord>, EvaluationEntry)> {
    let fitted = model.train(series)?;
    let quantities = fitted.forecast(config.horizon_days)?;
    let last_date = series.last_date();

    let records = quantities
        .into_iter()
        .enumerate()
        .map(|(i, quantity)| ForecastRecord {
            entity_id: series.entity_id().to_string(),
            forecast_week: (i / 7) as u32 + 1,
            forecast_date: last_date + Duration::days(i as i64 + 1),
            forecast_quantity: quantity,
            model_type: model.name().to_string(),
        })
        .collect();

    let entry = EvaluationEntry {
        entity_id: series.entity_id().to_string(),
        points: series.len(),
        alpha: fitted.alpha,
        beta: fitted.beta,
        mae: fitted.in_sample_mae(),
        reliability: fitted.reliability(series.mean(), config.reliability_mae_ratio),
    };

    Ok((records, entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_forecast_entity_rows() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = DailySeries::new("P1", start, vec![10.0; 28]);
        let config = ForecastConfig::default();
        let model = HoltGridSearch::new(config.alpha_grid.clone(), config.beta_grid.clone()).unwrap();

        let (records, entry) = forecast_entity(&model, &series, &config).unwrap();

        assert_eq!(records.len(), 28);
        assert_eq!(records[0].forecast_date, NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());
        assert_eq!(records[6].forecast_week, 1);
        assert_eq!(records[7].forecast_week, 2);
        assert_eq!(records[27].forecast_week, 4);
        assert_eq!(entry.points, 28);
        assert!(records.iter().all(|r| r.model_type == model.name()));
    }

    #[test]
    fn test_longer_horizon_extends_weeks() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = DailySeries::new("P1", start, vec![10.0; 28]);
        let config = ForecastConfig {
            horizon_days: 35,
            ..ForecastConfig::default()
        };
        let model = HoltGridSearch::new(config.alpha_grid.clone(), config.beta_grid.clone()).unwrap();

        let (records, _) = forecast_entity(&model, &series, &config).unwrap();

        assert_eq!(records.len(), 35);
        assert_eq!(records[28].forecast_week, 5);
        assert_eq!(records[34].forecast_week, 5);
    }
}
