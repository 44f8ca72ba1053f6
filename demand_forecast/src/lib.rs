//! # Demand Forecast
//!
//! Short-term demand forecasting for sales and inventory planning.
//!
//! ## Features
//!
//! - Daily sales loading (CSV or DataFrame) with per-entity gap fill
//! - Holt's linear exponential smoothing with grid-searched coefficients
//! - 28-day projections, clamped at zero, grouped into forecast weeks
//! - Evaluation report with fit quality and skipped entities
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use demand_forecast::{run_short_term_forecast, ForecastConfig, SalesLoader};
//! use dss_core::RunContext;
//!
//! # fn main() -> demand_forecast::Result<()> {
//! let sales = SalesLoader::from_csv("daily_product_sales.csv")?;
//! let mut ctx = RunContext::new().stage("SHORT_TERM_FORECAST");
//!
//! let outcome = run_short_term_forecast(&sales, &ForecastConfig::default(), &mut ctx)?;
//! outcome.write("forecast_results.csv", "forecast_evaluation.md")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod records;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{DailySeries, SalesLoader, SalesRow, SalesTable};
pub use crate::engine::{run_short_term_forecast, ForecastOutcome};
pub use crate::error::{ForecastError, Result};
pub use crate::evaluation::{EvaluationEntry, EvaluationReport, SkipReason, SkippedEntity};
pub use crate::models::holt::{HoltGridSearch, Reliability, SmoothingModel, MODEL_LABEL};
pub use crate::records::{ForecastBatch, ForecastRecord};
