//! # Risk Sim
//!
//! Monte Carlo profit risk scoring for forecast products.
//!
//! Each entity's demand forecast and feature row become a small set of
//! independent distributions (demand, unit cost, lead time). Profit is
//! simulated per draw, summarised into VaR and confidence bounds, and the
//! resulting raw scores are scaled across the portfolio into Low, Medium and
//! High risk levels.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dss_core::RunContext;
//! use risk_sim::{run_risk_simulation, DemandForecasts, FeatureTable, RiskConfig};
//!
//! # fn main() -> risk_sim::Result<()> {
//! let forecasts = DemandForecasts::from_csv("forecast_results.csv")?;
//! let features = FeatureTable::from_csv("model_features.csv")?;
//! let config = RiskConfig {
//!     seed: Some(42),
//!     ..RiskConfig::default()
//! };
//!
//! let mut ctx = RunContext::new().stage("RISK_SIMULATION");
//! let outcome = run_risk_simulation(&forecasts, &features, &config, &mut ctx)?;
//! outcome.write("risk_results.csv", "risk_assessment_report.md")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod distributions;
pub mod error;
pub mod inputs;
pub mod metrics;
pub mod monte_carlo;
pub mod report;
pub mod simulator;

// Re-export commonly used types
pub use crate::config::RiskConfig;
pub use crate::distributions::{define_distributions, DistributionParams, LeadTimeRange, NormalParams};
pub use crate::error::{Result, RiskError};
pub use crate::inputs::{DemandForecasts, FeatureRow, FeatureTable, Provenance, Resolved, ResolvedInputs};
pub use crate::metrics::{compute_risk_metrics, RiskLevel, RiskMetrics, RiskRecord};
pub use crate::monte_carlo::{run_monte_carlo, ProfitDraw};
pub use crate::report::RiskSummary;
pub use crate::simulator::{
    run_risk_simulation, simulate_entity, EntityRisk, RiskOutcome, RiskSkip, RiskSkipReason,
};
