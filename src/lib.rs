//! # DSS
//!
//! `dss` wires the decision-support stages together: short-term demand
//! forecasting followed by Monte Carlo profit risk scoring.
//!
//! The stage crates are re-exported so a caller only needs this one.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dss::{pipeline, PipelineConfig, RunContext};
//!
//! # fn main() -> dss::Result<()> {
//! let config = PipelineConfig::from_file("dss.json")?;
//! let summary = pipeline::run(&config, &RunContext::new())?;
//! println!("{} products scored, {} high risk", summary.risk_entities, summary.high_risk);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;

pub use demand_forecast;
pub use dss_core;
pub use risk_sim;
pub use stock_math;

pub use crate::config::{PathsConfig, PipelineConfig};
pub use crate::error::{DssError, Result};
pub use crate::pipeline::PipelineSummary;
pub use dss_core::RunContext;
