//! Error types for the pipeline facade

use demand_forecast::ForecastError;
use risk_sim::RiskError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DssError {
    /// The pipeline configuration file could not be read
    #[error("Cannot read config file {path}: {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    /// The pipeline configuration file is not valid JSON for [`crate::PipelineConfig`]
    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Forecast stage failed: {0}")]
    Forecast(#[from] ForecastError),

    #[error("Risk stage failed: {0}")]
    Risk(#[from] RiskError),
}

pub type Result<T> = std::result::Result<T, DssError>;
