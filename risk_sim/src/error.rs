//! Error types for the risk_sim crate

use polars::prelude::PolarsError;
use stock_math::MathError;
use thiserror::Error;

/// Custom error types for the risk_sim crate
#[derive(Debug, Error)]
pub enum RiskError {
    /// A required input file is missing or unreadable
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A required column is absent from an input table
    #[error("Missing required column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    /// Unexpected failure while simulating one entity
    #[error("Computation error: {0}")]
    ComputationError(String),

    /// Not a single entity produced risk metrics
    #[error("No products were processed in risk simulation ({skipped} skipped)")]
    EmptyResult { skipped: usize },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV serialization
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, RiskError>;

impl From<PolarsError> for RiskError {
    fn from(err: PolarsError) -> Self {
        RiskError::PolarsError(err.to_string())
    }
}

impl From<MathError> for RiskError {
    fn from(err: MathError) -> Self {
        RiskError::ComputationError(err.to_string())
    }
}
