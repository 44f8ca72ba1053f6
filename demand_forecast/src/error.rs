//! Error types for the demand_forecast crate

use polars::prelude::PolarsError;
use stock_math::MathError;
use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A required input file is missing or unreadable as a table
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A required column is absent from an input table
    #[error("Missing required column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    /// An entity's history is too short to fit
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Unexpected failure while fitting or projecting one entity
    #[error("Computation error: {0}")]
    ComputationError(String),

    /// No entity produced a forecast
    #[error("No entities were forecast ({skipped} skipped)")]
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
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            MathError::InvalidInput(msg) => ForecastError::InvalidParameter(msg),
            MathError::CalculationError(msg) => ForecastError::ComputationError(msg),
        }
    }
}
