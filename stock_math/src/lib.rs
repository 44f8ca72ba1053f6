//! # Stock Math
//!
//! Numeric building blocks shared by the forecasting and risk stages.
//! This crate provides the Holt linear smoothing recursion and the
//! descriptive statistics used to score simulated profit distributions.

use thiserror::Error;

pub mod forecasting;
pub mod statistics;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
