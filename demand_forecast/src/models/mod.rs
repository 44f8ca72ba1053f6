//! Forecasting models for daily demand series

use crate::data::DailySeries;
use crate::error::Result;
use std::fmt::Debug;

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Project `horizon` days past the end of the training series
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// In-sample mean absolute error of one-step forecasts
    fn in_sample_mae(&self) -> f64;
}

/// Forecast model that can be trained on a daily series
pub trait ForecastModel: Debug {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on one entity's history
    fn train(&self, series: &DailySeries) -> Result<Self::Trained>;

    /// Label written next to every forecast row
    fn name(&self) -> &str;
}

pub mod holt;
