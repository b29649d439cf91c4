//! Error types for the expense_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the expense_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// No expense records remain once income has been filtered out
    #[error("No data: {0}")]
    NoData(String),

    /// Not enough monthly aggregates to train and evaluate the model
    #[error("Insufficient data: at least {required} records are required, found {found}")]
    InsufficientData { required: usize, found: usize },

    /// No category baselines exist to synthesize future periods from
    #[error("No categories available to build future periods")]
    NoCategories,

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to record validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),

    /// Error while reading CSV history
    #[error("CSV error: {0}")]
    Csv(String),

    /// Error while parsing configuration
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::Polars(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::Config(err.to_string())
    }
}
