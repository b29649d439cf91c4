//! # Expense Forecast
//!
//! Forecasting engine of a personal finance tracker. It turns a history of
//! dated, categorized expenses into a multi-month projection split into
//! fixed ("Fijo") and variable spend, together with accuracy metrics and the
//! input signals that drove the prediction.
//!
//! ## Pipeline
//!
//! - **Aggregation**: expenses grouped per (year, month, category), rare
//!   categories folded into one bucket
//! - **Baselines**: average behaviour of every category
//! - **Encoding**: numeric plus one-hot columns under an explicit schema
//! - **Training**: random forest with a chronological holdout and
//!   rolling-origin cross-validation
//! - **Synthesis**: future rows replayed from the baselines
//! - **Segments**: predictions pivoted into Fijo / Variable per month
//!
//! ## Quick Start
//!
//! ```no_run
//! use expense_forecast::history::CsvHistory;
//! use expense_forecast::ExpenseForecaster;
//!
//! let forecaster = ExpenseForecaster::new(CsvHistory::new("history.csv"));
//! let report = forecaster.forecast(6)?;
//!
//! for row in &report.rows {
//!     println!("{}: {:.2}", row.period_label, row.total);
//! }
//! # Ok::<(), expense_forecast::ForecastError>(())
//! ```

pub mod aggregate;
pub mod baseline;
pub mod config;
pub mod encoding;
pub mod error;
pub mod forecaster;
pub mod history;
pub mod metrics;
pub mod models;
pub mod segments;
pub mod summary;
pub mod synthesis;
pub mod trainer;
pub mod validation;

// Re-export commonly used types
pub use crate::config::{ForecastConfig, ForestParams};
pub use crate::error::{ForecastError, Result};
pub use crate::forecaster::{forecast_records, ExpenseForecaster, ForecastReport};
pub use crate::history::{
    CategoryType, CsvHistory, InMemoryHistory, Periodicity, TransactionHistoryProvider,
    TransactionRecord,
};
pub use crate::segments::ForecastRow;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
