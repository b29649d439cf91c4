//! # Finance Tracker
//!
//! `finance_tracker` bundles the crates of the personal finance tracker.
//! The only engineered subsystem is the expense forecasting engine,
//! re-exported here as [`forecast`].
//!
//! ## Example
//!
//! ```
//! use finance_tracker::forecast::{ForecastConfig, InMemoryHistory};
//!
//! let history = InMemoryHistory::default();
//! assert!(history.is_empty());
//! assert_eq!(ForecastConfig::default().horizon, 6);
//! ```

pub use expense_forecast as forecast;

pub use expense_forecast::{
    ExpenseForecaster, ForecastConfig, ForecastError, ForecastReport, ForecastRow,
    TransactionRecord,
};
