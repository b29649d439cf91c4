//! End-to-end expense forecast
//!
//! history → monthly aggregates → {baselines, trained model} → synthetic
//! future rows → predictions → fixed/variable segments.
//!
//! Nothing is cached between calls: every forecast retrains from scratch.

use crate::aggregate::aggregate_monthly;
use crate::baseline::build_baselines;
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::history::{TransactionHistoryProvider, TransactionRecord};
use crate::metrics::{ErrorMetrics, FeatureImportance};
use crate::segments::{aggregate_segments, ForecastRow};
use crate::synthesis::{future_periods, synthesize};
use crate::trainer::train;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Everything a forecast call hands back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    /// One row per future month, in chronological order
    pub rows: Vec<ForecastRow>,
    /// Error on the chronological holdout
    pub holdout_metrics: ErrorMetrics,
    /// Error of the rolling-origin cross-validation
    pub cv_metrics: ErrorMetrics,
    /// Feature importances of the production model, most important first
    pub importances: Vec<FeatureImportance>,
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<16} {:>12} {:>12} {:>12}",
            "Period", "Fijo", "Variable", "Total"
        )?;
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        writeln!(f)?;
        writeln!(f, "Holdout metrics:")?;
        write!(f, "{}", self.holdout_metrics)?;
        writeln!(f, "Cross-validation metrics:")?;
        write!(f, "{}", self.cv_metrics)?;
        Ok(())
    }
}

/// Forecasts future expenses from a transaction history provider
#[derive(Debug, Clone)]
pub struct ExpenseForecaster<P> {
    provider: P,
    config: ForecastConfig,
}

impl<P: TransactionHistoryProvider> ExpenseForecaster<P> {
    /// Create a forecaster with the default configuration
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: ForecastConfig::default(),
        }
    }

    /// Create a forecaster with a custom configuration
    pub fn with_config(provider: P, config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// The configuration in use
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast the `months` calendar months after the current one
    pub fn forecast(&self, months: usize) -> Result<ForecastReport> {
        self.forecast_from(months, Local::now().date_naive())
    }

    /// Forecast the `months` calendar months after the one containing `today`
    pub fn forecast_from(&self, months: usize, today: NaiveDate) -> Result<ForecastReport> {
        if months == 0 {
            return Err(ForecastError::InvalidParameter(
                "Number of months to forecast must be positive".to_string(),
            ));
        }
        let records = self.provider.fetch_transactions()?;
        forecast_records(&records, months, today, &self.config)
    }
}

/// Run the whole pipeline over an in-memory history
pub fn forecast_records(
    records: &[TransactionRecord],
    months: usize,
    today: NaiveDate,
    config: &ForecastConfig,
) -> Result<ForecastReport> {
    info!(records = records.len(), months, %today, "starting expense forecast");

    let aggregates = aggregate_monthly(records, config)?;
    let trained = train(&aggregates, config)?;
    let baselines = build_baselines(&aggregates);

    let periods = future_periods(today, months)?;
    let future_rows = synthesize(&baselines, &periods)?;
    let predictions = trained.predict(&future_rows)?;
    let rows = aggregate_segments(&future_rows, &predictions)?;

    info!(
        periods = rows.len(),
        categories = baselines.len(),
        "expense forecast ready"
    );

    Ok(ForecastReport {
        rows,
        holdout_metrics: *trained.holdout_metrics(),
        cv_metrics: *trained.cv_metrics(),
        importances: trained.importances().to_vec(),
    })
}
