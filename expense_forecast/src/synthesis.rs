//! Synthetic future rows built from category baselines

use crate::baseline::CategoryBaseline;
use crate::encoding::FeatureRecord;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Create a period, validating the month
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidParameter(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Period containing a date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Human readable label such as "March 2025"
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|date| date.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{:02}/{}", self.month, self.year))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// The `months` calendar months following the one containing `today`
pub fn future_periods(today: NaiveDate, months: usize) -> Result<Vec<Period>> {
    if months == 0 {
        return Err(ForecastError::InvalidParameter(
            "Number of months to forecast must be positive".to_string(),
        ));
    }

    let mut periods = Vec::with_capacity(months);
    let mut current = Period::containing(today);
    for _ in 0..months {
        current = current.next();
        periods.push(current);
    }
    Ok(periods)
}

/// One synthetic row per period and baseline, periods outermost
pub fn synthesize(baselines: &[CategoryBaseline], periods: &[Period]) -> Result<Vec<FeatureRecord>> {
    if baselines.is_empty() {
        return Err(ForecastError::NoCategories);
    }

    Ok(periods
        .iter()
        .flat_map(|period| {
            baselines.iter().map(move |baseline| FeatureRecord {
                year: period.year,
                month: period.month,
                category: baseline.category.clone(),
                periodicity: baseline.periodicity,
                category_type: baseline.category_type,
                avg_quantity: baseline.avg_quantity,
                transactions: baseline.avg_transactions,
            })
        })
        .collect())
}
