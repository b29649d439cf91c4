//! Pivot of per-category predictions into fixed and variable spend

use crate::encoding::FeatureRecord;
use crate::error::{ForecastError, Result};
use crate::history::Periodicity;
use crate::synthesis::Period;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Economic segment of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Monthly recurring spend
    Fijo,
    /// Everything else
    Variable,
}

impl From<Periodicity> for Segment {
    fn from(periodicity: Periodicity) -> Self {
        match periodicity {
            Periodicity::Monthly => Segment::Fijo,
            Periodicity::Variable | Periodicity::Annual => Segment::Variable,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Fijo => f.write_str("Fijo"),
            Segment::Variable => f.write_str("Variable"),
        }
    }
}

/// Forecast for one future month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub period: Period,
    pub period_label: String,
    #[serde(rename = "Fijo")]
    pub fijo: f64,
    #[serde(rename = "Variable")]
    pub variable: f64,
    /// Always `fijo + variable`
    pub total: f64,
}

impl fmt::Display for ForecastRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} {:>12.2} {:>12.2} {:>12.2}",
            self.period_label, self.fijo, self.variable, self.total
        )
    }
}

/// Sum predictions per period and segment, one row per period in order
///
/// A segment with no rows in a period is reported as 0.
pub fn aggregate_segments(
    records: &[FeatureRecord],
    predictions: &[f64],
) -> Result<Vec<ForecastRow>> {
    if records.len() != predictions.len() {
        return Err(ForecastError::DataError(format!(
            "Rows ({}) don't match predictions ({})",
            records.len(),
            predictions.len()
        )));
    }

    let mut totals: BTreeMap<Period, (f64, f64)> = BTreeMap::new();
    for (record, &amount) in records.iter().zip(predictions) {
        let period = Period::new(record.year, record.month)?;
        let (fijo, variable) = totals.entry(period).or_insert((0.0, 0.0));
        match Segment::from(record.periodicity) {
            Segment::Fijo => *fijo += amount,
            Segment::Variable => *variable += amount,
        }
    }

    Ok(totals
        .into_iter()
        .map(|(period, (fijo, variable))| ForecastRow {
            period,
            period_label: period.label(),
            fijo,
            variable,
            total: fijo + variable,
        })
        .collect())
}
