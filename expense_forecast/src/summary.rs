//! Month-by-month income and expense summary of the raw history

use crate::history::{CategoryType, TransactionRecord};
use crate::synthesis::Period;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Income, expense and savings of one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub period: Period,
    pub income: f64,
    pub expense: f64,
    /// `income - expense`
    pub savings: f64,
}

impl fmt::Display for MonthlySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} {:>12.2} {:>12.2} {:>12.2}",
            self.period.label(),
            self.income,
            self.expense,
            self.savings
        )
    }
}

/// Summarize every month present in the history, oldest first
pub fn summarize_months(records: &[TransactionRecord]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<Period, (f64, f64)> = BTreeMap::new();
    for record in records {
        let (income, expense) = months
            .entry(Period::containing(record.date))
            .or_insert((0.0, 0.0));
        match record.category_type {
            CategoryType::Income => *income += record.amount,
            CategoryType::Expense => *expense += record.amount,
        }
    }

    months
        .into_iter()
        .map(|(period, (income, expense))| MonthlySummary {
            period,
            income,
            expense,
            savings: income - expense,
        })
        .collect()
}
