//! Monthly aggregation of raw transactions
//!
//! Expense records are grouped into one row per (year, month, category,
//! periodicity, type). Categories with too few transactions are first folded
//! into a single bucket so that they never get feature columns of their own.

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::history::{CategoryType, Periodicity, TransactionRecord};
use chrono::Datelike;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// One row per (year, month, category) observed in history
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAggregate {
    pub year: i32,
    pub month: u32,
    pub category: String,
    pub periodicity: Periodicity,
    pub category_type: CategoryType,
    /// Sum of the amounts sharing this key
    pub total_amount: f64,
    /// Mean quantity, missing quantities counted as 0
    pub avg_quantity: f64,
    /// Number of transactions sharing this key
    pub transaction_count: usize,
}

impl MonthlyAggregate {
    /// Chronological ordering key
    pub fn period(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    fn sort_key(&self) -> (i32, u32, &str, Periodicity, CategoryType) {
        (
            self.year,
            self.month,
            self.category.as_str(),
            self.periodicity,
            self.category_type,
        )
    }
}

/// Names of the categories with fewer than `threshold` transactions
pub fn rare_categories(records: &[TransactionRecord], threshold: usize) -> HashSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.category.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count < threshold)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Relabel rare categories to the bucket label
///
/// Counts are taken over the records passed in, so callers filter to
/// expenses first.
pub fn relabel_rare_categories(
    records: &[TransactionRecord],
    threshold: usize,
    label: &str,
) -> Vec<TransactionRecord> {
    let rare = rare_categories(records, threshold);
    if !rare.is_empty() {
        let mut names: Vec<&String> = rare.iter().collect();
        names.sort();
        warn!(
            categories = ?names,
            bucket = label,
            "folding rare categories into bucket"
        );
    }

    records
        .iter()
        .map(|record| {
            if rare.contains(&record.category) {
                TransactionRecord {
                    category: label.to_string(),
                    ..record.clone()
                }
            } else {
                record.clone()
            }
        })
        .collect()
}

/// Group expense records into monthly aggregates
///
/// Income records are ignored. Fails with [`ForecastError::NoData`] when no
/// expense remains. The output is sorted by year, month, category,
/// periodicity and type.
pub fn aggregate_monthly(
    records: &[TransactionRecord],
    config: &ForecastConfig,
) -> Result<Vec<MonthlyAggregate>> {
    let expenses: Vec<TransactionRecord> = records
        .iter()
        .filter(|record| record.is_expense())
        .cloned()
        .collect();

    if expenses.is_empty() {
        return Err(ForecastError::NoData(
            "No expense transactions found to train the model".to_string(),
        ));
    }

    if let Some(bad) = expenses.iter().find(|record| !record.amount.is_finite()) {
        return Err(ForecastError::DataError(format!(
            "Non-finite amount in category {} on {}",
            bad.category, bad.date
        )));
    }

    let expenses = relabel_rare_categories(
        &expenses,
        config.rare_category_threshold,
        &config.rare_category_label,
    );

    let frame = records_frame(&expenses)?;
    let grouped = frame
        .lazy()
        .groupby_stable([
            col("year"),
            col("month"),
            col("category"),
            col("periodicity"),
            col("category_type"),
        ])
        .agg([
            col("amount").sum().alias("total_amount"),
            col("quantity").mean().alias("avg_quantity"),
            col("amount")
                .count()
                .cast(DataType::Int64)
                .alias("transaction_count"),
        ])
        .collect()?;

    let mut aggregates = frame_to_aggregates(&grouped)?;
    aggregates.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    info!(
        transactions = expenses.len(),
        aggregates = aggregates.len(),
        "aggregated expense history by month"
    );
    Ok(aggregates)
}

/// Build a flat frame of the records, quantities defaulted to 0
fn records_frame(records: &[TransactionRecord]) -> Result<DataFrame> {
    let years: Vec<i32> = records.iter().map(|r| r.date.year()).collect();
    let months: Vec<i32> = records.iter().map(|r| r.date.month() as i32).collect();
    let categories: Vec<&str> = records.iter().map(|r| r.category.as_str()).collect();
    let periodicities: Vec<&str> = records.iter().map(|r| r.periodicity.as_str()).collect();
    let types: Vec<&str> = records.iter().map(|r| r.category_type.as_str()).collect();
    let amounts: Vec<f64> = records.iter().map(|r| r.amount).collect();
    let quantities: Vec<f64> = records
        .iter()
        .map(|r| r.quantity.unwrap_or(0) as f64)
        .collect();

    let frame = df!(
        "year" => &years,
        "month" => &months,
        "category" => &categories,
        "periodicity" => &periodicities,
        "category_type" => &types,
        "amount" => &amounts,
        "quantity" => &quantities
    )?;
    Ok(frame)
}

fn frame_to_aggregates(grouped: &DataFrame) -> Result<Vec<MonthlyAggregate>> {
    let years = grouped.column("year")?.i32()?;
    let months = grouped.column("month")?.i32()?;
    let categories = grouped.column("category")?.utf8()?;
    let periodicities = grouped.column("periodicity")?.utf8()?;
    let types = grouped.column("category_type")?.utf8()?;
    let totals = grouped.column("total_amount")?.f64()?;
    let quantities = grouped.column("avg_quantity")?.f64()?;
    let counts = grouped.column("transaction_count")?.i64()?;

    let mut aggregates = Vec::with_capacity(grouped.height());
    for idx in 0..grouped.height() {
        let missing = || ForecastError::DataError(format!("Missing value in aggregate row {}", idx));

        let month = months.get(idx).ok_or_else(missing)?;
        let count = counts.get(idx).ok_or_else(missing)?;
        aggregates.push(MonthlyAggregate {
            year: years.get(idx).ok_or_else(missing)?,
            month: u32::try_from(month).map_err(|_| missing())?,
            category: categories.get(idx).ok_or_else(missing)?.to_string(),
            periodicity: periodicities.get(idx).ok_or_else(missing)?.parse()?,
            category_type: types.get(idx).ok_or_else(missing)?.parse()?,
            total_amount: totals.get(idx).ok_or_else(missing)?,
            avg_quantity: quantities.get(idx).unwrap_or(0.0),
            transaction_count: usize::try_from(count).map_err(|_| missing())?,
        });
    }

    Ok(aggregates)
}

