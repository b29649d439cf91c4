//! Transaction history handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Declared spending cadence of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Periodicity {
    /// Fixed recurring spend
    Monthly,
    /// Irregular spend
    Variable,
    /// Once a year
    Annual,
}

impl Periodicity {
    /// Tag used in feature column names
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Monthly => "monthly",
            Periodicity::Variable => "variable",
            Periodicity::Annual => "annual",
        }
    }
}

impl FromStr for Periodicity {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "mensual" => Ok(Periodicity::Monthly),
            "variable" => Ok(Periodicity::Variable),
            "annual" | "yearly" | "anual" => Ok(Periodicity::Annual),
            other => Err(ForecastError::DataError(format!(
                "Unknown periodicity: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Periodicity {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Periodicity> for String {
    fn from(value: Periodicity) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a category moves money out or in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryType {
    Expense,
    Income,
}

impl CategoryType {
    /// Tag used in feature column names
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Expense => "expense",
            CategoryType::Income => "income",
        }
    }
}

impl FromStr for CategoryType {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "gasto" => Ok(CategoryType::Expense),
            "income" | "ingreso" => Ok(CategoryType::Income),
            other => Err(ForecastError::DataError(format!(
                "Unknown category type: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for CategoryType {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CategoryType> for String {
    fn from(value: CategoryType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single dated, categorized money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Amount moved
    pub amount: f64,
    /// Number of units, when recorded
    pub quantity: Option<i64>,
    /// Date of the movement
    pub date: NaiveDate,
    /// Category name
    pub category: String,
    /// Category periodicity
    pub periodicity: Periodicity,
    /// Category type
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl TransactionRecord {
    /// Create an expense record
    pub fn expense(
        amount: f64,
        date: NaiveDate,
        category: &str,
        periodicity: Periodicity,
    ) -> Self {
        Self {
            amount,
            quantity: None,
            date,
            category: category.to_string(),
            periodicity,
            category_type: CategoryType::Expense,
        }
    }

    /// Create an income record
    pub fn income(amount: f64, date: NaiveDate, category: &str) -> Self {
        Self {
            amount,
            quantity: None,
            date,
            category: category.to_string(),
            periodicity: Periodicity::Monthly,
            category_type: CategoryType::Income,
        }
    }

    /// Attach a quantity to the record
    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Whether the record is an expense
    pub fn is_expense(&self) -> bool {
        self.category_type == CategoryType::Expense
    }
}

/// Source of the transaction history a forecast is trained on
pub trait TransactionHistoryProvider {
    /// Fetch every dated transaction
    fn fetch_transactions(&self) -> Result<Vec<TransactionRecord>>;
}

/// History held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    records: Vec<TransactionRecord>,
}

impl InMemoryHistory {
    /// Create a history from a set of records
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record
    pub fn push(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }
}

impl TransactionHistoryProvider for InMemoryHistory {
    fn fetch_transactions(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.records.clone())
    }
}

/// One line of a history CSV file
#[derive(Debug, Deserialize)]
struct CsvRow {
    amount: f64,
    quantity: Option<i64>,
    date: Option<NaiveDate>,
    category: String,
    periodicity: Periodicity,
    #[serde(rename = "type")]
    category_type: CategoryType,
}

/// History read from a headered CSV file
///
/// Expected columns: `amount,quantity,date,category,periodicity,type`.
/// Rows with an empty date are skipped.
#[derive(Debug, Clone)]
pub struct CsvHistory {
    path: PathBuf,
}

impl CsvHistory {
    /// Create a provider reading from `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the CSV file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionHistoryProvider for CsvHistory {
    fn fetch_transactions(&self) -> Result<Vec<TransactionRecord>> {
        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            let Some(date) = row.date else {
                skipped += 1;
                continue;
            };
            records.push(TransactionRecord {
                amount: row.amount,
                quantity: row.quantity,
                date,
                category: row.category,
                periodicity: row.periodicity,
                category_type: row.category_type,
            });
        }

        debug!(
            path = %self.path.display(),
            records = records.len(),
            skipped,
            "loaded transaction history"
        );
        Ok(records)
    }
}
