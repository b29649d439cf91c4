//! Feature encoding with an explicit column schema
//!
//! Training rows are encoded with [`FeatureEncoder::fit`], which fixes the
//! ordered column set as a [`FeatureSchema`]. Every later encoding goes
//! through [`FeatureEncoder::transform`] with that schema, so training and
//! inference matrices always have the same columns in the same order.
//! Indicator columns unknown to the schema are dropped and schema columns
//! absent from the input stay at 0.

use crate::aggregate::MonthlyAggregate;
use crate::history::{CategoryType, Periodicity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Numeric columns, always first and in this order
pub const NUMERIC_COLUMNS: [&str; 4] = ["year", "month", "avg_quantity", "transactions"];

const CATEGORY_PREFIX: &str = "category_";
const PERIODICITY_PREFIX: &str = "periodicity_";
const TYPE_PREFIX: &str = "type_";

/// A row ready to be encoded
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub year: i32,
    pub month: u32,
    pub category: String,
    pub periodicity: Periodicity,
    pub category_type: CategoryType,
    pub avg_quantity: f64,
    /// Transaction count, or the average count for synthetic rows
    pub transactions: f64,
}

impl From<&MonthlyAggregate> for FeatureRecord {
    fn from(aggregate: &MonthlyAggregate) -> Self {
        Self {
            year: aggregate.year,
            month: aggregate.month,
            category: aggregate.category.clone(),
            periodicity: aggregate.periodicity,
            category_type: aggregate.category_type,
            avg_quantity: aggregate.avg_quantity,
            transactions: aggregate.transaction_count as f64,
        }
    }
}

impl FeatureRecord {
    fn numeric_values(&self) -> [f64; 4] {
        [
            self.year as f64,
            self.month as f64,
            self.avg_quantity,
            self.transactions,
        ]
    }

    fn indicator_columns(&self) -> [String; 3] {
        [
            category_column(&self.category),
            periodicity_column(self.periodicity),
            type_column(self.category_type),
        ]
    }
}

/// Indicator column name for a category value
pub fn category_column(category: &str) -> String {
    format!("{}{}", CATEGORY_PREFIX, category)
}

/// Indicator column name for a periodicity value
pub fn periodicity_column(periodicity: Periodicity) -> String {
    format!("{}{}", PERIODICITY_PREFIX, periodicity.as_str())
}

/// Indicator column name for a category type value
pub fn type_column(category_type: CategoryType) -> String {
    format!("{}{}", TYPE_PREFIX, category_type.as_str())
}

/// Ordered column names a model was trained against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema from an ordered column list
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Whether the schema holds a column
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

/// Encoded rows together with the schema they conform to
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    schema: FeatureSchema,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// The schema the rows conform to
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    /// Encoded rows
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.schema.len()
    }

    /// Values of one column, if present
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.schema.position(name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Subset of rows, in the order given
    pub fn select_rows(&self, indices: &[usize]) -> FeatureMatrix {
        FeatureMatrix {
            schema: self.schema.clone(),
            rows: indices.iter().map(|&idx| self.rows[idx].clone()).collect(),
        }
    }
}

/// One-hot encoder for feature records
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Encode training rows, deriving the schema from them
    ///
    /// Indicator columns are sorted by value within each field so that the
    /// schema does not depend on the order of `records`.
    pub fn fit(records: &[FeatureRecord]) -> FeatureMatrix {
        let categories: BTreeSet<&str> = records.iter().map(|r| r.category.as_str()).collect();
        let periodicities: BTreeSet<&str> =
            records.iter().map(|r| r.periodicity.as_str()).collect();
        let types: BTreeSet<&str> = records.iter().map(|r| r.category_type.as_str()).collect();

        let mut columns: Vec<String> = NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(categories.iter().map(|v| format!("{}{}", CATEGORY_PREFIX, v)));
        columns.extend(periodicities.iter().map(|v| format!("{}{}", PERIODICITY_PREFIX, v)));
        columns.extend(types.iter().map(|v| format!("{}{}", TYPE_PREFIX, v)));

        Self::transform(records, &FeatureSchema::new(columns))
    }

    /// Encode rows against an existing schema
    ///
    /// Never fails: values the schema does not know simply contribute no
    /// indicator.
    pub fn transform(records: &[FeatureRecord], schema: &FeatureSchema) -> FeatureMatrix {
        let positions: HashMap<&str, usize> = schema
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        let mut unknown: BTreeSet<String> = BTreeSet::new();
        let rows = records
            .iter()
            .map(|record| {
                let mut row = vec![0.0; schema.len()];
                for (name, value) in NUMERIC_COLUMNS.iter().zip(record.numeric_values()) {
                    if let Some(&idx) = positions.get(name) {
                        row[idx] = value;
                    }
                }
                for column in record.indicator_columns() {
                    match positions.get(column.as_str()) {
                        Some(&idx) => row[idx] = 1.0,
                        None => {
                            unknown.insert(column);
                        }
                    }
                }
                row
            })
            .collect();

        if !unknown.is_empty() {
            warn!(
                columns = ?unknown,
                "indicator columns not in schema were dropped"
            );
        }

        FeatureMatrix {
            schema: schema.clone(),
            rows,
        }
    }
}
