//! Time-respecting train/test splitters
//!
//! Both splitters assume the rows are already in chronological order and
//! never place a test index before a training index.

use crate::error::{ForecastError, Result};
use std::ops::Range;

/// Withholds the last `horizon` rows as a test set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChronologicalHoldout {
    horizon: usize,
}

impl ChronologicalHoldout {
    /// Create a holdout splitter
    pub fn new(horizon: usize) -> Result<Self> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Holdout horizon must be positive".to_string(),
            ));
        }
        Ok(Self { horizon })
    }

    /// Number of withheld rows
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Split `n_samples` rows into (train, test) index ranges
    pub fn split(&self, n_samples: usize) -> Result<Fold> {
        if n_samples <= self.horizon {
            return Err(ForecastError::InsufficientData {
                required: self.horizon + 1,
                found: n_samples,
            });
        }
        let boundary = n_samples - self.horizon;
        Ok(Fold {
            train: 0..boundary,
            test: boundary..n_samples,
        })
    }
}

/// One train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Range<usize>,
    pub test: Range<usize>,
}

/// Rolling-origin K-fold splitter
///
/// The rows are cut into `n_splits + 1` blocks of `n / (n_splits + 1)` rows,
/// with any remainder added to the first block. Fold `i` tests on block
/// `i + 1` and trains on everything before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSeriesSplit {
    n_splits: usize,
}

impl TimeSeriesSplit {
    /// Create a splitter with `n_splits` folds
    pub fn new(n_splits: usize) -> Result<Self> {
        if n_splits < 2 {
            return Err(ForecastError::InvalidParameter(
                "Time series split needs at least 2 folds".to_string(),
            ));
        }
        Ok(Self { n_splits })
    }

    /// Number of folds
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Produce the folds for `n_samples` rows
    pub fn split(&self, n_samples: usize) -> Result<Vec<Fold>> {
        let test_size = n_samples / (self.n_splits + 1);
        if test_size == 0 {
            return Err(ForecastError::InsufficientData {
                required: self.n_splits + 1,
                found: n_samples,
            });
        }

        let first_test = n_samples - self.n_splits * test_size;
        Ok((0..self.n_splits)
            .map(|fold| {
                let start = first_test + fold * test_size;
                Fold {
                    train: 0..start,
                    test: start..start + test_size,
                }
            })
            .collect())
    }
}
