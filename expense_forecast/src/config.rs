//! Forecast configuration
//!
//! Every knob has a default matching the behaviour the tracker ships with, so
//! `ForecastConfig::default()` is a complete configuration. A JSON file may
//! override any subset of fields.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming a JSON configuration file
pub const CONFIG_FILE_ENV: &str = "FORECAST_CONFIG_FILE";

/// Hyperparameters of the tree ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Maximum depth of each tree, unlimited when `None`
    pub max_depth: Option<usize>,
    /// Minimum number of samples required to split a node
    pub min_samples_split: usize,
    /// Minimum number of samples in each leaf
    pub min_samples_leaf: usize,
    /// Fraction of feature columns considered at every split
    pub max_features: f64,
    /// Draw a bootstrap sample for each tree
    pub bootstrap: bool,
    /// Seed for the ensemble's random number generator
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: 1.0,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Configuration of a forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Months withheld at the end of history for the holdout evaluation
    pub horizon: usize,
    /// Minimum number of monthly aggregates needed to train
    pub min_training_records: usize,
    /// Categories with fewer transactions than this are folded into one bucket
    pub rare_category_threshold: usize,
    /// Name of the rare-category bucket
    pub rare_category_label: String,
    /// Number of rolling-origin cross-validation folds
    pub cv_folds: usize,
    /// Tree ensemble hyperparameters
    pub forest: ForestParams,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 6,
            min_training_records: 12,
            rare_category_threshold: 5,
            rare_category_label: "OTRAS".to_string(),
            cv_folds: 5,
            forest: ForestParams::default(),
        }
    }
}

impl ForecastConfig {
    /// Parse a configuration from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Load the file named by `FORECAST_CONFIG_FILE`, or the defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.is_empty() => Self::from_json_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Builder-style override of the holdout horizon
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Builder-style override of the ensemble size
    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.forest.n_trees = n_trees;
        self
    }

    /// Builder-style override of the ensemble seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.forest.seed = seed;
        self
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Horizon must be positive".to_string(),
            ));
        }
        if self.cv_folds < 2 {
            return Err(ForecastError::InvalidParameter(
                "Cross-validation needs at least 2 folds".to_string(),
            ));
        }
        if self.rare_category_label.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Rare category label must not be empty".to_string(),
            ));
        }
        self.forest.validate()
    }
}

impl ForestParams {
    /// Check the ensemble hyperparameters
    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(ForecastError::InvalidParameter(
                "Number of trees must be positive".to_string(),
            ));
        }
        if !(self.max_features > 0.0 && self.max_features <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "max_features must be in (0, 1], got {}",
                self.max_features
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(ForecastError::InvalidParameter(
                "min_samples_leaf must be positive".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ForecastError::InvalidParameter(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ForecastError::InvalidParameter(
                "max_depth must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}
