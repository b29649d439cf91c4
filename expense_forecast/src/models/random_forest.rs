//! Bagged ensemble of regression trees

use crate::config::ForestParams;
use crate::encoding::{FeatureMatrix, FeatureSchema};
use crate::error::{ForecastError, Result};
use crate::models::tree::{RegressionTree, TreeParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Random forest regressor
///
/// Each tree is grown on a bootstrap sample of the rows and considers a
/// random subset of the columns at every split. Tree `i` is seeded with
/// `seed + i`, so fits are reproducible.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    name: String,
    params: ForestParams,
}

/// A fitted random forest, bound to the schema it was trained on
#[derive(Debug, Clone)]
pub struct FittedForest {
    name: String,
    schema: FeatureSchema,
    trees: Vec<RegressionTree>,
    importances: Vec<f64>,
}

impl RandomForestRegressor {
    /// Create a new forest with the given hyperparameters
    pub fn new(params: ForestParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            name: format!("Random Forest (trees={}, seed={})", params.n_trees, params.seed),
            params,
        })
    }

    /// Name of the model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hyperparameters of the model
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Fit the ensemble on an encoded matrix and its targets
    pub fn fit(&self, features: &FeatureMatrix, targets: &[f64]) -> Result<FittedForest> {
        let rows = features.rows();
        if rows.is_empty() {
            return Err(ForecastError::InsufficientData {
                required: 1,
                found: 0,
            });
        }
        if rows.len() != targets.len() {
            return Err(ForecastError::DataError(format!(
                "Feature rows ({}) don't match targets ({})",
                rows.len(),
                targets.len()
            )));
        }
        if targets.iter().any(|t| !t.is_finite()) {
            return Err(ForecastError::DataError(
                "Targets must be finite".to_string(),
            ));
        }

        let n_features = features.n_columns();
        let tree_params = TreeParams {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            min_samples_leaf: self.params.min_samples_leaf,
            max_features: ((self.params.max_features * n_features as f64) as usize).max(1),
        };

        let n = rows.len();
        let trees: Vec<RegressionTree> = (0..self.params.n_trees)
            .map(|tree_idx| {
                let mut rng = StdRng::seed_from_u64(self.params.seed.wrapping_add(tree_idx as u64));
                let sample: Vec<usize> = if self.params.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::fit(rows, targets, sample, &tree_params, &mut rng)
            })
            .collect();

        let importances = ensemble_importances(&trees, n_features);
        debug!(
            trees = trees.len(),
            rows = n,
            columns = n_features,
            avg_nodes = trees.iter().map(|t| t.node_count()).sum::<usize>() as f64
                / trees.len() as f64,
            "fitted random forest"
        );

        Ok(FittedForest {
            name: self.name.clone(),
            schema: features.schema().clone(),
            trees,
            importances,
        })
    }
}

/// Average the per-tree normalised importances and renormalise
fn ensemble_importances(trees: &[RegressionTree], n_features: usize) -> Vec<f64> {
    let mut totals = vec![0.0; n_features];
    for tree in trees {
        let decrease = tree.impurity_decrease();
        let tree_total: f64 = decrease.iter().sum();
        if tree_total > 0.0 {
            for (total, value) in totals.iter_mut().zip(decrease) {
                *total += value / tree_total;
            }
        }
    }

    let sum: f64 = totals.iter().sum();
    if sum > 0.0 {
        totals.iter_mut().for_each(|v| *v /= sum);
    }
    totals
}

impl FittedForest {
    /// Name of the model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema the forest was trained on
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Number of trees in the ensemble
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Normalised importance of every schema column, in schema order
    ///
    /// Sums to 1.0 unless no tree found a single split, in which case every
    /// entry is 0.
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    /// Predict every row of an encoded matrix
    ///
    /// The matrix must have been encoded against this forest's schema.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        if features.schema() != &self.schema {
            return Err(ForecastError::DataError(format!(
                "Feature schema mismatch: model expects {} columns, got {}",
                self.schema.len(),
                features.n_columns()
            )));
        }

        let n_trees = self.trees.len() as f64;
        Ok(features
            .rows()
            .iter()
            .map(|row| self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>() / n_trees)
            .collect())
    }
}
