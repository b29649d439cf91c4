//! Model training and honest evaluation
//!
//! Three separate fits happen per run:
//!
//! 1. a holdout model trained on everything but the last `horizon` rows and
//!    scored on those rows,
//! 2. one model per rolling-origin fold, whose out-of-fold predictions are
//!    scored together,
//! 3. the production model, trained on all rows, which is the one used for
//!    future predictions and feature importances.

use crate::aggregate::MonthlyAggregate;
use crate::config::ForecastConfig;
use crate::encoding::{FeatureEncoder, FeatureMatrix, FeatureRecord, FeatureSchema};
use crate::error::{ForecastError, Result};
use crate::metrics::{evaluate, rank_importances, ErrorMetrics, FeatureImportance};
use crate::models::{FittedForest, RandomForestRegressor};
use crate::validation::{ChronologicalHoldout, TimeSeriesSplit};
use std::ops::Range;
use tracing::{debug, info};

/// Production model plus its evaluation
#[derive(Debug, Clone)]
pub struct TrainedForecaster {
    model: FittedForest,
    holdout_metrics: ErrorMetrics,
    cv_metrics: ErrorMetrics,
    importances: Vec<FeatureImportance>,
}

impl TrainedForecaster {
    /// The production model, fitted on the full history
    pub fn model(&self) -> &FittedForest {
        &self.model
    }

    /// Schema every inference row must be encoded against
    pub fn schema(&self) -> &FeatureSchema {
        self.model.schema()
    }

    /// Error on the chronological holdout
    pub fn holdout_metrics(&self) -> &ErrorMetrics {
        &self.holdout_metrics
    }

    /// Error of the rolling-origin out-of-fold predictions
    pub fn cv_metrics(&self) -> &ErrorMetrics {
        &self.cv_metrics
    }

    /// Feature importances of the production model, most important first
    pub fn importances(&self) -> &[FeatureImportance] {
        &self.importances
    }

    /// Encode rows against the production schema and predict them
    pub fn predict(&self, records: &[FeatureRecord]) -> Result<Vec<f64>> {
        let features = FeatureEncoder::transform(records, self.schema());
        self.model.predict(&features)
    }
}

/// Train and evaluate on time-ordered monthly aggregates
pub fn train(aggregates: &[MonthlyAggregate], config: &ForecastConfig) -> Result<TrainedForecaster> {
    config.validate()?;
    if aggregates.len() < config.min_training_records {
        return Err(ForecastError::InsufficientData {
            required: config.min_training_records,
            found: aggregates.len(),
        });
    }

    let records: Vec<FeatureRecord> = aggregates.iter().map(FeatureRecord::from).collect();
    let features = FeatureEncoder::fit(&records);
    let targets: Vec<f64> = aggregates.iter().map(|a| a.total_amount).collect();
    let forest = RandomForestRegressor::new(config.forest.clone())?;

    info!(
        rows = features.n_rows(),
        columns = features.n_columns(),
        model = forest.name(),
        "training expense model"
    );

    let holdout_metrics = holdout_evaluation(&forest, &features, &targets, config.horizon)?;
    let cv_metrics = cross_validate(&forest, &features, &targets, config.cv_folds)?;

    let model = forest.fit(&features, &targets)?;
    let importances = rank_importances(model.schema(), model.feature_importances());

    info!(
        holdout_mae = holdout_metrics.mae,
        holdout_rmse = holdout_metrics.rmse,
        cv_mae = cv_metrics.mae,
        cv_rmse = cv_metrics.rmse,
        "expense model trained"
    );

    Ok(TrainedForecaster {
        model,
        holdout_metrics,
        cv_metrics,
        importances,
    })
}

/// Fit on all but the last `horizon` rows and score on them
pub fn holdout_evaluation(
    forest: &RandomForestRegressor,
    features: &FeatureMatrix,
    targets: &[f64],
    horizon: usize,
) -> Result<ErrorMetrics> {
    let fold = ChronologicalHoldout::new(horizon)?.split(targets.len())?;
    let predictions = fit_and_predict(forest, features, targets, &fold.train, &fold.test)?;
    evaluate(&targets[fold.test], &predictions)
}

/// Rolling-origin cross-validation
///
/// Out-of-fold predictions are gathered in row order and scored once. Rows
/// in the first block never appear in a test fold and are not scored.
pub fn cross_validate(
    forest: &RandomForestRegressor,
    features: &FeatureMatrix,
    targets: &[f64],
    n_splits: usize,
) -> Result<ErrorMetrics> {
    let folds = TimeSeriesSplit::new(n_splits)?.split(targets.len())?;

    let mut actual = Vec::new();
    let mut predicted = Vec::new();
    for (idx, fold) in folds.iter().enumerate() {
        let predictions = fit_and_predict(forest, features, targets, &fold.train, &fold.test)?;
        let fold_targets = &targets[fold.test.clone()];
        debug!(
            fold = idx,
            train = fold.train.len(),
            test = fold.test.len(),
            mae = crate::metrics::mean_absolute_error(fold_targets, &predictions),
            "cross-validation fold"
        );
        actual.extend_from_slice(fold_targets);
        predicted.extend(predictions);
    }

    evaluate(&actual, &predicted)
}

fn fit_and_predict(
    forest: &RandomForestRegressor,
    features: &FeatureMatrix,
    targets: &[f64],
    train: &Range<usize>,
    test: &Range<usize>,
) -> Result<Vec<f64>> {
    let train_idx: Vec<usize> = train.clone().collect();
    let test_idx: Vec<usize> = test.clone().collect();
    let model = forest.fit(&features.select_rows(&train_idx), &targets[train.clone()])?;
    model.predict(&features.select_rows(&test_idx))
}
