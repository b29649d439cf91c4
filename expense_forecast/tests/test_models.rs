use assert_approx_eq::assert_approx_eq;
use expense_forecast::encoding::{FeatureEncoder, FeatureMatrix, FeatureRecord, FeatureSchema};
use expense_forecast::models::RandomForestRegressor;
use expense_forecast::{CategoryType, ForecastError, ForestParams, Periodicity};

fn small_forest() -> ForestParams {
    ForestParams {
        n_trees: 25,
        ..ForestParams::default()
    }
}

/// Two categories with clearly different spend levels over 24 months
fn training_data() -> (FeatureMatrix, Vec<f64>) {
    let mut records = Vec::new();
    let mut targets = Vec::new();
    for idx in 0..24u32 {
        let year = 2022 + (idx / 12) as i32;
        let month = idx % 12 + 1;
        for (category, periodicity, level) in [
            ("Rent", Periodicity::Monthly, 800.0),
            ("Food", Periodicity::Variable, 150.0),
        ] {
            records.push(FeatureRecord {
                year,
                month,
                category: category.to_string(),
                periodicity,
                category_type: CategoryType::Expense,
                avg_quantity: 1.0,
                transactions: 1.0 + (idx % 3) as f64,
            });
            targets.push(level + (idx % 4) as f64 * 5.0);
        }
    }
    (FeatureEncoder::fit(&records), targets)
}

#[test]
fn test_forest_separates_categories() {
    let (features, targets) = training_data();
    let model = RandomForestRegressor::new(small_forest())
        .unwrap()
        .fit(&features, &targets)
        .unwrap();

    let predictions = model.predict(&features).unwrap();

    for (prediction, target) in predictions.iter().zip(&targets) {
        assert!((prediction - target).abs() < 60.0);
    }
    assert_eq!(model.n_trees(), 25);
}

#[test]
fn test_importances_are_normalised() {
    let (features, targets) = training_data();
    let model = RandomForestRegressor::new(small_forest())
        .unwrap()
        .fit(&features, &targets)
        .unwrap();

    let importances = model.feature_importances();

    assert_eq!(importances.len(), features.n_columns());
    assert_approx_eq!(importances.iter().sum::<f64>(), 1.0, 1e-9);
    assert!(importances.iter().all(|&v| v >= 0.0));
}

#[test]
fn test_fixed_seed_is_reproducible() {
    let (features, targets) = training_data();
    let params = ForestParams {
        max_features: 0.5,
        ..small_forest()
    };

    let first = RandomForestRegressor::new(params.clone())
        .unwrap()
        .fit(&features, &targets)
        .unwrap();
    let second = RandomForestRegressor::new(params)
        .unwrap()
        .fit(&features, &targets)
        .unwrap();

    assert_eq!(
        first.predict(&features).unwrap(),
        second.predict(&features).unwrap()
    );
    assert_eq!(first.feature_importances(), second.feature_importances());
}

#[test]
fn test_constant_target_predicts_constant() {
    let (features, targets) = training_data();
    let constant = vec![500.0; targets.len()];

    let model = RandomForestRegressor::new(small_forest())
        .unwrap()
        .fit(&features, &constant)
        .unwrap();

    assert!(model
        .predict(&features)
        .unwrap()
        .iter()
        .all(|&p| p == 500.0));
    assert!(model.feature_importances().iter().all(|&v| v == 0.0));
}

#[test]
fn test_schema_mismatch_is_rejected() {
    let (features, targets) = training_data();
    let model = RandomForestRegressor::new(small_forest())
        .unwrap()
        .fit(&features, &targets)
        .unwrap();
    let other = FeatureEncoder::transform(&[], &FeatureSchema::new(vec!["year".to_string()]));

    assert!(matches!(
        model.predict(&other),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_empty_and_mismatched_inputs() {
    let (features, targets) = training_data();
    let forest = RandomForestRegressor::new(small_forest()).unwrap();
    let empty = features.select_rows(&[]);

    assert!(matches!(
        forest.fit(&empty, &[]),
        Err(ForecastError::InsufficientData { .. })
    ));
    assert!(matches!(
        forest.fit(&features, &targets[1..]),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_invalid_params_are_rejected() {
    let params = ForestParams {
        n_trees: 0,
        ..ForestParams::default()
    };
    assert!(matches!(
        RandomForestRegressor::new(params),
        Err(ForecastError::InvalidParameter(_))
    ));

    let params = ForestParams {
        max_features: 1.5,
        ..ForestParams::default()
    };
    assert!(RandomForestRegressor::new(params).is_err());
}
