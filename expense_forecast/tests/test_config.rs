use expense_forecast::{ForecastConfig, ForecastError, ForestParams};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let config = ForecastConfig::default();

    assert_eq!(config.horizon, 6);
    assert_eq!(config.min_training_records, 12);
    assert_eq!(config.rare_category_threshold, 5);
    assert_eq!(config.rare_category_label, "OTRAS");
    assert_eq!(config.cv_folds, 5);
    assert_eq!(config.forest, ForestParams::default());
    assert_eq!(config.forest.seed, 42);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_overrides() {
    let config = ForecastConfig::from_json_str(
        r#"{ "horizon": 3, "rare_category_label": "OTHER", "forest": { "n_trees": 50 } }"#,
    )
    .unwrap();

    assert_eq!(config.horizon, 3);
    assert_eq!(config.rare_category_label, "OTHER");
    assert_eq!(config.forest.n_trees, 50);
    assert_eq!(config.forest.seed, 42);
    assert_eq!(config.cv_folds, 5);
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(matches!(
        ForecastConfig::from_json_str(r#"{ "horizon": 0 }"#),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(matches!(
        ForecastConfig::from_json_str(r#"{ "forest": { "max_features": 0.0 } }"#),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(matches!(
        ForecastConfig::from_json_str(r#"{ "cv_folds": 1 }"#),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        ForecastConfig::from_json_str("{ horizon: "),
        Err(ForecastError::Config(_))
    ));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "cv_folds": 3, "forest": {{ "seed": 7 }} }}"#).unwrap();

    let config = ForecastConfig::from_json_file(file.path()).unwrap();

    assert_eq!(config.cv_folds, 3);
    assert_eq!(config.forest.seed, 7);
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        ForecastConfig::from_json_file("/nonexistent/forecast.json"),
        Err(ForecastError::IoError(_))
    ));
}

#[test]
fn test_builders() {
    let config = ForecastConfig::default()
        .with_horizon(4)
        .with_trees(10)
        .with_seed(99);

    assert_eq!(config.horizon, 4);
    assert_eq!(config.forest.n_trees, 10);
    assert_eq!(config.forest.seed, 99);
}
