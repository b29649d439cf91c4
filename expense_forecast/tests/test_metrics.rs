use assert_approx_eq::assert_approx_eq;
use expense_forecast::encoding::FeatureSchema;
use expense_forecast::metrics::{
    evaluate, mean_absolute_error, mean_squared_error, rank_importances,
    root_mean_squared_error,
};
use expense_forecast::ForecastError;
use pretty_assertions::assert_eq;

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    assert_approx_eq!(mean_absolute_error(&actual, &predicted), 2.4, 1e-9);
    assert_approx_eq!(mean_squared_error(&actual, &predicted), 6.0, 1e-9);
    assert_approx_eq!(root_mean_squared_error(&actual, &predicted), 6.0f64.sqrt(), 1e-9);

    let metrics = evaluate(&actual, &predicted).unwrap();
    assert_approx_eq!(metrics.mae, 2.4, 1e-9);
    assert_approx_eq!(metrics.rmse, metrics.mse.sqrt(), 1e-12);
}

#[test]
fn test_evaluate_rejects_bad_lengths() {
    assert!(matches!(
        evaluate(&[1.0, 2.0], &[1.0]),
        Err(ForecastError::DataError(_))
    ));
    assert!(evaluate(&[], &[]).is_err());
}

#[test]
fn test_rank_importances() {
    let schema = FeatureSchema::new(vec![
        "year".to_string(),
        "month".to_string(),
        "category_Rent".to_string(),
    ]);

    let ranked = rank_importances(&schema, &[0.2, 0.2, 0.6]);

    let names: Vec<&str> = ranked.iter().map(|r| r.feature.as_str()).collect();
    assert_eq!(names, vec!["category_Rent", "year", "month"]);
    assert_eq!(ranked[0].importance, 0.6);
}
