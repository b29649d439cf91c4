use expense_forecast::validation::{ChronologicalHoldout, Fold, TimeSeriesSplit};
use expense_forecast::ForecastError;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_holdout_withholds_tail() {
    let holdout = ChronologicalHoldout::new(6).unwrap();

    let fold = holdout.split(12).unwrap();

    assert_eq!(
        fold,
        Fold {
            train: 0..6,
            test: 6..12
        }
    );
}

#[rstest]
#[case(6, 6)]
#[case(6, 3)]
#[case(1, 1)]
fn test_holdout_needs_training_rows(#[case] horizon: usize, #[case] n_samples: usize) {
    let holdout = ChronologicalHoldout::new(horizon).unwrap();

    let result = holdout.split(n_samples);

    assert!(matches!(
        result,
        Err(ForecastError::InsufficientData { required, found }) if required == horizon + 1 && found == n_samples
    ));
}

#[test]
fn test_zero_horizon_is_invalid() {
    assert!(matches!(
        ChronologicalHoldout::new(0),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_time_series_split_layout() {
    let splitter = TimeSeriesSplit::new(5).unwrap();

    let folds = splitter.split(13).unwrap();

    let expected = vec![
        Fold { train: 0..3, test: 3..5 },
        Fold { train: 0..5, test: 5..7 },
        Fold { train: 0..7, test: 7..9 },
        Fold { train: 0..9, test: 9..11 },
        Fold { train: 0..11, test: 11..13 },
    ];
    assert_eq!(folds, expected);
}

#[rstest]
#[case(12, 5)]
#[case(40, 5)]
#[case(7, 3)]
#[case(100, 10)]
fn test_test_blocks_follow_training(#[case] n_samples: usize, #[case] n_splits: usize) {
    let folds = TimeSeriesSplit::new(n_splits).unwrap().split(n_samples).unwrap();

    assert_eq!(folds.len(), n_splits);
    for fold in &folds {
        assert!(!fold.train.is_empty());
        assert_eq!(fold.train.end, fold.test.start);
    }
    assert_eq!(folds.last().unwrap().test.end, n_samples);
    for pair in folds.windows(2) {
        assert_eq!(pair[0].test.end, pair[1].test.start);
    }
}

#[test]
fn test_split_needs_enough_rows() {
    let splitter = TimeSeriesSplit::new(5).unwrap();

    assert!(matches!(
        splitter.split(5),
        Err(ForecastError::InsufficientData { required: 6, found: 5 })
    ));
}

#[test]
fn test_single_fold_is_invalid() {
    assert!(matches!(
        TimeSeriesSplit::new(1),
        Err(ForecastError::InvalidParameter(_))
    ));
}
