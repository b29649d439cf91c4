//! Regression models for expense forecasting
//!
//! The engine uses a single model family: a random forest of CART regression
//! trees. It copes with the many mostly-zero indicator columns of the
//! encoded history and exposes impurity-based feature importances.

pub mod random_forest;
pub(crate) mod tree;

pub use random_forest::{FittedForest, RandomForestRegressor};
