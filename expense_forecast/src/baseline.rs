//! Per-category baseline profiles used to synthesize future rows

use crate::aggregate::MonthlyAggregate;
use crate::history::{CategoryType, Periodicity};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Historically averaged behaviour of one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBaseline {
    pub category: String,
    pub periodicity: Periodicity,
    pub category_type: CategoryType,
    /// Mean of the monthly average quantities
    pub avg_quantity: f64,
    /// Mean number of transactions per month the category appeared in
    pub avg_transactions: f64,
}

/// Collapse monthly aggregates into one baseline per (category, periodicity, type)
///
/// Baselines come out sorted by category, then periodicity, then type.
pub fn build_baselines(aggregates: &[MonthlyAggregate]) -> Vec<CategoryBaseline> {
    let mut groups: BTreeMap<(&str, Periodicity, CategoryType), (Vec<f64>, Vec<f64>)> =
        BTreeMap::new();

    for aggregate in aggregates {
        let (quantities, counts) = groups
            .entry((
                aggregate.category.as_str(),
                aggregate.periodicity,
                aggregate.category_type,
            ))
            .or_default();
        quantities.push(aggregate.avg_quantity);
        counts.push(aggregate.transaction_count as f64);
    }

    groups
        .into_iter()
        .map(
            |((category, periodicity, category_type), (quantities, counts))| CategoryBaseline {
                category: category.to_string(),
                periodicity,
                category_type,
                avg_quantity: quantities.mean(),
                avg_transactions: counts.mean(),
            },
        )
        .collect()
}
