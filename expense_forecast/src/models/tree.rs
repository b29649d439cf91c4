//! CART regression tree grown on squared-error reduction

use rand::seq::index;
use rand::Rng;

/// Variance below which a node is treated as pure
const PURITY_EPSILON: f64 = 1e-12;

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Number of columns drawn at every split
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    /// Summed squared error of both children
    children_sse: f64,
}

/// A fitted regression tree
#[derive(Debug, Clone)]
pub(crate) struct RegressionTree {
    nodes: Vec<Node>,
    /// Total squared-error reduction attributed to each feature
    impurity_decrease: Vec<f64>,
}

impl RegressionTree {
    /// Grow a tree on the rows selected by `sample`
    ///
    /// `sample` may contain repeated indices (bootstrap draws).
    pub fn fit<R: Rng>(
        features: &[Vec<f64>],
        targets: &[f64],
        sample: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let n_features = features.first().map_or(0, |row| row.len());
        let mut tree = Self {
            nodes: Vec::new(),
            impurity_decrease: vec![0.0; n_features],
        };
        tree.grow(features, targets, sample, 0, params, rng);
        tree
    }

    /// Predict one encoded row
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Raw squared-error reduction per feature
    pub fn impurity_decrease(&self) -> &[f64] {
        &self.impurity_decrease
    }

    /// Number of nodes, leaves included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn grow<R: Rng>(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        sample: Vec<usize>,
        depth: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> usize {
        let n = sample.len();
        let mean = sample.iter().map(|&i| targets[i]).sum::<f64>() / n as f64;
        let sse: f64 = sample.iter().map(|&i| (targets[i] - mean).powi(2)).sum();

        let node_idx = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });

        let depth_allows = params.max_depth.map_or(true, |max| depth < max);
        if !depth_allows
            || n < params.min_samples_split
            || n < 2 * params.min_samples_leaf
            || sse <= PURITY_EPSILON
        {
            return node_idx;
        }

        let Some(split) = best_split(features, targets, &sample, sse, params, rng) else {
            return node_idx;
        };

        let (left_sample, right_sample): (Vec<usize>, Vec<usize>) = sample
            .into_iter()
            .partition(|&i| features[i][split.feature] <= split.threshold);

        self.impurity_decrease[split.feature] += (sse - split.children_sse).max(0.0);

        let left = self.grow(features, targets, left_sample, depth + 1, params, rng);
        let right = self.grow(features, targets, right_sample, depth + 1, params, rng);
        self.nodes[node_idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }
}

/// Find the split of `sample` with the lowest summed child squared error
fn best_split<R: Rng>(
    features: &[Vec<f64>],
    targets: &[f64],
    sample: &[usize],
    parent_sse: f64,
    params: &TreeParams,
    rng: &mut R,
) -> Option<Split> {
    let n_features = features[sample[0]].len();
    let candidates: Vec<usize> = if params.max_features < n_features {
        let mut drawn = index::sample(rng, n_features, params.max_features).into_vec();
        drawn.sort_unstable();
        drawn
    } else {
        (0..n_features).collect()
    };

    let n = sample.len();
    let min_leaf = params.min_samples_leaf;
    let mut best: Option<Split> = None;

    for feature in candidates {
        let mut pairs: Vec<(f64, f64)> = sample
            .iter()
            .map(|&i| (features[i][feature], targets[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total_sum: f64 = pairs.iter().map(|(_, y)| y).sum();
        let total_sq: f64 = pairs.iter().map(|(_, y)| y * y).sum();

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for left_len in 1..n {
            let (_, y) = pairs[left_len - 1];
            left_sum += y;
            left_sq += y * y;

            if left_len < min_leaf || n - left_len < min_leaf {
                continue;
            }
            let (prev, next) = (pairs[left_len - 1].0, pairs[left_len].0);
            if prev == next {
                continue;
            }

            let right_len = n - left_len;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let left_sse = (left_sq - left_sum * left_sum / left_len as f64).max(0.0);
            let right_sse = (right_sq - right_sum * right_sum / right_len as f64).max(0.0);
            let children_sse = left_sse + right_sse;

            if children_sse >= parent_sse - PURITY_EPSILON {
                continue;
            }
            if best.map_or(true, |b| children_sse < b.children_sse) {
                best = Some(Split {
                    feature,
                    threshold: prev + (next - prev) / 2.0,
                    children_sse,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: 2,
        }
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let features = vec![vec![1.0, 0.0], vec![2.0, 1.0], vec![3.0, 0.0]];
        let targets = vec![500.0, 500.0, 500.0];
        let mut rng = StdRng::seed_from_u64(7);

        let tree = RegressionTree::fit(&features, &targets, vec![0, 1, 2], &params(), &mut rng);

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_row(&[10.0, 1.0]), 500.0);
        assert!(tree.impurity_decrease().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_step_function_is_learned() {
        let features: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, 0.0]).collect();
        let targets: Vec<f64> = (0..10).map(|i| if i < 5 { 10.0 } else { 20.0 }).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let tree =
            RegressionTree::fit(&features, &targets, (0..10).collect(), &params(), &mut rng);

        assert_eq!(tree.predict_row(&[2.0, 0.0]), 10.0);
        assert_eq!(tree.predict_row(&[7.0, 0.0]), 20.0);
        assert!(tree.impurity_decrease()[0] > 0.0);
        assert_eq!(tree.impurity_decrease()[1], 0.0);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let features: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let shallow = TreeParams {
            max_depth: Some(1),
            max_features: 1,
            ..params()
        };

        let tree = RegressionTree::fit(&features, &targets, (0..8).collect(), &shallow, &mut rng);

        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_min_samples_leaf_is_respected() {
        let features: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64]).collect();
        let targets = vec![0.0, 0.0, 0.0, 0.0, 0.0, 100.0];
        let mut rng = StdRng::seed_from_u64(3);
        let leafy = TreeParams {
            min_samples_leaf: 3,
            max_features: 1,
            ..params()
        };

        let tree = RegressionTree::fit(&features, &targets, (0..6).collect(), &leafy, &mut rng);

        // The only admissible split is 3 | 3
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.predict_row(&[5.0]), 100.0 / 3.0);
    }
}
