// Regression tree used by the forest variant. Splits minimize the summed
// squared error of the two children; importance mass per feature is the
// total error reduction its splits achieved.

use serde::{Deserialize, Serialize};

use crate::global_variables::FEATURE_NAMES;

pub const NUM_FEATURES: usize = FEATURE_NAMES.len();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: TreeNode,
    importances: Vec<f64>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

fn mean(ys: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| ys[i]).sum::<f64>() / indices.len() as f64
}

fn sse(ys: &[f64], indices: &[usize]) -> f64 {
    let m = mean(ys, indices);
    indices.iter().map(|&i| (ys[i] - m).powi(2)).sum()
}

/// Best split over all features, scanning each feature's sorted values
/// with running sums so every threshold is evaluated in one pass.
fn best_split(
    xs: &[[f64; NUM_FEATURES]],
    ys: &[f64],
    indices: &[usize],
) -> Option<SplitCandidate> {
    let parent_sse = sse(ys, indices);
    let total_sum: f64 = indices.iter().map(|&i| ys[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| ys[i] * ys[i]).sum();
    let n = indices.len() as f64;

    let mut best: Option<SplitCandidate> = None;

    for feature in 0..NUM_FEATURES {
        let mut ordered: Vec<usize> = indices.to_vec();
        ordered.sort_by(|&a, &b| {
            xs[a][feature]
                .partial_cmp(&xs[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for (count, window) in ordered.windows(2).enumerate() {
            let (i, j) = (window[0], window[1]);
            left_sum += ys[i];
            left_sq += ys[i] * ys[i];

            // No threshold between equal values.
            if xs[i][feature] >= xs[j][feature] {
                continue;
            }

            let left_n = (count + 1) as f64;
            let right_n = n - left_n;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;

            let left_sse = left_sq - left_sum * left_sum / left_n;
            let right_sse = right_sq - right_sum * right_sum / right_n;
            let gain = parent_sse - (left_sse + right_sse);

            if gain > best.as_ref().map_or(1e-12, |b| b.gain) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: (xs[i][feature] + xs[j][feature]) / 2.0,
                    gain,
                });
            }
        }
    }

    best
}

fn build_node(
    xs: &[[f64; NUM_FEATURES]],
    ys: &[f64],
    indices: &[usize],
    depth: usize,
    max_depth: usize,
    min_samples_split: usize,
    importances: &mut [f64],
) -> TreeNode {
    if depth >= max_depth || indices.len() < min_samples_split {
        return TreeNode::Leaf {
            value: mean(ys, indices),
        };
    }

    let Some(split) = best_split(xs, ys, indices) else {
        return TreeNode::Leaf {
            value: mean(ys, indices),
        };
    };

    importances[split.feature] += split.gain;

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| xs[i][split.feature] <= split.threshold);

    let left = build_node(
        xs,
        ys,
        &left_idx,
        depth + 1,
        max_depth,
        min_samples_split,
        importances,
    );
    let right = build_node(
        xs,
        ys,
        &right_idx,
        depth + 1,
        max_depth,
        min_samples_split,
        importances,
    );

    TreeNode::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(left),
        right: Box::new(right),
    }
}

impl RegressionTree {
    pub fn fit(
        xs: &[[f64; NUM_FEATURES]],
        ys: &[f64],
        max_depth: usize,
        min_samples_split: usize,
    ) -> Self {
        let indices: Vec<usize> = (0..xs.len()).collect();
        let mut importances = vec![0.0; NUM_FEATURES];
        let root = build_node(
            xs,
            ys,
            &indices,
            0,
            max_depth,
            min_samples_split,
            &mut importances,
        );
        Self { root, importances }
    }

    pub fn predict(&self, x: &[f64; NUM_FEATURES]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Raw per-feature error-reduction mass, unnormalized.
    pub fn importances(&self) -> &[f64] {
        &self.importances
    }
}
