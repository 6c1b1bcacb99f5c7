// Bagged ensemble of regression trees. Bootstrap sampling is seeded per
// tree so the same dataset and config always rebuild the same forest,
// which keeps persisted bundles reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::global_variables::FEATURE_NAMES;
use crate::models::tree::{RegressionTree, NUM_FEATURES};
use crate::shared_data::{FeatureVector, TrainingRecord};

#[derive(Debug, Clone, Copy)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub sample_ratio: f64,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: crate::global_variables::FOREST_TREES,
            max_depth: crate::global_variables::FOREST_MAX_DEPTH,
            min_samples_split: crate::global_variables::FOREST_MIN_SAMPLES_SPLIT,
            sample_ratio: crate::global_variables::FOREST_SAMPLE_RATIO,
            seed: crate::global_variables::FOREST_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestRegressor {
    trees: Vec<RegressionTree>,
}

impl ForestRegressor {
    pub fn fit(records: &[TrainingRecord], config: &ForestConfig) -> Self {
        if records.is_empty() {
            return Self { trees: Vec::new() };
        }
        let xs: Vec<[f64; NUM_FEATURES]> =
            records.iter().map(|r| r.features().to_features()).collect();
        let ys: Vec<f64> = records.iter().map(|r| r.traffic_flow).collect();

        let sample_size =
            ((records.len() as f64 * config.sample_ratio) as usize).max(1);
        let mut trees = Vec::with_capacity(config.n_trees);

        for tree_index in 0..config.n_trees {
            let mut rng = StdRng::seed_from_u64(config.seed + tree_index as u64);

            let mut boot_xs = Vec::with_capacity(sample_size);
            let mut boot_ys = Vec::with_capacity(sample_size);
            for _ in 0..sample_size {
                let idx = rng.random_range(0..records.len());
                boot_xs.push(xs[idx]);
                boot_ys.push(ys[idx]);
            }

            trees.push(RegressionTree::fit(
                &boot_xs,
                &boot_ys,
                config.max_depth,
                config.min_samples_split,
            ));
        }

        Self { trees }
    }

    /// Mean of the per-tree predictions.
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let x = features.to_features();
        let sum: f64 = self.trees.iter().map(|t| t.predict(&x)).sum();
        sum / self.trees.len() as f64
    }

    /// Feature importances aggregated over all trees and normalized to
    /// sum to 1, paired with the feature names in fixed order.
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        let mut totals = vec![0.0; NUM_FEATURES];
        for tree in &self.trees {
            for (i, &imp) in tree.importances().iter().enumerate() {
                totals[i] += imp;
            }
        }

        let mass: f64 = totals.iter().sum();
        if mass > 0.0 {
            for value in totals.iter_mut() {
                *value /= mass;
            }
        }

        FEATURE_NAMES
            .iter()
            .zip(totals)
            .map(|(name, imp)| (name.to_string(), imp))
            .collect()
    }
}
