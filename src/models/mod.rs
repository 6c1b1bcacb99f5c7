// Model variants and the registry that trains and serves them.
//
// The variant set is closed: every strategy the trainer knows about is a
// `ModelKind`, and a fitted instance is a `FittedModel`. Both ends of the
// capability surface (predict, optional feature importance) dispatch over
// the same tags, so adding a variant means touching this file and nowhere
// else downstream.

pub mod evaluation;
pub mod forest;
pub mod linear;
pub mod registry;
pub mod tree;

use serde::{Deserialize, Serialize};

use crate::shared_data::FeatureVector;
use forest::ForestRegressor;
use linear::LinearModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    Linear,
    RandomForest,
}

impl ModelKind {
    /// Catalog order; also the tie-break order when variants score equally.
    pub const CATALOG: [ModelKind; 2] = [ModelKind::Linear, ModelKind::RandomForest];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear Regression",
            ModelKind::RandomForest => "Random Forest",
        }
    }
}

/// A fitted model variant. Immutable once built; retraining replaces the
/// whole bundle rather than mutating a fitted instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FittedModel {
    Linear(LinearModel),
    Forest(ForestRegressor),
}

impl FittedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            FittedModel::Linear(_) => ModelKind::Linear,
            FittedModel::Forest(_) => ModelKind::RandomForest,
        }
    }

    pub fn predict(&self, features: &FeatureVector) -> f64 {
        match self {
            FittedModel::Linear(m) => m.predict(features),
            FittedModel::Forest(m) => m.predict(features),
        }
    }

    /// Per-feature importance scores, `None` for variants without the
    /// capability (the linear model exposes coefficients, not importances).
    pub fn feature_importance(&self) -> Option<Vec<(String, f64)>> {
        match self {
            FittedModel::Linear(_) => None,
            FittedModel::Forest(m) => Some(m.feature_importance()),
        }
    }
}
