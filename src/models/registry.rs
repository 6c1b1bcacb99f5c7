// Model registry: owns the fitted variants, picks the serving model, and
// swaps retrained state in atomically. Callers hold the registry behind an
// `Arc` and pass it to the prediction service explicitly.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::global_variables::{FEATURE_NAMES, TRAIN_SPLIT_RATIO, TRAIN_SPLIT_SEED};
use crate::models::evaluation::{evaluate, train_test_split};
use crate::models::forest::{ForestConfig, ForestRegressor};
use crate::models::linear::LinearModel;
use crate::models::{FittedModel, ModelKind};
use crate::shared_data::{current_timestamp, EvaluationResult, TrainingRecord};

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("training dataset is empty")]
    EmptyDataset,
    #[error("record {index} has a non-finite value in column '{column}'")]
    NonFiniteValue { index: usize, column: String },
    #[error("failed to fit {variant}: {message}")]
    FitFailed {
        variant: &'static str,
        message: String,
    },
}

/// Feature-importance query result. `Unavailable` covers both the cold
/// start state and variants without the capability.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureImportance {
    Ranked(Vec<(String, f64)>),
    Unavailable,
}

/// The fitted state of one training run plus the serving designation.
/// Immutable once built; retraining replaces the whole bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub models: Vec<FittedModel>,
    pub active: ModelKind,
    pub trained_at: u64,
    pub evaluations: BTreeMap<String, EvaluationResult>,
}

impl ModelBundle {
    pub fn model(&self, kind: ModelKind) -> Option<&FittedModel> {
        self.models.iter().find(|m| m.kind() == kind)
    }

    pub fn active_model(&self) -> Option<&FittedModel> {
        self.model(self.active)
    }
}

pub struct ModelRegistry {
    bundle: RwLock<Option<Arc<ModelBundle>>>,
    forest_config: ForestConfig,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            bundle: RwLock::new(None),
            forest_config: ForestConfig::default(),
        }
    }

    pub fn with_forest_config(forest_config: ForestConfig) -> Self {
        Self {
            bundle: RwLock::new(None),
            forest_config,
        }
    }

    /// Fit every catalog variant on the same reproducible split, evaluate
    /// each on the held-out portion, and make the highest-R2 variant
    /// active. The previous bundle keeps serving until the new one is
    /// complete; a failed fit leaves it untouched.
    pub fn train_all(
        &self,
        records: &[TrainingRecord],
    ) -> Result<BTreeMap<String, EvaluationResult>, TrainingError> {
        validate_dataset(records)?;

        let (train, test) = train_test_split(records, TRAIN_SPLIT_RATIO, TRAIN_SPLIT_SEED);
        log::info!(
            "Training {} variants on {} records ({} held out)",
            ModelKind::CATALOG.len(),
            train.len(),
            test.len()
        );

        let mut models = Vec::with_capacity(ModelKind::CATALOG.len());
        for kind in ModelKind::CATALOG {
            let fitted = match kind {
                ModelKind::Linear => {
                    let linear =
                        LinearModel::fit(&train).map_err(|message| TrainingError::FitFailed {
                            variant: kind.name(),
                            message,
                        })?;
                    FittedModel::Linear(linear)
                }
                ModelKind::RandomForest => {
                    FittedModel::Forest(ForestRegressor::fit(&train, &self.forest_config))
                }
            };
            models.push(fitted);
        }

        let targets: Vec<f64> = test.iter().map(|r| r.traffic_flow).collect();
        let mut evaluations = BTreeMap::new();
        for model in &models {
            let predictions: Vec<f64> = test
                .iter()
                .map(|r| model.predict(&r.features()))
                .collect();
            let result = evaluate(&predictions, &targets);
            log::info!(
                "{}: MAE={:.2} RMSE={:.2} R2={:.4}",
                model.kind().name(),
                result.mae,
                result.rmse,
                result.r2
            );
            evaluations.insert(model.kind().name().to_string(), result);
        }

        // Strictly-better R2 wins; ties keep the earlier catalog entry.
        let mut active = ModelKind::CATALOG[0];
        let mut best_r2 = f64::NEG_INFINITY;
        for kind in ModelKind::CATALOG {
            let r2 = evaluations[kind.name()].r2;
            if r2 > best_r2 {
                best_r2 = r2;
                active = kind;
            }
        }
        log::info!("Active model: {} (R2={:.4})", active.name(), best_r2);

        let bundle = ModelBundle {
            models,
            active,
            trained_at: current_timestamp(),
            evaluations: evaluations.clone(),
        };
        self.install(bundle);

        Ok(evaluations)
    }

    /// The serving bundle, if any. Cloning the `Arc` means an in-flight
    /// training run never blocks or invalidates a caller's view.
    pub fn active(&self) -> Option<Arc<ModelBundle>> {
        self.bundle
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_trained(&self) -> bool {
        self.active().is_some()
    }

    /// Metrics cached from the most recent training run.
    pub fn evaluations(&self) -> Option<BTreeMap<String, EvaluationResult>> {
        self.active().map(|b| b.evaluations.clone())
    }

    /// Importance ranking of the active variant, sorted descending.
    pub fn feature_importance(&self) -> FeatureImportance {
        match self.active() {
            Some(bundle) => match bundle.active_model() {
                Some(model) => rank_importance(model),
                None => FeatureImportance::Unavailable,
            },
            None => FeatureImportance::Unavailable,
        }
    }

    /// Importance ranking of a specific variant.
    pub fn feature_importance_for(&self, kind: ModelKind) -> FeatureImportance {
        match self.active() {
            Some(bundle) => match bundle.model(kind) {
                Some(model) => rank_importance(model),
                None => FeatureImportance::Unavailable,
            },
            None => FeatureImportance::Unavailable,
        }
    }

    /// Replace the serving bundle wholesale (used by training and by the
    /// persistence adapter at startup).
    pub fn install(&self, bundle: ModelBundle) {
        let mut guard = self
            .bundle
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Arc::new(bundle));
    }

    /// Clone of the current bundle for persistence.
    pub fn snapshot(&self) -> Option<ModelBundle> {
        self.active().map(|b| (*b).clone())
    }
}

fn rank_importance(model: &FittedModel) -> FeatureImportance {
    match model.feature_importance() {
        Some(mut pairs) => {
            pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            FeatureImportance::Ranked(pairs)
        }
        None => FeatureImportance::Unavailable,
    }
}

fn validate_dataset(records: &[TrainingRecord]) -> Result<(), TrainingError> {
    if records.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    for (index, record) in records.iter().enumerate() {
        let features = record.features().to_features();
        for (column, value) in FEATURE_NAMES.iter().zip(features.iter()) {
            if !value.is_finite() {
                return Err(TrainingError::NonFiniteValue {
                    index,
                    column: (*column).to_string(),
                });
            }
        }
        if !record.traffic_flow.is_finite() {
            return Err(TrainingError::NonFiniteValue {
                index,
                column: "traffic_flow".to_string(),
            });
        }
    }
    Ok(())
}
