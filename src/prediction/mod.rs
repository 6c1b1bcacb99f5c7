// Prediction service: delegates to the active trained model, or to a
// deterministic closed-form estimate during cold start so the serving path
// is never unavailable.

use std::sync::Arc;

use crate::global_variables::{
    FALLBACK_BASE_FLOW, FALLBACK_EVENT_MULTIPLIER, FALLBACK_RAIN_MULTIPLIER,
    FALLBACK_RAIN_THRESHOLD, FALLBACK_RUSH_HOUR_MULTIPLIER,
};
use crate::models::registry::ModelRegistry;
use crate::shared_data::FeatureVector;

pub struct PredictionService {
    registry: Arc<ModelRegistry>,
}

impl PredictionService {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Predicted traffic flow in vehicles/hour, never negative. A missing
    /// model or a non-finite model output degrades to the fallback
    /// estimate instead of failing the caller.
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        if let Some(bundle) = self.registry.active() {
            if let Some(model) = bundle.active_model() {
                let predicted = model.predict(features);
                if predicted.is_finite() {
                    return predicted.max(0.0);
                }
                log::warn!(
                    "{} produced a non-finite prediction, using fallback",
                    model.kind().name()
                );
            }
        }
        fallback_estimate(features)
    }
}

/// Closed-form cold-start estimate: base volume scaled by fixed rush-hour,
/// rain, and event multipliers.
pub fn fallback_estimate(features: &FeatureVector) -> f64 {
    let mut volume = FALLBACK_BASE_FLOW;
    if features.rush_hour {
        volume *= FALLBACK_RUSH_HOUR_MULTIPLIER;
    }
    if features.rain_intensity > FALLBACK_RAIN_THRESHOLD {
        volume *= FALLBACK_RAIN_MULTIPLIER;
    }
    if features.event_flag {
        volume *= FALLBACK_EVENT_MULTIPLIER;
    }
    volume
}
