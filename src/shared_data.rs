// src/shared_data.rs

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One set of contextual conditions, normalized into the fixed feature
/// order every model variant consumes (see `FEATURE_NAMES`).
///
/// `is_weekend` and `rush_hour` are supplied by the caller along with the
/// raw hour/day; `build` clamps ranges but does not re-derive the flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub hour: u8,
    pub day_of_week: u8,
    pub is_weekend: bool,
    pub rain_intensity: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub event_flag: bool,
    pub rush_hour: bool,
    pub avg_speed: f64,
}

impl FeatureVector {
    /// Assemble a feature vector from raw inputs, clamping externally
    /// supplied ranges instead of rejecting them so the serving path
    /// stays available on malformed input.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        hour: u8,
        day_of_week: u8,
        is_weekend: bool,
        rain_intensity: f64,
        temperature: f64,
        humidity: f64,
        event_flag: bool,
        rush_hour: bool,
        avg_speed: f64,
    ) -> Self {
        Self {
            hour: hour.min(23),
            day_of_week: day_of_week.min(6),
            is_weekend,
            rain_intensity: rain_intensity.clamp(0.0, 1.0),
            temperature,
            humidity: humidity.clamp(0.0, 100.0),
            event_flag,
            rush_hour,
            avg_speed: avg_speed.max(0.0),
        }
    }

    /// Emit the fixed-order numeric representation.
    pub fn to_features(&self) -> [f64; 9] {
        [
            self.hour as f64,
            self.day_of_week as f64,
            if self.is_weekend { 1.0 } else { 0.0 },
            self.rain_intensity,
            self.temperature,
            self.humidity,
            if self.event_flag { 1.0 } else { 0.0 },
            if self.rush_hour { 1.0 } else { 0.0 },
            self.avg_speed,
        ]
    }
}

/// Saturday/Sunday convention used across the dataset (0 = Monday).
pub fn is_weekend_day(day_of_week: u8) -> bool {
    day_of_week >= 5
}

/// Morning and evening peak windows: 7-9 and 17-19 inclusive.
pub fn is_rush_hour(hour: u8) -> bool {
    (7..=9).contains(&hour) || (17..=19).contains(&hour)
}

/// One historical observation: contextual features plus the traffic flow
/// measured under them. Field order matches the dataset CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub hour: u8,
    pub day_of_week: u8,
    pub is_weekend: bool,
    pub rain_intensity: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub event_flag: bool,
    pub rush_hour: bool,
    pub avg_speed: f64,
    pub traffic_flow: f64,
}

impl TrainingRecord {
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            hour: self.hour,
            day_of_week: self.day_of_week,
            is_weekend: self.is_weekend,
            rain_intensity: self.rain_intensity,
            temperature: self.temperature,
            humidity: self.humidity,
            event_flag: self.event_flag,
            rush_hour: self.rush_hour,
            avg_speed: self.avg_speed,
        }
    }
}

/// Held-out accuracy metrics for one model variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

/// A static, hand-authored route entry. Not learned; the traffic factor
/// scales the area-wide prediction onto this particular road.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub name: String,
    pub base_speed: f64,
    pub traffic_factor: f64,
}

/// Congestion bands over the predicted flow, in vehicles/hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficTier {
    Light,
    Moderate,
    Heavy,
    VeryHeavy,
}

impl TrafficTier {
    pub fn label(&self) -> &'static str {
        match self {
            TrafficTier::Light => "Light Traffic",
            TrafficTier::Moderate => "Moderate Traffic",
            TrafficTier::Heavy => "Heavy Traffic",
            TrafficTier::VeryHeavy => "Very Heavy Traffic",
        }
    }
}

/// The scored outcome for one query: bounded score, qualitative tier,
/// and the ordered recommendation messages. Recomputed per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteScore {
    pub predicted_traffic: f64,
    pub score: f64,
    pub tier: TrafficTier,
    pub recommendations: Vec<String>,
}

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
