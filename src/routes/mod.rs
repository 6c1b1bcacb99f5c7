// Route comparator: fans the prediction and scoring engines out over a
// static route catalog under one shared scenario, and produces the
// 24-point hourly profile used for charting.

use serde::{Deserialize, Serialize};

use crate::global_variables::{RAIN_SPEED_PENALTY, SWEEP_AVG_SPEED};
use crate::prediction::PredictionService;
use crate::scoring::score_route;
use crate::shared_data::{
    is_rush_hour, is_weekend_day, FeatureVector, RouteDefinition, RouteScore,
};

/// Shared conditions for one comparison query. The derived weekend and
/// rush-hour flags are computed once here rather than per route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub hour: u8,
    pub day_of_week: u8,
    pub rain_intensity: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub event_flag: bool,
}

impl Scenario {
    pub fn event_impact(&self) -> f64 {
        if self.event_flag {
            0.3
        } else {
            0.0
        }
    }

    fn features_with_speed(&self, avg_speed: f64, hour: u8) -> FeatureVector {
        FeatureVector::build(
            hour,
            self.day_of_week,
            is_weekend_day(self.day_of_week),
            self.rain_intensity,
            self.temperature,
            self.humidity,
            self.event_flag,
            is_rush_hour(hour),
            avg_speed,
        )
    }
}

/// One scored catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub route: RouteDefinition,
    pub adjusted_speed: f64,
    pub score: RouteScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteComparison {
    pub results: Vec<RouteResult>,
    pub best_index: usize,
}

impl RouteComparison {
    pub fn best(&self) -> &RouteResult {
        &self.results[self.best_index]
    }
}

/// One sample of the hourly sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub hour: u8,
    pub predicted_traffic: f64,
    pub rush_hour: bool,
}

/// The hand-authored catalog the original system compares.
pub fn default_catalog() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition {
            name: "Route A (Main Road)".to_string(),
            base_speed: 45.0,
            traffic_factor: 1.2,
        },
        RouteDefinition {
            name: "Route B (Highway)".to_string(),
            base_speed: 60.0,
            traffic_factor: 0.8,
        },
        RouteDefinition {
            name: "Route C (Local Roads)".to_string(),
            base_speed: 30.0,
            traffic_factor: 1.5,
        },
    ]
}

/// Score every catalog route under the scenario and pick the best.
///
/// Rain slows each route proportionally to its intensity; the route's
/// traffic factor scales the area prediction onto the specific road. The
/// recommended route is the strictly highest score; on a tie the first
/// catalog entry wins.
pub fn compare_routes(
    service: &PredictionService,
    scenario: &Scenario,
    catalog: &[RouteDefinition],
) -> RouteComparison {
    let mut results = Vec::with_capacity(catalog.len());

    for route in catalog {
        let adjusted_speed =
            route.base_speed * (1.0 - scenario.rain_intensity * RAIN_SPEED_PENALTY);
        let features = scenario.features_with_speed(adjusted_speed, scenario.hour);

        let predicted = (service.predict(&features) * route.traffic_factor).max(0.0);
        let score = score_route(
            predicted,
            adjusted_speed,
            scenario.rain_intensity,
            scenario.event_impact(),
            is_rush_hour(scenario.hour),
        );

        log::info!(
            "{}: predicted {:.0} veh/h at {:.1} km/h, score {:.1}",
            route.name,
            predicted,
            adjusted_speed,
            score.score
        );

        results.push(RouteResult {
            route: route.clone(),
            adjusted_speed,
            score,
        });
    }

    let mut best_index = 0;
    for (index, result) in results.iter().enumerate() {
        if result.score.score > results[best_index].score.score {
            best_index = index;
        }
    }

    RouteComparison {
        results,
        best_index,
    }
}

/// Predicted flow for every hour of the scenario's day, all other
/// conditions held fixed and speed pinned to the sweep constant. Pure;
/// exists only to feed the chart.
pub fn hourly_profile(service: &PredictionService, scenario: &Scenario) -> Vec<HourlyPoint> {
    (0..24u8)
        .map(|hour| {
            let features = scenario.features_with_speed(SWEEP_AVG_SPEED, hour);
            HourlyPoint {
                hour,
                predicted_traffic: service.predict(&features),
                rush_hour: is_rush_hour(hour),
            }
        })
        .collect()
}
