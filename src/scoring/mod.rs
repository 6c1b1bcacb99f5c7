// Route efficiency scoring: predicted congestion and travel speed folded
// into a bounded 0-100 score, a qualitative tier over the raw traffic
// value, and an ordered recommendation list.

use crate::global_variables::{EVENT_PENALTY_WEIGHT, HEAVY_RAIN_THRESHOLD, LOW_SCORE_THRESHOLD};
use crate::shared_data::{RouteScore, TrafficTier};

/// Tier bands over the predicted flow; contiguous and exhaustive over
/// the non-negative range.
pub fn classify_tier(predicted_traffic: f64) -> TrafficTier {
    if predicted_traffic < 200.0 {
        TrafficTier::Light
    } else if predicted_traffic < 400.0 {
        TrafficTier::Moderate
    } else if predicted_traffic < 600.0 {
        TrafficTier::Heavy
    } else {
        TrafficTier::VeryHeavy
    }
}

/// Score one route under the given conditions. `event_impact` above zero
/// both costs score points and marks the event recommendation active;
/// `rush_hour` only affects the recommendations.
pub fn score_route(
    predicted_traffic: f64,
    avg_speed: f64,
    rain_intensity: f64,
    event_impact: f64,
    rush_hour: bool,
) -> RouteScore {
    let raw = 100.0 - predicted_traffic / 10.0 + avg_speed / 2.0
        - event_impact * EVENT_PENALTY_WEIGHT;
    let score = raw.clamp(0.0, 100.0);

    let recommendations = build_recommendations(
        score,
        rain_intensity,
        rush_hour,
        event_impact > 0.0,
    );

    RouteScore {
        predicted_traffic,
        score,
        tier: classify_tier(predicted_traffic),
        recommendations,
    }
}

/// Applicable rules fire independently, in this fixed order; when none
/// fires the single favorable message is emitted instead.
fn build_recommendations(
    score: f64,
    rain_intensity: f64,
    rush_hour: bool,
    event_active: bool,
) -> Vec<String> {
    let mut recommendations = Vec::new();
    if score < LOW_SCORE_THRESHOLD {
        recommendations.push("Consider alternative routes".to_string());
        recommendations.push("Delay travel if possible".to_string());
    }
    if rain_intensity > HEAVY_RAIN_THRESHOLD {
        recommendations.push("Drive carefully due to rain".to_string());
    }
    if rush_hour {
        recommendations.push("Peak hour - expect delays".to_string());
    }
    if event_active {
        recommendations.push("Event traffic - plan extra time".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Good conditions for travel".to_string());
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_clamped_at_both_ends() {
        // Massive congestion pushes raw far below zero.
        let jammed = score_route(5000.0, 10.0, 0.0, 0.0, false);
        assert_eq!(jammed.score, 0.0);

        // Empty road with high speed pushes raw above 100.
        let empty = score_route(0.0, 120.0, 0.0, 0.0, false);
        assert_eq!(empty.score, 100.0);
    }

    #[test]
    fn documented_formula_holds_inside_the_bounds() {
        let result = score_route(350.0, 40.0, 0.0, 0.0, false);
        assert!((result.score - (100.0 - 35.0 + 20.0)).abs() < 1e-12);

        let with_event = score_route(350.0, 40.0, 0.0, 0.3, false);
        assert!((with_event.score - (85.0 - 6.0)).abs() < 1e-12);
    }

    #[test]
    fn tier_bands_are_contiguous_and_exhaustive() {
        assert_eq!(classify_tier(0.0), TrafficTier::Light);
        assert_eq!(classify_tier(199.9), TrafficTier::Light);
        assert_eq!(classify_tier(200.0), TrafficTier::Moderate);
        assert_eq!(classify_tier(399.9), TrafficTier::Moderate);
        assert_eq!(classify_tier(400.0), TrafficTier::Heavy);
        assert_eq!(classify_tier(599.9), TrafficTier::Heavy);
        assert_eq!(classify_tier(600.0), TrafficTier::VeryHeavy);
        assert_eq!(classify_tier(10_000.0), TrafficTier::VeryHeavy);
    }

    #[test]
    fn all_applicable_rules_fire_in_order() {
        // Low score + rain + rush + event: every rule fires.
        let result = score_route(900.0, 15.0, 0.6, 0.3, true);
        assert_eq!(
            result.recommendations,
            vec![
                "Consider alternative routes",
                "Delay travel if possible",
                "Drive carefully due to rain",
                "Peak hour - expect delays",
                "Event traffic - plan extra time",
            ]
        );
    }

    #[test]
    fn favorable_message_only_when_nothing_fires() {
        let result = score_route(100.0, 50.0, 0.0, 0.0, false);
        assert_eq!(result.recommendations, vec!["Good conditions for travel"]);

        // Rain alone suppresses the favorable message.
        let rainy = score_route(100.0, 50.0, 0.5, 0.0, false);
        assert_eq!(rainy.recommendations, vec!["Drive carefully due to rain"]);
    }

    #[test]
    fn recommendations_are_a_pure_function_of_inputs() {
        let a = score_route(450.0, 30.0, 0.4, 0.3, true);
        let b = score_route(450.0, 30.0, 0.4, 0.3, true);
        assert_eq!(a, b);
    }

    #[test]
    fn rain_at_threshold_does_not_fire_the_caution() {
        let result = score_route(100.0, 50.0, 0.3, 0.0, false);
        assert_eq!(result.recommendations, vec!["Good conditions for travel"]);
    }
}
