//! Integration tests for the prediction and scoring pipeline.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use traffic_predictor::dataset::generate_dataset;
use traffic_predictor::models::forest::ForestConfig;
use traffic_predictor::models::registry::ModelRegistry;
use traffic_predictor::persistence::{load_bundle, save_bundle};
use traffic_predictor::prediction::{fallback_estimate, PredictionService};
use traffic_predictor::routes::{compare_routes, default_catalog, Scenario};
use traffic_predictor::scoring::score_route;
use traffic_predictor::shared_data::{is_rush_hour, is_weekend_day, FeatureVector, RouteDefinition};

fn fast_forest() -> ForestConfig {
    ForestConfig {
        n_trees: 8,
        max_depth: 6,
        min_samples_split: 4,
        sample_ratio: 0.8,
        seed: 42,
    }
}

#[test]
fn tuesday_morning_cold_start_matches_the_documented_arithmetic() {
    println!("\n=== Test: Tuesday 8am Cold Start ===");
    let service = PredictionService::new(Arc::new(ModelRegistry::new()));

    // Tuesday 8am, dry, no event, 35 km/h: rush hour fires, nothing else.
    let features = FeatureVector::build(8, 1, false, 0.0, 25.0, 60.0, false, true, 35.0);
    let predicted = service.predict(&features);
    assert_eq!(predicted, 200.0 * 2.5);

    let scored = score_route(predicted, 35.0, 0.0, 0.0, true);
    let expected = (100.0 - predicted / 10.0 + 35.0 / 2.0).clamp(0.0, 100.0);
    assert!((scored.score - expected).abs() < 1e-12);
    println!(
        "✓ predicted {} veh/h, score {:.1}/100",
        predicted, scored.score
    );

    // Rush hour is the only active recommendation trigger.
    assert_eq!(scored.recommendations, vec!["Peak hour - expect delays"]);
}

#[test]
fn three_route_comparison_under_heavy_rain_selects_by_score() {
    println!("\n=== Test: Three Routes, Rain 0.5 ===");
    let service = PredictionService::new(Arc::new(ModelRegistry::new()));
    let scenario = Scenario {
        hour: 8,
        day_of_week: 1,
        rain_intensity: 0.5,
        temperature: 18.0,
        humidity: 85.0,
        event_flag: false,
    };

    let comparison = compare_routes(&service, &scenario, &default_catalog());

    // Adjusted speeds are base * (1 - 0.5 * 0.3) = base * 0.85.
    let expected_speeds = [45.0 * 0.85, 60.0 * 0.85, 30.0 * 0.85];
    for (result, expected) in comparison.results.iter().zip(expected_speeds) {
        assert!((result.adjusted_speed - expected).abs() < 1e-12);
    }

    // The winner must hold the highest score, not the highest raw speed
    // or the lowest raw traffic on its own.
    let best = comparison.best();
    for result in &comparison.results {
        assert!(best.score.score >= result.score.score);
    }
    println!(
        "✓ best route {} with score {:.1}",
        best.route.name, best.score.score
    );
}

#[test]
fn equal_scores_fall_back_to_catalog_order() {
    let service = PredictionService::new(Arc::new(ModelRegistry::new()));
    let scenario = Scenario {
        hour: 12,
        day_of_week: 2,
        rain_intensity: 0.0,
        temperature: 22.0,
        humidity: 50.0,
        event_flag: false,
    };
    let twins = vec![
        RouteDefinition {
            name: "Listed First".to_string(),
            base_speed: 42.0,
            traffic_factor: 1.0,
        },
        RouteDefinition {
            name: "Listed Second".to_string(),
            base_speed: 42.0,
            traffic_factor: 1.0,
        },
    ];

    let comparison = compare_routes(&service, &scenario, &twins);
    assert_eq!(comparison.results[0].score.score, comparison.results[1].score.score);
    assert_eq!(comparison.best().route.name, "Listed First");
}

#[test]
fn trained_bundle_round_trips_through_persistence() {
    println!("\n=== Test: Bundle Round Trip ===");
    let mut path = std::env::temp_dir();
    path.push(format!("integration_bundle_{}.json", std::process::id()));

    let registry = Arc::new(ModelRegistry::with_forest_config(fast_forest()));
    registry.train_all(&generate_dataset(500, 61)).unwrap();
    let bundle = registry.snapshot().unwrap();
    save_bundle(&path, &bundle).unwrap();

    let restored_registry = Arc::new(ModelRegistry::new());
    restored_registry.install(load_bundle(&path).unwrap().unwrap());

    let original = PredictionService::new(registry);
    let restored = PredictionService::new(restored_registry);

    for hour in 0..24u8 {
        for day in 0..7u8 {
            let features = FeatureVector::build(
                hour,
                day,
                is_weekend_day(day),
                0.2,
                20.0,
                65.0,
                hour == 18,
                is_rush_hour(hour),
                40.0,
            );
            assert_eq!(original.predict(&features), restored.predict(&features));
        }
    }
    println!("✓ 168 probe predictions identical after reload");
    std::fs::remove_file(&path).ok();
}

#[test]
fn training_switches_serving_away_from_the_fallback() {
    let registry = Arc::new(ModelRegistry::with_forest_config(fast_forest()));
    let service = PredictionService::new(Arc::clone(&registry));

    let features = FeatureVector::build(8, 1, false, 0.0, 25.0, 60.0, false, true, 35.0);
    let cold = service.predict(&features);
    assert_eq!(cold, fallback_estimate(&features));

    registry.train_all(&generate_dataset(500, 67)).unwrap();

    // Same service handle, now served by the trained bundle.
    let warm = service.predict(&features);
    assert!(warm >= 0.0);
    assert_ne!(warm, cold);
}

#[test]
fn scores_stay_bounded_across_extreme_scenarios() {
    let service = PredictionService::new(Arc::new(ModelRegistry::new()));
    for hour in [0u8, 8, 12, 18, 23] {
        for rain in [0.0, 1.0] {
            for event in [false, true] {
                let scenario = Scenario {
                    hour,
                    day_of_week: 5,
                    rain_intensity: rain,
                    temperature: -5.0,
                    humidity: 100.0,
                    event_flag: event,
                };
                let comparison = compare_routes(&service, &scenario, &default_catalog());
                for result in &comparison.results {
                    assert!((0.0..=100.0).contains(&result.score.score));
                    assert!(result.score.predicted_traffic >= 0.0);
                    assert!(!result.score.recommendations.is_empty());
                }
            }
        }
    }
}
