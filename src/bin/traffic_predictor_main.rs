// traffic_predictor_main.rs
//
// Demo wiring: bootstrap a dataset, load or train the model registry,
// report accuracy, then score a live scenario and the route catalog.

use std::error::Error;
use std::sync::Arc;

use traffic_predictor::dataset::ensure_dataset;
use traffic_predictor::global_variables::{
    DATASET_SEED, DEFAULT_BUNDLE_PATH, DEFAULT_DATASET_PATH, DEFAULT_DATASET_SIZE,
    EVALUATION_LOG_PATH, HOURLY_CHART_PATH,
};
use traffic_predictor::models::registry::{FeatureImportance, ModelRegistry};
use traffic_predictor::models::ModelKind;
use traffic_predictor::monitoring::{log_evaluations, render_hourly_profile};
use traffic_predictor::persistence::load_or_train;
use traffic_predictor::prediction::PredictionService;
use traffic_predictor::routes::{compare_routes, default_catalog, hourly_profile, Scenario};
use traffic_predictor::scoring::score_route;
use traffic_predictor::shared_data::{is_rush_hour, is_weekend_day, FeatureVector};
use traffic_predictor::weather::{SimulatedWeather, WeatherProvider};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let records = ensure_dataset(DEFAULT_DATASET_PATH, DEFAULT_DATASET_SIZE, DATASET_SEED)?;

    let registry = Arc::new(ModelRegistry::new());
    load_or_train(&registry, DEFAULT_BUNDLE_PATH, &records)?;

    if let Some(evaluations) = registry.evaluations() {
        println!("--- Model Performance ---");
        for (variant, result) in &evaluations {
            println!(
                "{}: MAE={:.2} RMSE={:.2} R2={:.4} ({:.1}% accuracy)",
                variant,
                result.mae,
                result.rmse,
                result.r2,
                result.r2 * 100.0
            );
        }
        if let Err(e) = log_evaluations(EVALUATION_LOG_PATH, &evaluations) {
            eprintln!("Error logging evaluations: {}", e);
        }
    }

    match registry.feature_importance_for(ModelKind::RandomForest) {
        FeatureImportance::Ranked(pairs) => {
            println!("--- Feature Importance (Random Forest) ---");
            for (feature, importance) in pairs {
                println!("{}: {:.3}", feature, importance);
            }
        }
        FeatureImportance::Unavailable => {
            println!("Feature importance unavailable.");
        }
    }

    let service = PredictionService::new(registry);

    // A live query under current (simulated) weather, Tuesday 8am.
    let weather = SimulatedWeather::new(1);
    let reading = weather.current();
    let hour = 8;
    let day_of_week = 1;
    let avg_speed = 35.0;

    let features = FeatureVector::build(
        hour,
        day_of_week,
        is_weekend_day(day_of_week),
        reading.rain_intensity,
        reading.temperature,
        reading.humidity,
        false,
        is_rush_hour(hour),
        avg_speed,
    );
    let predicted = service.predict(&features);
    let scored = score_route(
        predicted,
        avg_speed,
        reading.rain_intensity,
        0.0,
        is_rush_hour(hour),
    );

    println!("--- Live Prediction ---");
    println!("Predicted traffic: {:.0} vehicles/hour", predicted);
    println!("Route score: {:.1}/100 ({})", scored.score, scored.tier.label());
    for recommendation in &scored.recommendations {
        println!("  - {}", recommendation);
    }

    // Compare the route catalog under the same scenario.
    let scenario = Scenario {
        hour,
        day_of_week,
        rain_intensity: reading.rain_intensity,
        temperature: reading.temperature,
        humidity: reading.humidity,
        event_flag: false,
    };
    let comparison = compare_routes(&service, &scenario, &default_catalog());

    println!("--- Route Comparison ---");
    for result in &comparison.results {
        println!(
            "{}: {:.0} veh/h at {:.1} km/h, score {:.1} ({})",
            result.route.name,
            result.score.predicted_traffic,
            result.adjusted_speed,
            result.score.score,
            result.score.tier.label()
        );
    }
    println!(
        "Recommended: {} (score {:.1}/100)",
        comparison.best().route.name,
        comparison.best().score.score
    );

    let points = hourly_profile(&service, &scenario);
    if let Err(e) = render_hourly_profile(&points, HOURLY_CHART_PATH) {
        eprintln!("Error rendering hourly chart: {}", e);
    }

    Ok(())
}
