// Feature column order shared by every model variant.
pub const FEATURE_NAMES: [&str; 9] = [
    "hour",
    "day_of_week",
    "is_weekend",
    "rain_intensity",
    "temperature",
    "humidity",
    "event_flag",
    "rush_hour",
    "avg_speed",
];

// Closed-form fallback used before any model has been trained.
pub const FALLBACK_BASE_FLOW: f64 = 200.0;
pub const FALLBACK_RUSH_HOUR_MULTIPLIER: f64 = 2.5;
pub const FALLBACK_RAIN_MULTIPLIER: f64 = 1.5;
pub const FALLBACK_RAIN_THRESHOLD: f64 = 0.3;
pub const FALLBACK_EVENT_MULTIPLIER: f64 = 1.3;

// Scoring weights.
pub const EVENT_PENALTY_WEIGHT: f64 = 20.0;
pub const HEAVY_RAIN_THRESHOLD: f64 = 0.3;
pub const LOW_SCORE_THRESHOLD: f64 = 40.0;

// Route comparison.
pub const RAIN_SPEED_PENALTY: f64 = 0.3;
pub const SWEEP_AVG_SPEED: f64 = 35.0;

// Training reproducibility.
pub const TRAIN_SPLIT_SEED: u64 = 42;
pub const TRAIN_SPLIT_RATIO: f64 = 0.8;

// Random forest hyperparameters.
pub const FOREST_TREES: usize = 20;
pub const FOREST_MAX_DEPTH: usize = 8;
pub const FOREST_MIN_SAMPLES_SPLIT: usize = 4;
pub const FOREST_SAMPLE_RATIO: f64 = 0.8;
pub const FOREST_SEED: u64 = 42;

// Default file locations.
pub const DEFAULT_DATASET_PATH: &str = "traffic_data.csv";
pub const DEFAULT_BUNDLE_PATH: &str = "trained_models.json";
pub const EVALUATION_LOG_PATH: &str = "model_evaluations.csv";
pub const HOURLY_CHART_PATH: &str = "hourly_profile.png";
pub const DEFAULT_DATASET_SIZE: usize = 5000;
pub const DATASET_SEED: u64 = 7;
