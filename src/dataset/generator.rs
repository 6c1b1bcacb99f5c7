// Synthetic historical dataset, used to bootstrap a first training run
// when no recorded data exists yet. Stands in for a real feed; the rest of
// the crate only sees `Vec<TrainingRecord>`.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::loader::{load_dataset, write_dataset, DatasetError};
use crate::shared_data::{is_rush_hour, is_weekend_day, TrainingRecord};

/// Typical weekday flow by hour, before weather and event adjustments.
fn base_flow_for_hour(hour: u8) -> f64 {
    match hour {
        0..=4 => 60.0,
        5..=6 => 150.0,
        7..=9 => 520.0,
        10..=12 => 300.0,
        13..=15 => 280.0,
        16 => 380.0,
        17..=19 => 560.0,
        20..=21 => 220.0,
        _ => 120.0,
    }
}

/// Generate `n` observations, deterministic for a fixed seed.
pub fn generate_dataset(n: usize, seed: u64) -> Vec<TrainingRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(n);

    for _ in 0..n {
        let hour = rng.random_range(0..24u8);
        let day_of_week = rng.random_range(0..7u8);
        let is_weekend = is_weekend_day(day_of_week);
        let rush_hour = is_rush_hour(hour);

        let rain_intensity = if rng.random_range(0..100) < 30 {
            rng.random_range(0.1..1.0)
        } else {
            0.0
        };
        let temperature = rng.random_range(10.0..40.0);
        let humidity = rng.random_range(20.0..100.0);
        let event_flag = rng.random_range(0..100) < 5;

        let mut flow = base_flow_for_hour(hour);
        if is_weekend {
            flow *= 0.6;
        }
        if rain_intensity > 0.3 {
            flow *= 1.4;
        }
        if event_flag {
            flow *= 1.5;
        }
        // Uniform noise around the pattern, floored at zero.
        flow = (flow + rng.random_range(-40.0..40.0)).max(0.0);

        // Speeds drop as flow rises; light noise on top.
        let avg_speed =
            (55.0 - flow / 25.0 + rng.random_range(-5.0..5.0)).clamp(8.0, 60.0);

        records.push(TrainingRecord {
            hour,
            day_of_week,
            is_weekend,
            rain_intensity,
            temperature,
            humidity,
            event_flag,
            rush_hour,
            avg_speed,
            traffic_flow: flow,
        });
    }

    records
}

/// Load the dataset at `path`, generating and writing it first when absent.
pub fn ensure_dataset<P: AsRef<Path>>(
    path: P,
    n: usize,
    seed: u64,
) -> Result<Vec<TrainingRecord>, DatasetError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("No dataset at {}, generating {} records", path.display(), n);
        let records = generate_dataset(n, seed);
        write_dataset(path, &records)?;
        return Ok(records);
    }
    load_dataset(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate_dataset(200, 9);
        let b = generate_dataset(200, 9);
        assert_eq!(a, b);

        let c = generate_dataset(200, 10);
        assert_ne!(a, c);
    }

    #[test]
    fn derived_flags_are_consistent() {
        for record in generate_dataset(500, 1) {
            assert_eq!(record.is_weekend, is_weekend_day(record.day_of_week));
            assert_eq!(record.rush_hour, is_rush_hour(record.hour));
        }
    }

    #[test]
    fn flows_and_speeds_stay_in_sane_ranges() {
        for record in generate_dataset(500, 2) {
            assert!(record.traffic_flow >= 0.0);
            assert!(record.avg_speed >= 8.0 && record.avg_speed <= 60.0);
            assert!((0.0..=1.0).contains(&record.rain_intensity));
        }
    }

    #[test]
    fn rush_hours_carry_more_traffic_on_average() {
        let records = generate_dataset(2000, 4);
        let (mut rush_sum, mut rush_n, mut calm_sum, mut calm_n) = (0.0, 0, 0.0, 0);
        for r in &records {
            if r.rush_hour {
                rush_sum += r.traffic_flow;
                rush_n += 1;
            } else {
                calm_sum += r.traffic_flow;
                calm_n += 1;
            }
        }
        assert!(rush_sum / rush_n as f64 > calm_sum / calm_n as f64);
    }
}
