// Held-out evaluation: a reproducible shuffled split plus the MAE / RMSE /
// R-squared triple reported for every variant.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::shared_data::{EvaluationResult, TrainingRecord};

/// Split a dataset into (train, test) with a seeded shuffle so repeated
/// training runs are comparable.
pub fn train_test_split(
    records: &[TrainingRecord],
    train_ratio: f64,
    seed: u64,
) -> (Vec<TrainingRecord>, Vec<TrainingRecord>) {
    let mut indices: Vec<usize> = (0..records.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let split = ((records.len() as f64) * train_ratio).round() as usize;
    let split = split.clamp(1, records.len().saturating_sub(1).max(1));

    let train = indices[..split].iter().map(|&i| records[i]).collect();
    let test = indices[split..].iter().map(|&i| records[i]).collect();
    (train, test)
}

/// Metrics over parallel prediction/target slices. R-squared is defined as
/// 0 when the targets have no variance, keeping variant ranking total.
pub fn evaluate(predictions: &[f64], targets: &[f64]) -> EvaluationResult {
    assert_eq!(predictions.len(), targets.len());
    let n = predictions.len() as f64;
    if predictions.is_empty() {
        return EvaluationResult {
            mae: f64::MAX,
            rmse: f64::MAX,
            r2: 0.0,
        };
    }

    let mae = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t).abs())
        .sum::<f64>()
        / n;

    let sse: f64 = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t).powi(2))
        .sum();
    let rmse = (sse / n).sqrt();

    let mean = targets.iter().sum::<f64>() / n;
    let sst: f64 = targets.iter().map(|t| (t - mean).powi(2)).sum();
    let r2 = if sst > 0.0 { 1.0 - sse / sst } else { 0.0 };

    EvaluationResult { mae, rmse, r2 }
}
