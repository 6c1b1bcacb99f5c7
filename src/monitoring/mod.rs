// Reporting helpers around the core: append evaluation metrics to a CSV
// log and render the hourly prediction profile as a chart.

use std::collections::BTreeMap;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;

use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::routes::HourlyPoint;
use crate::shared_data::{current_timestamp, EvaluationResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub timestamp: u64,
    pub variant: String,
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

/// Append one row per variant for a training run.
pub fn log_evaluations<P: AsRef<Path>>(
    path: P,
    evaluations: &BTreeMap<String, EvaluationResult>,
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    let timestamp = current_timestamp();
    for (variant, result) in evaluations {
        wtr.serialize(EvaluationRecord {
            timestamp,
            variant: variant.clone(),
            mae: result.mae,
            rmse: result.rmse,
            r2: result.r2,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render the 24-hour predicted-flow profile. Rush-hour samples are
/// marked in red on top of the line.
pub fn render_hourly_profile<P: AsRef<Path>>(
    points: &[HourlyPoint],
    path: P,
) -> Result<(), Box<dyn Error>> {
    let max_flow = points
        .iter()
        .map(|p| p.predicted_traffic)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);

    let backend = BitMapBackend::new(path.as_ref(), (800, 600));
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Predicted Traffic Flow by Hour", ("sans-serif", 20))
        .margin(40)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0u32..24u32, 0.0..max_flow * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Hour of Day")
        .y_desc("Vehicles per Hour")
        .draw()?;

    chart.draw_series(LineSeries::new(
        points
            .iter()
            .map(|p| (p.hour as u32, p.predicted_traffic)),
        &BLUE,
    ))?;

    chart.draw_series(
        points
            .iter()
            .filter(|p| p.rush_hour)
            .map(|p| Circle::new((p.hour as u32, p.predicted_traffic), 4, RED.filled())),
    )?;

    root.present()?;
    log::info!("Hourly profile chart saved to {}", path.as_ref().display());
    Ok(())
}
