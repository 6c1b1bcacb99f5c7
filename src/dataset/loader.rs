// Dataset CSV I/O with explicit column validation.
//
// A dataset missing a required column would poison every model fit on it,
// so the header is checked up front and the load fails with the column
// name instead of silently defaulting fields.

use std::fs::File;
use std::path::Path;

use thiserror::Error;

use crate::global_variables::FEATURE_NAMES;
use crate::shared_data::TrainingRecord;

pub const TARGET_COLUMN: &str = "traffic_flow";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),
    #[error("dataset encode/decode failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Load every record from a dataset CSV, validating the header first.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<TrainingRecord>, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut rdr = csv::Reader::from_reader(file);

    let headers = rdr.headers()?.clone();
    for required in FEATURE_NAMES.iter().chain([TARGET_COLUMN].iter()) {
        if !headers.iter().any(|h| h == *required) {
            return Err(DatasetError::MissingColumn((*required).to_string()));
        }
    }

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let record: TrainingRecord = row?;
        records.push(record);
    }

    log::info!(
        "Loaded {} training records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Write a dataset CSV with the standard header.
pub fn write_dataset<P: AsRef<Path>>(
    path: P,
    records: &[TrainingRecord],
) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(file);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}
