// Persistence adapter for trained model bundles. Saves go through a
// sibling temp file and an atomic rename so a crash mid-write can never
// leave a truncated bundle where the loader will find it.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::models::registry::{ModelBundle, ModelRegistry, TrainingError};
use crate::shared_data::TrainingRecord;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("bundle I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("bundle at {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn io_err(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize the bundle next to its final location, then rename into
/// place. The temp file is removed on every failure path.
pub fn save_bundle<P: AsRef<Path>>(path: P, bundle: &ModelBundle) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let tmp = temp_sibling(path);

    let result = (|| {
        let file = File::create(&tmp).map_err(|e| io_err(&tmp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, bundle).map_err(|source| PersistenceError::Corrupt {
            path: tmp.display().to_string(),
            source,
        })?;
        writer.flush().map_err(|e| io_err(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| io_err(path, e))
    })();

    if result.is_err() {
        fs::remove_file(&tmp).ok();
    } else {
        log::info!("Saved model bundle to {}", path.display());
    }
    result
}

/// Load a previously saved bundle. An absent file is the expected first
/// run and returns `Ok(None)`; unreadable or corrupt bundles are errors
/// the caller recovers from by retraining.
pub fn load_bundle<P: AsRef<Path>>(path: P) -> Result<Option<ModelBundle>, PersistenceError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let bundle = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        PersistenceError::Corrupt {
            path: path.display().to_string(),
            source,
        }
    })?;
    Ok(Some(bundle))
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Install a saved bundle into the registry, or train from the dataset
/// and save the result. A corrupt bundle is logged and treated as a cold
/// start rather than propagated.
pub fn load_or_train<P: AsRef<Path>>(
    registry: &Arc<ModelRegistry>,
    bundle_path: P,
    records: &[TrainingRecord],
) -> Result<(), StartupError> {
    let bundle_path = bundle_path.as_ref();

    match load_bundle(bundle_path) {
        Ok(Some(bundle)) => {
            log::info!(
                "Restored model bundle from {} (active: {})",
                bundle_path.display(),
                bundle.active.name()
            );
            registry.install(bundle);
            return Ok(());
        }
        Ok(None) => {
            log::info!("No saved bundle at {}, training", bundle_path.display());
        }
        Err(e) => {
            log::warn!("Discarding unreadable bundle: {}", e);
        }
    }

    registry.train_all(records)?;
    if let Some(bundle) = registry.snapshot() {
        save_bundle(bundle_path, &bundle)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::generator::generate_dataset;
    use crate::models::forest::ForestConfig;
    use crate::prediction::PredictionService;
    use crate::shared_data::FeatureVector;
    use std::io::Write as _;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("traffic_bundle_{}_{}", std::process::id(), name));
        path
    }

    fn trained_registry(seed: u64) -> Arc<ModelRegistry> {
        let registry = Arc::new(ModelRegistry::with_forest_config(ForestConfig {
            n_trees: 8,
            max_depth: 6,
            min_samples_split: 4,
            sample_ratio: 0.8,
            seed: 42,
        }));
        registry.train_all(&generate_dataset(300, seed)).unwrap();
        registry
    }

    fn probe_set() -> Vec<FeatureVector> {
        (0..24u8)
            .map(|hour| {
                FeatureVector::build(
                    hour,
                    (hour % 7) as u8,
                    crate::shared_data::is_weekend_day(hour % 7),
                    (hour as f64) / 30.0,
                    22.0,
                    55.0,
                    hour % 5 == 0,
                    crate::shared_data::is_rush_hour(hour),
                    30.0 + hour as f64,
                )
            })
            .collect()
    }

    #[test]
    fn absent_bundle_is_not_an_error() {
        assert!(load_bundle(temp_path("never_written.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn round_trip_preserves_predictions() {
        let path = temp_path("roundtrip.json");
        let registry = trained_registry(41);
        let bundle = registry.snapshot().unwrap();

        save_bundle(&path, &bundle).unwrap();
        let restored = load_bundle(&path).unwrap().unwrap();

        let loaded_registry = Arc::new(ModelRegistry::new());
        loaded_registry.install(restored);

        let before = PredictionService::new(registry);
        let after = PredictionService::new(loaded_registry);
        for features in probe_set() {
            assert_eq!(before.predict(&features), after.predict(&features));
        }
        fs::remove_file(&path).ok();
    }

    #[test]
    fn corrupt_bundle_is_reported_not_swallowed() {
        let path = temp_path("corrupt.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"{ not json").unwrap();
        drop(file);

        let err = load_bundle(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt { .. }));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let path = temp_path("clean.json");
        let bundle = trained_registry(43).snapshot().unwrap();
        save_bundle(&path, &bundle).unwrap();

        assert!(path.exists());
        assert!(!temp_sibling(&path).exists());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn load_or_train_recovers_from_a_corrupt_bundle() {
        let path = temp_path("recover.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"garbage").unwrap();
        drop(file);

        let registry = Arc::new(ModelRegistry::with_forest_config(ForestConfig {
            n_trees: 8,
            max_depth: 6,
            min_samples_split: 4,
            sample_ratio: 0.8,
            seed: 42,
        }));
        let records = generate_dataset(300, 47);
        load_or_train(&registry, &path, &records).unwrap();

        assert!(registry.is_trained());
        // The rewritten bundle must now load cleanly.
        assert!(load_bundle(&path).unwrap().is_some());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn load_or_train_prefers_the_saved_bundle() {
        let path = temp_path("prefer_saved.json");
        let trained = trained_registry(53);
        let bundle = trained.snapshot().unwrap();
        save_bundle(&path, &bundle).unwrap();

        let fresh = Arc::new(ModelRegistry::new());
        load_or_train(&fresh, &path, &[]).unwrap();

        let restored = fresh.active().unwrap();
        assert_eq!(restored.trained_at, bundle.trained_at);
        fs::remove_file(&path).ok();
    }
}
