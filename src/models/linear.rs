// Ordinary least squares variant. Fitting goes through linfa; the fitted
// coefficients and intercept are captured into a plain struct so serving
// and persistence need nothing beyond a dot product.

use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::global_variables::FEATURE_NAMES;
use crate::shared_data::{FeatureVector, TrainingRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    /// Fit on the given records. Fails when linfa cannot solve the system
    /// (e.g. a degenerate design matrix).
    pub fn fit(records: &[TrainingRecord]) -> Result<Self, String> {
        let n_samples = records.len();
        let n_features = FEATURE_NAMES.len();

        let flat: Vec<f64> = records
            .iter()
            .flat_map(|r| r.features().to_features())
            .collect();
        let x = Array2::from_shape_vec((n_samples, n_features), flat)
            .map_err(|e| e.to_string())?;
        let y = Array1::from_iter(records.iter().map(|r| r.traffic_flow));

        let dataset = Dataset::new(x, y);
        let fitted = LinearRegression::default()
            .with_intercept(true)
            .fit(&dataset)
            .map_err(|e: linfa_linear::LinearError<f64>| e.to_string())?;

        Ok(Self {
            coefficients: fitted.params().to_vec(),
            intercept: fitted.intercept(),
        })
    }

    pub fn predict(&self, features: &FeatureVector) -> f64 {
        let x = features.to_features();
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(x.iter())
            .map(|(c, v)| c * v)
            .sum();
        dot + self.intercept
    }
}
