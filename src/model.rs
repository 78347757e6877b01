//! Fitted linear regression model for price prediction.
//!
//! Training happens offline; this crate only ever sees the fitted side of the
//! model. [`PriceModelParams`] is the serialized artifact — plain numerical
//! data plus the ordered list of input feature names the model was trained on
//! — and [`PriceModel`] is the loaded, validated predictor: `y = w·x + b`.

use crate::error::PredictError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable parameters of the trained regression model.
///
/// `feature_names_in` records the training-time input columns in order; the
/// schema and catalog are derived from it at load time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceModelParams {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub feature_names_in: Vec<String>,
}

impl PriceModelParams {
    /// Serialize the parameters into a byte buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PredictError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize parameters from a byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PredictError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// A fitted linear model ready for inference.
///
/// Construction validates that the weight vector and the recorded feature
/// names agree in length, so a loaded model can never be fed a vector shaped
/// for a different training run.
#[derive(Clone, Debug)]
pub struct PriceModel {
    params: PriceModelParams,
}

impl PriceModel {
    /// Build a model from trained parameters.
    ///
    /// # Errors
    /// Returns [`PredictError::FeatureMismatch`] if the weight count differs
    /// from the feature name count.
    pub fn new(params: PriceModelParams) -> Result<Self, PredictError> {
        if params.weights.len() != params.feature_names_in.len() {
            return Err(PredictError::FeatureMismatch {
                expected_features: params.feature_names_in.len(),
                got_features: params.weights.len(),
            });
        }
        Ok(Self { params })
    }

    /// Ordered input feature names recorded at training time.
    pub fn feature_names_in(&self) -> &[String] {
        &self.params.feature_names_in
    }

    /// Number of input features the model expects.
    pub fn n_features_in(&self) -> usize {
        self.params.weights.len()
    }

    /// Predict on a single aligned feature vector: `w·x + b`.
    ///
    /// # Errors
    /// Returns [`PredictError::FeatureMismatch`] if the vector length differs
    /// from the model's feature count.
    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        if features.len() != self.params.weights.len() {
            return Err(PredictError::FeatureMismatch {
                expected_features: self.params.weights.len(),
                got_features: features.len(),
            });
        }
        let dot: f64 = self
            .params
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.params.bias)
    }

    /// Extract the parameters for serialization.
    pub fn extract_params(&self) -> &PriceModelParams {
        &self.params
    }

    /// Save the model to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PredictError> {
        let bytes = self.params.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a model from a file.
    ///
    /// # Errors
    /// Fails on unreadable files, undecodable bytes, or inconsistent
    /// parameters; any of these aborts startup.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PredictError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            PredictError::IoError(format!("failed to read {}: {}", path.display(), e))
        })?;
        let params = PriceModelParams::from_bytes(&bytes)?;
        Self::new(params)
    }
}
