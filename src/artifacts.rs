//! Loading and saving of the serialized startup artifacts.
//!
//! The offline training run leaves seven files in an artifact directory: the
//! model parameters, the training-time column order, and five widget option
//! lists. All of them are required; a missing or undecodable file is a fatal
//! startup error since the form cannot render without them.
//!
//! The model is a binary bincode artifact; the lists are small JSON arrays so
//! they stay readable next to the model they describe.

use crate::error::PredictError;
use crate::model::PriceModelParams;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// File name of the bincode model parameters.
pub const MODEL_FILE: &str = "model.bin";
/// File name of the JSON training-time column order.
pub const MODEL_COLUMNS_FILE: &str = "model_columns.json";
/// File name of the JSON town option list.
pub const TOWN_OPTIONS_FILE: &str = "town_options.json";
/// File name of the JSON flat type option list.
pub const FLAT_TYPE_OPTIONS_FILE: &str = "flat_type_options.json";
/// File name of the JSON flat model option list.
pub const FLAT_MODEL_OPTIONS_FILE: &str = "flat_model_options.json";
/// File name of the JSON sale year option list.
pub const YEAR_OPTIONS_FILE: &str = "year_options.json";
/// File name of the JSON remaining lease option list.
pub const LEASE_OPTIONS_FILE: &str = "remaining_lease_years_options.json";

/// Everything the process loads at startup, exactly once.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactSet {
    pub model: PriceModelParams,
    pub model_columns: Vec<String>,
    pub town_options: Vec<String>,
    pub flat_type_options: Vec<String>,
    pub flat_model_options: Vec<String>,
    pub year_options: Vec<i64>,
    pub remaining_lease_years_options: Vec<i64>,
}

impl ArtifactSet {
    /// Load every artifact from `dir`.
    ///
    /// # Errors
    /// Returns the first failure encountered, with the offending path in the
    /// message. Callers treat any error as fatal.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, PredictError> {
        let dir = dir.as_ref();

        let model_bytes = std::fs::read(dir.join(MODEL_FILE)).map_err(|e| {
            PredictError::IoError(format!(
                "failed to read {}: {}",
                dir.join(MODEL_FILE).display(),
                e
            ))
        })?;
        let model = PriceModelParams::from_bytes(&model_bytes)?;

        Ok(Self {
            model,
            model_columns: load_json(dir.join(MODEL_COLUMNS_FILE))?,
            town_options: load_json(dir.join(TOWN_OPTIONS_FILE))?,
            flat_type_options: load_json(dir.join(FLAT_TYPE_OPTIONS_FILE))?,
            flat_model_options: load_json(dir.join(FLAT_MODEL_OPTIONS_FILE))?,
            year_options: load_json(dir.join(YEAR_OPTIONS_FILE))?,
            remaining_lease_years_options: load_json(dir.join(LEASE_OPTIONS_FILE))?,
        })
    }

    /// Write every artifact into `dir`, creating it if needed.
    ///
    /// Used by offline tooling and tests; the server itself only reads.
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<(), PredictError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        std::fs::write(dir.join(MODEL_FILE), self.model.to_bytes()?)?;
        save_json(dir.join(MODEL_COLUMNS_FILE), &self.model_columns)?;
        save_json(dir.join(TOWN_OPTIONS_FILE), &self.town_options)?;
        save_json(dir.join(FLAT_TYPE_OPTIONS_FILE), &self.flat_type_options)?;
        save_json(dir.join(FLAT_MODEL_OPTIONS_FILE), &self.flat_model_options)?;
        save_json(dir.join(YEAR_OPTIONS_FILE), &self.year_options)?;
        save_json(
            dir.join(LEASE_OPTIONS_FILE),
            &self.remaining_lease_years_options,
        )?;
        Ok(())
    }
}

fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, PredictError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| PredictError::IoError(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        PredictError::SerializationError(format!("failed to decode {}: {}", path.display(), e))
    })
}

fn save_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<(), PredictError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Small consistent artifact set shared by tests across the crate.
#[cfg(test)]
pub(crate) fn demo_artifacts() -> ArtifactSet {
    let feature_names_in = vec![
        "floor_area_sqm".to_string(),
        "storey_avg".to_string(),
        "remaining_lease_years".to_string(),
        "town_BEDOK".to_string(),
        "town_CLEMENTI".to_string(),
        "flat_type_3 ROOM".to_string(),
        "flat_type_4 ROOM".to_string(),
        "flat_model_Improved".to_string(),
        "year_2019".to_string(),
        "year_2020".to_string(),
    ];
    ArtifactSet {
        model: PriceModelParams {
            weights: vec![
                3000.0, 2500.0, 1200.0, 45000.0, 80000.0, -20000.0, 10000.0, 5000.0, 0.0, 8000.0,
            ],
            bias: 60000.0,
            feature_names_in: feature_names_in.clone(),
        },
        model_columns: feature_names_in,
        town_options: vec!["BEDOK".to_string(), "CLEMENTI".to_string()],
        flat_type_options: vec!["3 ROOM".to_string(), "4 ROOM".to_string()],
        flat_model_options: vec!["Improved".to_string()],
        year_options: vec![2019, 2020],
        remaining_lease_years_options: (1..=99).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_dir_round_trip() {
        let dir = std::env::temp_dir().join("test_hdb_artifact_round_trip");
        let artifacts = demo_artifacts();
        artifacts.save_to_dir(&dir).unwrap();

        let loaded = ArtifactSet::load_from_dir(&dir).unwrap();
        assert_eq!(loaded, artifacts);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_model_file_is_fatal() {
        let dir = std::env::temp_dir().join("test_hdb_artifact_missing_model");
        let artifacts = demo_artifacts();
        artifacts.save_to_dir(&dir).unwrap();
        std::fs::remove_file(dir.join(MODEL_FILE)).unwrap();

        let result = ArtifactSet::load_from_dir(&dir);
        assert!(matches!(result, Err(PredictError::IoError(_))));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_option_list_is_fatal() {
        let dir = std::env::temp_dir().join("test_hdb_artifact_missing_options");
        let artifacts = demo_artifacts();
        artifacts.save_to_dir(&dir).unwrap();
        std::fs::remove_file(dir.join(YEAR_OPTIONS_FILE)).unwrap();

        let result = ArtifactSet::load_from_dir(&dir);
        assert!(result.is_err());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_corrupt_json_reports_path() {
        let dir = std::env::temp_dir().join("test_hdb_artifact_corrupt_json");
        let artifacts = demo_artifacts();
        artifacts.save_to_dir(&dir).unwrap();
        std::fs::write(dir.join(TOWN_OPTIONS_FILE), b"{not json").unwrap();

        let err = ArtifactSet::load_from_dir(&dir).unwrap_err();
        assert!(err.to_string().contains(TOWN_OPTIONS_FILE));

        std::fs::remove_dir_all(dir).ok();
    }
}
