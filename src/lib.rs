//! # hdb-resale-predictor
//!
//! A form-driven web demo that predicts the resale price of HDB flats in
//! Singapore from a pre-trained linear regression model. The model is trained
//! and serialized offline; this crate loads it once, reconstructs the legal
//! input categories from its trained feature names, and turns each submitted
//! form record into the fixed-width one-hot vector the model expects.
//!
//! ## Core Design Principles
//!
//! - **Immutable context**: every artifact is loaded and validated once at
//!   startup into an [`AppContext`]; request handlers share it read-only.
//! - **Typed schema**: the model's delimited column names are parsed into an
//!   explicit [`schema::FeatureSchema`] at load time and checked against the
//!   training-time column list, failing fast on any mismatch.
//! - **Explicit alignment**: the feature vector is built by an ordered merge
//!   over the schema, never by guessing column positions at predict time.
//!
//! ## Module Structure
//!
//! - `schema` — typed feature schema and derived category catalog
//! - `align` — one-hot encoding and alignment of a single selection
//! - `model` — fitted linear regression with serializable parameters
//! - `artifacts` — loading/saving of the startup artifact files
//! - `context` — the immutable per-process application context
//! - `web` — axum router, form page and predict endpoint
//! - `error` — the crate error type

/// One-hot encoding and feature alignment for a single selection.
pub mod align;

/// Loading and saving of the serialized startup artifacts.
pub mod artifacts;

/// Immutable application context built once at process start.
pub mod context;

/// Error types for artifact loading, schema validation and alignment.
pub mod error;

/// Fitted linear regression model for price prediction.
pub mod model;

/// Typed feature schema and category catalog.
pub mod schema;

/// HTTP surface: the form page and the predict endpoint.
pub mod web;

pub use align::{align, Selection, UnknownCategory};
pub use context::AppContext;
pub use error::PredictError;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::demo_artifacts;

    // End-to-end: artifacts on disk -> context -> aligned prediction.
    #[test]
    fn test_load_and_predict_round_trip() {
        let dir = std::env::temp_dir().join("test_hdb_end_to_end");
        demo_artifacts().save_to_dir(&dir).unwrap();

        let ctx = AppContext::load(&dir).unwrap();
        let selection = Selection {
            town: "CLEMENTI".to_string(),
            flat_type: "3 ROOM".to_string(),
            flat_model: "Improved".to_string(),
            storey: 5,
            year: 2020,
            remaining_lease_years: 70,
            floor_area_sqm: 68.0,
        };

        let prediction = ctx.predict(&selection).unwrap();
        // 68*3000 + 5*2500 + 70*1200 + town_CLEMENTI 80000 + flat_type_3 ROOM
        // -20000 + flat_model_Improved 5000 + bias 60000; year dummies stay 0.
        assert!((prediction - 425_500.0).abs() < 1e-6);

        // Same selection, same schema: bit-identical result.
        let again = ctx.predict(&selection).unwrap();
        assert_eq!(prediction.to_bits(), again.to_bits());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_unknown_flat_type_is_rejected_end_to_end() {
        let ctx = AppContext::from_artifacts(demo_artifacts()).unwrap();
        let selection = Selection {
            town: "BEDOK".to_string(),
            flat_type: "9 ROOM".to_string(),
            flat_model: "Improved".to_string(),
            storey: 5,
            year: 2020,
            remaining_lease_years: 70,
            floor_area_sqm: 68.0,
        };
        let result = ctx.predict(&selection);
        assert!(matches!(
            result,
            Err(PredictError::UnknownCategory { ref field, .. }) if field == "flat_type"
        ));
    }
}
