//! One-hot encoding and feature alignment for a single selection.
//!
//! The trained model accepts a fixed-width, fixed-order numeric vector. A
//! submitted [`Selection`] is always narrower than that: it carries one value
//! per field, not one column per trained category. [`align`] reconstructs the
//! exact training-time shape with an explicit ordered merge over the schema:
//! each column takes its one-hot value if this selection produced it, the
//! matching raw numeric field if one exists, and 0 otherwise.

use crate::error::PredictError;
use crate::schema::{CategoryCatalog, FeatureColumn, FeatureSchema};
use serde::{Deserialize, Serialize};

/// The three fields the aligner one-hot encodes. Storey, year and remaining
/// lease reach the model through plain numeric columns only; any
/// `storey_avg_*` or `year_*` dummy column in the schema stays 0.
const NOMINAL_FIELDS: [&str; 3] = ["town", "flat_type", "flat_model"];

/// One user-submitted record, created per form submission and discarded after
/// the prediction is rendered. Doubles as the predict endpoint's request body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub town: String,
    pub flat_type: String,
    pub flat_model: String,
    pub storey: i64,
    pub year: i64,
    pub remaining_lease_years: i64,
    pub floor_area_sqm: f64,
}

impl Selection {
    /// The selected value for one of the nominal fields, or `None` for any
    /// other field name.
    fn nominal_value(&self, field: &str) -> Option<&str> {
        match field {
            "town" => Some(&self.town),
            "flat_type" => Some(&self.flat_type),
            "flat_model" => Some(&self.flat_model),
            _ => None,
        }
    }

    /// The raw numeric value carried by a plain schema column, or `None` if
    /// this selection holds no field of that name.
    fn numeric_value(&self, name: &str) -> Option<f64> {
        match name {
            "floor_area_sqm" => Some(self.floor_area_sqm),
            "storey_avg" => Some(self.storey as f64),
            "year" => Some(self.year as f64),
            "remaining_lease_years" => Some(self.remaining_lease_years as f64),
            _ => None,
        }
    }
}

/// Strategy for handling a nominal value absent from the catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownCategory {
    /// Fail loudly before encoding. The form widgets are populated from the
    /// catalog, so a rejected value can only come from a hand-built request.
    #[default]
    Reject,
    /// Encode the unknown value as all-zero dummy columns, no error. This is
    /// the degraded-but-valid behavior of `reindex(..., fill_value=0)`.
    ZeroFill,
}

/// Align one selection against the schema, producing exactly one numeric
/// entry per trained column, in training order.
///
/// The output always has the schema's length; calling this twice with the
/// same inputs yields bit-identical vectors.
///
/// # Errors
/// Under [`UnknownCategory::Reject`], returns
/// [`PredictError::UnknownCategory`] when a nominal value is absent from a
/// non-empty catalog field. A field with no catalog values has no dummy
/// columns to misalign, so it is never rejected.
pub fn align(
    selection: &Selection,
    schema: &FeatureSchema,
    catalog: &CategoryCatalog,
    policy: UnknownCategory,
) -> Result<Vec<f64>, PredictError> {
    if policy == UnknownCategory::Reject {
        for field in NOMINAL_FIELDS {
            let selected = selection.nominal_value(field);
            let known = catalog.nominal_values(field).unwrap_or_default();
            if let Some(selected) = selected {
                if !known.is_empty() && !known.iter().any(|v| v == selected) {
                    return Err(PredictError::UnknownCategory {
                        field: field.to_string(),
                        value: selected.to_string(),
                    });
                }
            }
        }
    }

    let vector = schema
        .columns()
        .iter()
        .map(|column| match column {
            FeatureColumn::Numeric { name } => selection.numeric_value(name).unwrap_or(0.0),
            FeatureColumn::Categorical { field, value } => {
                match selection.nominal_value(field) {
                    Some(selected) if selected == value => 1.0,
                    _ => 0.0,
                }
            }
        })
        .collect();

    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_of(raw: &[&str]) -> FeatureSchema {
        let names: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        FeatureSchema::parse(&names)
    }

    fn catalog_of(schema: &FeatureSchema) -> CategoryCatalog {
        CategoryCatalog::from_schema(schema).unwrap()
    }

    fn bedok_selection() -> Selection {
        Selection {
            town: "BEDOK".to_string(),
            flat_type: "4 ROOM".to_string(),
            flat_model: "Improved".to_string(),
            storey: 10,
            year: 2019,
            remaining_lease_years: 60,
            floor_area_sqm: 90.0,
        }
    }

    #[test]
    fn test_align_worked_example() {
        // Columns and expectations straight from the model contract:
        // selected dummies 1, unselected 0, numerics passed through.
        let schema = schema_of(&[
            "floor_area_sqm",
            "storey_avg",
            "town_BEDOK",
            "town_CLEMENTI",
            "flat_type_3 ROOM",
            "flat_type_4 ROOM",
        ]);
        let catalog = catalog_of(&schema);
        let vector = align(
            &bedok_selection(),
            &schema,
            &catalog,
            UnknownCategory::Reject,
        )
        .unwrap();
        assert_eq!(vector, vec![90.0, 10.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_align_output_matches_schema_width() {
        let schema = schema_of(&[
            "floor_area_sqm",
            "storey_avg",
            "remaining_lease_years",
            "year",
            "town_BEDOK",
            "town_CLEMENTI",
            "town_PUNGGOL",
            "flat_type_4 ROOM",
            "flat_model_Improved",
        ]);
        let catalog = catalog_of(&schema);
        let vector = align(
            &bedok_selection(),
            &schema,
            &catalog,
            UnknownCategory::Reject,
        )
        .unwrap();
        assert_eq!(vector.len(), schema.len());
    }

    #[test]
    fn test_align_numeric_fields_pass_through() {
        let schema = schema_of(&[
            "floor_area_sqm",
            "storey_avg",
            "year",
            "remaining_lease_years",
        ]);
        let catalog = catalog_of(&schema);
        let vector = align(
            &bedok_selection(),
            &schema,
            &catalog,
            UnknownCategory::Reject,
        )
        .unwrap();
        assert_eq!(vector, vec![90.0, 10.0, 2019.0, 60.0]);
    }

    #[test]
    fn test_align_unknown_numeric_column_filled_with_zero() {
        // A numeric column the selection does not carry defaults to 0.
        let schema = schema_of(&["floor_area_sqm", "lease_commence_date"]);
        let catalog = catalog_of(&schema);
        let vector = align(
            &bedok_selection(),
            &schema,
            &catalog,
            UnknownCategory::Reject,
        )
        .unwrap();
        assert_eq!(vector, vec![90.0, 0.0]);
    }

    #[test]
    fn test_align_year_dummies_stay_zero() {
        // year is never one-hot expanded, so year_* dummies stay 0 even when
        // the selected year matches; a plain year column takes the raw value.
        let schema = schema_of(&["year", "year_2019", "year_2020"]);
        let catalog = catalog_of(&schema);
        let vector = align(
            &bedok_selection(),
            &schema,
            &catalog,
            UnknownCategory::Reject,
        )
        .unwrap();
        assert_eq!(vector, vec![2019.0, 0.0, 0.0]);
    }

    #[test]
    fn test_align_storey_dummies_stay_zero() {
        let schema = schema_of(&["storey_avg_10", "storey_avg_2", "storey_avg"]);
        let catalog = catalog_of(&schema);
        let vector = align(
            &bedok_selection(),
            &schema,
            &catalog,
            UnknownCategory::Reject,
        )
        .unwrap();
        assert_eq!(vector, vec![0.0, 0.0, 10.0]);
    }

    #[test]
    fn test_align_unknown_town_rejected() {
        let schema = schema_of(&["town_BEDOK", "town_CLEMENTI"]);
        let catalog = catalog_of(&schema);
        let mut selection = bedok_selection();
        selection.town = "ATLANTIS".to_string();
        let result = align(&selection, &schema, &catalog, UnknownCategory::Reject);
        match result {
            Err(PredictError::UnknownCategory { field, value }) => {
                assert_eq!(field, "town");
                assert_eq!(value, "ATLANTIS");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_align_unknown_town_zero_fills() {
        let schema = schema_of(&["floor_area_sqm", "town_BEDOK", "town_CLEMENTI"]);
        let catalog = catalog_of(&schema);
        let mut selection = bedok_selection();
        selection.town = "ATLANTIS".to_string();
        let vector = align(&selection, &schema, &catalog, UnknownCategory::ZeroFill).unwrap();
        assert_eq!(vector, vec![90.0, 0.0, 0.0]);
    }

    #[test]
    fn test_align_field_without_catalog_values_not_rejected() {
        // No flat_model_* columns were trained, so there is nothing for the
        // selected flat model to misalign with.
        let schema = schema_of(&["floor_area_sqm", "town_BEDOK"]);
        let catalog = catalog_of(&schema);
        let result = align(
            &bedok_selection(),
            &schema,
            &catalog,
            UnknownCategory::Reject,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_align_idempotent() {
        let schema = schema_of(&[
            "floor_area_sqm",
            "storey_avg",
            "town_BEDOK",
            "town_CLEMENTI",
            "flat_type_4 ROOM",
        ]);
        let catalog = catalog_of(&schema);
        let selection = bedok_selection();
        let first = align(&selection, &schema, &catalog, UnknownCategory::Reject).unwrap();
        let second = align(&selection, &schema, &catalog, UnknownCategory::Reject).unwrap();
        assert_eq!(
            first.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            second.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_selection_json_round_trip() {
        let selection = bedok_selection();
        let json = serde_json::to_string(&selection).unwrap();
        let back: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }
}
