//! Typed feature schema and category catalog.
//!
//! The trained model records its input columns as an ordered list of names.
//! Categorical columns carry the delimited form `<field>_<value>` produced by
//! one-hot encoding at training time (e.g. `town_BEDOK`); everything else is a
//! plain numeric column (e.g. `floor_area_sqm`). This module parses that list
//! once, at load time, into an explicit [`FeatureSchema`] and derives the
//! [`CategoryCatalog`] of legal values for each categorical field.
//!
//! # Example
//! ```
//! use hdb_resale_predictor::schema::{CategoryCatalog, FeatureSchema};
//!
//! let columns = vec![
//!     "floor_area_sqm".to_string(),
//!     "town_BEDOK".to_string(),
//!     "town_CLEMENTI".to_string(),
//! ];
//! let schema = FeatureSchema::parse(&columns);
//! let catalog = CategoryCatalog::from_schema(&schema).unwrap();
//! assert_eq!(catalog.towns(), ["BEDOK", "CLEMENTI"]);
//! ```

use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// Categorical field prefixes recognized in trained column names, paired with
/// the field each prefix encodes. A bare `storey_avg` (no trailing separator)
/// never matches `storey_avg_` and stays numeric.
const CATEGORICAL_PREFIXES: [(&str, &str); 5] = [
    ("town", "town_"),
    ("flat_type", "flat_type_"),
    ("flat_model", "flat_model_"),
    ("storey_avg", "storey_avg_"),
    ("year", "year_"),
];

/// Storey options presented when the model encodes storey as a plain numeric
/// feature instead of one-hot categories.
pub const STOREY_FALLBACK: std::ops::RangeInclusive<i64> = 1..=50;

/// One column of the trained model's input, as the model understands it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureColumn {
    /// A plain numeric feature, addressed by its full name.
    Numeric { name: String },
    /// A one-hot dummy column for a single categorical value.
    Categorical { field: String, value: String },
}

impl FeatureColumn {
    /// Parse one trained column name. Names starting with a recognized
    /// categorical prefix become [`FeatureColumn::Categorical`]; all others
    /// are numeric.
    pub fn parse(name: &str) -> Self {
        for (field, prefix) in CATEGORICAL_PREFIXES {
            if let Some(value) = name.strip_prefix(prefix) {
                return FeatureColumn::Categorical {
                    field: field.to_string(),
                    value: value.to_string(),
                };
            }
        }
        FeatureColumn::Numeric {
            name: name.to_string(),
        }
    }

    /// Reconstruct the full trained column name.
    pub fn column_name(&self) -> String {
        match self {
            FeatureColumn::Numeric { name } => name.clone(),
            FeatureColumn::Categorical { field, value } => format!("{}_{}", field, value),
        }
    }
}

/// Ordered, typed description of every input column the model expects.
///
/// Produced once from the model artifact and never mutated; the aligner walks
/// it in order to build each feature vector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    /// Parse the model's ordered input feature names into a typed schema.
    pub fn parse(feature_names: &[String]) -> Self {
        let columns = feature_names
            .iter()
            .map(|name| FeatureColumn::parse(name))
            .collect();
        Self { columns }
    }

    /// Columns in training order.
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Number of input columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check this schema against the separately serialized training-time
    /// column list.
    ///
    /// The two artifacts are produced by the same offline training run and
    /// must agree exactly; a divergence means the model would be fed a
    /// misaligned vector, so loading fails instead of silently zero-filling.
    ///
    /// # Errors
    /// Returns [`PredictError::ColumnMismatch`] on any difference in length,
    /// order, or names.
    pub fn validate_against(&self, training_columns: &[String]) -> Result<(), PredictError> {
        if self.columns.len() != training_columns.len() {
            return Err(PredictError::ColumnMismatch(format!(
                "model has {} input columns but the column list records {}",
                self.columns.len(),
                training_columns.len()
            )));
        }
        for (idx, (column, expected)) in self.columns.iter().zip(training_columns).enumerate() {
            let name = column.column_name();
            if &name != expected {
                return Err(PredictError::ColumnMismatch(format!(
                    "column {} is {:?} in the model but {:?} in the column list",
                    idx, name, expected
                )));
            }
        }
        Ok(())
    }
}

/// Legal values for each categorical field, in the order their columns first
/// appear in the model.
///
/// Every value listed here corresponds to exactly one schema column; the
/// catalog never contains a value the model was not trained on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryCatalog {
    towns: Vec<String>,
    flat_types: Vec<String>,
    flat_models: Vec<String>,
    years: Vec<String>,
    storeys: Vec<i64>,
}

impl CategoryCatalog {
    /// Derive the catalog from a parsed schema.
    ///
    /// Values keep first-seen order and are deduplicated. Storey values are
    /// parsed as integers; when the schema carries no `storey_avg_*` column
    /// the storey set falls back to [`STOREY_FALLBACK`] so the UI always has
    /// a usable storey range.
    ///
    /// # Errors
    /// Returns [`PredictError::InvalidColumnName`] if a `storey_avg_*` suffix
    /// is not an integer.
    pub fn from_schema(schema: &FeatureSchema) -> Result<Self, PredictError> {
        let mut towns = Vec::new();
        let mut flat_types = Vec::new();
        let mut flat_models = Vec::new();
        let mut years = Vec::new();
        let mut storey_values = Vec::new();

        for column in schema.columns() {
            if let FeatureColumn::Categorical { field, value } = column {
                let bucket = match field.as_str() {
                    "town" => &mut towns,
                    "flat_type" => &mut flat_types,
                    "flat_model" => &mut flat_models,
                    "year" => &mut years,
                    "storey_avg" => &mut storey_values,
                    _ => continue,
                };
                if !bucket.contains(value) {
                    bucket.push(value.clone());
                }
            }
        }

        let storeys = if storey_values.is_empty() {
            STOREY_FALLBACK.collect()
        } else {
            storey_values
                .iter()
                .map(|value| {
                    value.parse::<i64>().map_err(|_| {
                        PredictError::InvalidColumnName(format!(
                            "storey_avg_{} does not carry an integer storey",
                            value
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            towns,
            flat_types,
            flat_models,
            years,
            storeys,
        })
    }

    /// Towns the model was trained on.
    pub fn towns(&self) -> &[String] {
        &self.towns
    }

    /// Flat types the model was trained on.
    pub fn flat_types(&self) -> &[String] {
        &self.flat_types
    }

    /// Flat models the model was trained on.
    pub fn flat_models(&self) -> &[String] {
        &self.flat_models
    }

    /// Sale years the model was trained on, as raw column suffixes.
    pub fn years(&self) -> &[String] {
        &self.years
    }

    /// Storey options, either parsed from `storey_avg_*` columns or the
    /// fallback range.
    pub fn storeys(&self) -> &[i64] {
        &self.storeys
    }

    /// Catalog values for one of the nominal fields the aligner one-hot
    /// encodes, or `None` for any other field name.
    pub fn nominal_values(&self, field: &str) -> Option<&[String]> {
        match field {
            "town" => Some(&self.towns),
            "flat_type" => Some(&self.flat_types),
            "flat_model" => Some(&self.flat_models),
            _ => None,
        }
    }
}
