//! Immutable application context built once at process start.
//!
//! [`AppContext`] replaces ad-hoc process globals: every artifact is loaded
//! and validated during construction, and the resulting context is never
//! mutated. Request handlers receive it by shared reference, which makes it
//! safe to serve from as many concurrent connections as the runtime accepts.

use crate::align::{align, Selection, UnknownCategory};
use crate::artifacts::ArtifactSet;
use crate::error::PredictError;
use crate::model::PriceModel;
use crate::schema::{CategoryCatalog, FeatureSchema};
use std::path::Path;

/// Read-only bundle of everything a request needs: the fitted model, the
/// typed schema parsed from it, the derived category catalog, and the widget
/// option lists.
#[derive(Clone, Debug)]
pub struct AppContext {
    model: PriceModel,
    schema: FeatureSchema,
    catalog: CategoryCatalog,
    town_options: Vec<String>,
    flat_type_options: Vec<String>,
    flat_model_options: Vec<String>,
    year_options: Vec<i64>,
    remaining_lease_years_options: Vec<i64>,
}

impl AppContext {
    /// Load every artifact from `dir` and build the context.
    ///
    /// # Errors
    /// Any artifact or validation failure is returned as-is; there is no
    /// partial operation, callers abort startup on error.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, PredictError> {
        let artifacts = ArtifactSet::load_from_dir(dir)?;
        Self::from_artifacts(artifacts)
    }

    /// Build the context from an already loaded artifact set.
    ///
    /// Parses the model's feature names into the typed schema, checks it
    /// against the training-time column list (fail fast on mismatch) and
    /// derives the category catalog.
    pub fn from_artifacts(artifacts: ArtifactSet) -> Result<Self, PredictError> {
        let model = PriceModel::new(artifacts.model)?;
        let schema = FeatureSchema::parse(model.feature_names_in());
        schema.validate_against(&artifacts.model_columns)?;
        let catalog = CategoryCatalog::from_schema(&schema)?;

        Ok(Self {
            model,
            schema,
            catalog,
            town_options: artifacts.town_options,
            flat_type_options: artifacts.flat_type_options,
            flat_model_options: artifacts.flat_model_options,
            year_options: artifacts.year_options,
            remaining_lease_years_options: artifacts.remaining_lease_years_options,
        })
    }

    /// Align one selection and run the model on it.
    ///
    /// Uses [`UnknownCategory::Reject`]: the widgets are populated from the
    /// catalog, so an unknown nominal value means the request bypassed the
    /// form and is answered with an error instead of a degraded prediction.
    pub fn predict(&self, selection: &Selection) -> Result<f64, PredictError> {
        let features = align(selection, &self.schema, &self.catalog, UnknownCategory::Reject)?;
        self.model.predict(&features)
    }

    /// The typed schema parsed from the model.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// The derived category catalog.
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Town options for the form widget.
    pub fn town_options(&self) -> &[String] {
        &self.town_options
    }

    /// Flat type options for the form widget.
    pub fn flat_type_options(&self) -> &[String] {
        &self.flat_type_options
    }

    /// Flat model options for the form widget.
    pub fn flat_model_options(&self) -> &[String] {
        &self.flat_model_options
    }

    /// Sale year options for the form widget.
    pub fn year_options(&self) -> &[i64] {
        &self.year_options
    }

    /// Remaining lease options for the form widget.
    pub fn remaining_lease_years_options(&self) -> &[i64] {
        &self.remaining_lease_years_options
    }
}
