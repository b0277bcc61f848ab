//! # Prediction service API
//!
//! Wire types and the [`PredictionBackend`] seam between the form controller
//! and the service that hosts the model.
//!
//! ```text
//! POST /predict_treatment            form fields  → { "prediction": "..." }
//! GET  /get_cancer_categories                     → { "cancer_categories": [..] }
//! GET  /get_diagnosis_methods                     → { "diagnosis_methods": [..] }
//! GET  /get_treatment_categories                  → { "treatment_categories": [..] }
//! GET  /get_stage_label?stage=N                   → { "stage_label": "..." }
//! ```
//!
//! Any of these may answer `{ "error": "..." }` with a success status.

pub mod http;

pub use http::HttpBackend;

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated feature set sent to the prediction endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub age_at_diagnosis: f64,
    pub ajcc_pathologic_stage: i32,
    pub cancer_category: String,
    pub diagnosis_method: String,
    pub treatment_category: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct PredictionResponse {
    #[serde(default)]
    pub prediction: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PredictionResponse {
    pub fn into_result(self) -> ClientResult<String> {
        match (self.prediction, self.error) {
            (_, Some(error)) => Err(ClientError::Backend(error)),
            (Some(prediction), None) => Ok(prediction),
            (None, None) => Err(ClientError::decode("response has no `prediction` field")),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct StageLabelResponse {
    #[serde(default)]
    pub stage_label: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StageLabelResponse {
    pub fn into_result(self) -> ClientResult<String> {
        match (self.stage_label, self.error) {
            (_, Some(error)) => Err(ClientError::Backend(error)),
            (Some(label), None) => Ok(label),
            (None, None) => Err(ClientError::decode("response has no `stage_label` field")),
        }
    }
}

/// The three server-provided enumerations behind the form's select controls.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionCategory {
    CancerCategories,
    DiagnosisMethods,
    TreatmentCategories,
}

impl OptionCategory {
    pub const ALL: [OptionCategory; 3] = [
        OptionCategory::CancerCategories,
        OptionCategory::DiagnosisMethods,
        OptionCategory::TreatmentCategories,
    ];

    pub fn path(self) -> &'static str {
        match self {
            OptionCategory::CancerCategories => "get_cancer_categories",
            OptionCategory::DiagnosisMethods => "get_diagnosis_methods",
            OptionCategory::TreatmentCategories => "get_treatment_categories",
        }
    }

    /// Key under which the list appears in the response body.
    pub fn response_key(self) -> &'static str {
        match self {
            OptionCategory::CancerCategories => "cancer_categories",
            OptionCategory::DiagnosisMethods => "diagnosis_methods",
            OptionCategory::TreatmentCategories => "treatment_categories",
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            OptionCategory::CancerCategories => "uiCancerCategory",
            OptionCategory::DiagnosisMethods => "uiDiagnosisMethod",
            OptionCategory::TreatmentCategories => "uiTreatmentCategory",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            OptionCategory::CancerCategories => "Choose a Cancer Category",
            OptionCategory::DiagnosisMethods => "Choose a Diagnosis Method",
            OptionCategory::TreatmentCategories => "Choose a Treatment Category",
        }
    }

    /// Pulls this category's list out of a decoded response body.
    pub fn extract(self, body: serde_json::Value) -> ClientResult<Vec<String>> {
        let mut body = match body {
            serde_json::Value::Object(map) => map,
            other => return Err(ClientError::decode(format!("expected an object, got {}", other))),
        };
        if let Some(serde_json::Value::String(error)) = body.remove("error") {
            return Err(ClientError::Backend(error));
        }
        let list = body
            .remove(self.response_key())
            .ok_or_else(|| ClientError::decode(format!("response has no `{}` field", self.response_key())))?;
        serde_json::from_value(list).map_err(|e| ClientError::decode(e.to_string()))
    }
}

impl fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response_key().replace('_', " "))
    }
}

#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Requests a treatment prediction for one patient.
    async fn predict(&self, request: &PredictionRequest) -> ClientResult<String>;

    /// Fetches the ordered option list for one select control.
    async fn option_list(&self, category: OptionCategory) -> ClientResult<Vec<String>>;

    async fn stage_label(&self, stage: i32) -> ClientResult<String>;
}
