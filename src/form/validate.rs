use super::stage::{read_selected_stage, NO_STAGE};
use super::FormSnapshot;
use crate::api::PredictionRequest;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Form controls that must be filled before a prediction is requested.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Stage,
    CancerCategory,
    DiagnosisMethod,
    TreatmentCategory,
}

impl Field {
    /// Identifier of the control on the page.
    pub fn element_id(self) -> &'static str {
        match self {
            Field::Age => "uiAge",
            Field::Stage => "uiStage",
            Field::CancerCategory => "uiCancerCategory",
            Field::DiagnosisMethod => "uiDiagnosisMethod",
            Field::TreatmentCategory => "uiTreatmentCategory",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Age => "age",
            Field::Stage => "stage",
            Field::CancerCategory => "cancer category",
            Field::DiagnosisMethod => "diagnosis method",
            Field::TreatmentCategory => "treatment category",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(Field),
    #[error("age must be a number, got {0:?}")]
    InvalidAge(String),
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Missing(field) => *field,
            ValidationError::InvalidAge(_) => Field::Age,
        }
    }
}

/// Blank or whitespace-only input counts as missing. The value itself is
/// returned untouched.
fn required(value: &str, field: Field) -> Result<&str, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(value)
}

pub struct Validator;

impl Validator {
    /// Turns a snapshot into a request, reporting the first offending field.
    ///
    /// Presence is checked for every field before the age is parsed, so an
    /// incomplete form always reports a missing field.
    pub fn validate(form: &FormSnapshot) -> Result<PredictionRequest, ValidationError> {
        let age = required(&form.age, Field::Age)?;

        let stage = read_selected_stage(&form.stage);
        if stage == NO_STAGE {
            return Err(ValidationError::Missing(Field::Stage));
        }

        let cancer_category = required(&form.cancer_category, Field::CancerCategory)?;
        let diagnosis_method = required(&form.diagnosis_method, Field::DiagnosisMethod)?;
        let treatment_category = required(&form.treatment_category, Field::TreatmentCategory)?;

        let age_at_diagnosis = age
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| ValidationError::InvalidAge(age.to_string()))?;

        // Category values go out exactly as the select control held them.
        Ok(PredictionRequest {
            age_at_diagnosis,
            ajcc_pathologic_stage: stage,
            cancer_category: cancer_category.to_string(),
            diagnosis_method: diagnosis_method.to_string(),
            treatment_category: treatment_category.to_string(),
        })
    }
}
