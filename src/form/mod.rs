//! Form state as read from the page, and its validation into a request.

pub mod stage;
pub mod validate;

pub use stage::{read_selected_stage, stage_label, standard_stage_options, Stage, StageOption, NO_STAGE};
pub use validate::{Field, ValidationError, Validator};

use crate::api::PredictionRequest;
use serde::{Deserialize, Serialize};

/// Raw values of the prediction form at the moment the user clicked predict.
///
/// Select controls report an empty string while their placeholder is selected.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub stage: Vec<StageOption>,
    #[serde(default)]
    pub cancer_category: String,
    #[serde(default)]
    pub diagnosis_method: String,
    #[serde(default)]
    pub treatment_category: String,
}

impl FormSnapshot {
    pub fn new(age: impl Into<String>) -> Self {
        Self {
            age: age.into(),
            stage: standard_stage_options(),
            ..Default::default()
        }
    }

    /// Checks `stage` in a standard radio group, clearing any other selection.
    pub fn with_stage(mut self, stage: Stage) -> Self {
        let value = stage.code().to_string();
        if self.stage.is_empty() {
            self.stage = standard_stage_options();
        }
        for option in &mut self.stage {
            option.checked = option.value == value;
        }
        self
    }

    pub fn with_cancer_category(mut self, value: impl Into<String>) -> Self {
        self.cancer_category = value.into();
        self
    }

    pub fn with_diagnosis_method(mut self, value: impl Into<String>) -> Self {
        self.diagnosis_method = value.into();
        self
    }

    pub fn with_treatment_category(mut self, value: impl Into<String>) -> Self {
        self.treatment_category = value.into();
        self
    }

    pub fn selected_stage(&self) -> i32 {
        read_selected_stage(&self.stage)
    }

    pub fn validate(&self) -> Result<PredictionRequest, ValidationError> {
        Validator::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_stage_replaces_selection() {
        let form = FormSnapshot::new("50").with_stage(Stage::II).with_stage(Stage::IV);
        assert_eq!(form.selected_stage(), 10);
        assert_eq!(form.stage.iter().filter(|o| o.checked).count(), 1);
    }

    #[test]
    fn test_deserialize_from_page() {
        let json = r#"{
            "age": "45",
            "stage": [{"value": "0", "checked": false}, {"value": "3", "checked": true}],
            "cancerCategory": "Ductal",
            "diagnosisMethod": "Biopsy",
            "treatmentCategory": "Surgery"
        }"#;
        let form: FormSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(form.selected_stage(), 3);
        assert_eq!(form.cancer_category, "Ductal");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_empty_payload_is_invalid() {
        let form: FormSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(form.selected_stage(), NO_STAGE);
        assert_eq!(form.validate(), Err(ValidationError::Missing(Field::Age)));
    }
}
