//! Pure render functions: form outcomes in, display content out.
//!
//! Nothing here touches the UI. The adapter applies a [`UiPatch`] by
//! replacing the inner HTML of the element it names.

use crate::api::OptionCategory;
use crate::error::ClientError;
use serde::{Deserialize, Serialize};

pub const RESULT_ELEMENT_ID: &str = "uiResult";
pub const VALIDATION_MESSAGE: &str = "Please fill in all fields.";
pub const REMOTE_ERROR_MESSAGE: &str = "Error in prediction. Try again.";

/// Content of the result area.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultView {
    #[default]
    Empty,
    Prediction {
        text: String,
    },
    ValidationError,
    RemoteError,
}

impl ResultView {
    pub fn prediction(text: impl Into<String>) -> Self {
        ResultView::Prediction { text: text.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultView::ValidationError | ResultView::RemoteError)
    }

    pub fn message(&self) -> &str {
        match self {
            ResultView::Empty => "",
            ResultView::Prediction { text } => text.as_str(),
            ResultView::ValidationError => VALIDATION_MESSAGE,
            ResultView::RemoteError => REMOTE_ERROR_MESSAGE,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            ResultView::Empty => String::new(),
            ResultView::Prediction { text } => format!("<h2>{}</h2>", escape_html(text)),
            _ => format!("<h2 style='color:red;'>{}</h2>", self.message()),
        }
    }

    pub fn patch(&self) -> UiPatch {
        UiPatch {
            element_id: RESULT_ELEMENT_ID.to_string(),
            html: self.to_html(),
            degraded: false,
        }
    }
}

/// Maps the outcome of a submission to what the result area shows.
///
/// Remote failures all collapse to one fixed message; the detail goes to the log.
pub fn render_outcome(outcome: &Result<String, ClientError>) -> ResultView {
    match outcome {
        Ok(prediction) => ResultView::prediction(prediction.as_str()),
        Err(ClientError::Validation(_)) => ResultView::ValidationError,
        Err(_) => ResultView::RemoteError,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
}

impl SelectOption {
    fn placeholder(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            disabled: true,
            selected: true,
        }
    }

    fn item(text: &str) -> Self {
        Self {
            value: text.to_string(),
            label: text.to_string(),
            disabled: false,
            selected: false,
        }
    }
}

/// Full option set of one select control.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SelectView {
    pub category: OptionCategory,
    pub options: Vec<SelectOption>,
    /// Set when the list could not be loaded and only a notice is shown.
    pub degraded: bool,
}

impl SelectView {
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for option in &self.options {
            html.push_str("<option");
            if option.disabled {
                html.push_str(" disabled");
            }
            if option.selected {
                html.push_str(" selected");
            }
            html.push_str(&format!(
                " value=\"{}\">{}</option>",
                escape_html(&option.value),
                escape_html(&option.label)
            ));
        }
        html
    }

    /// Values the user can actually pick, in display order.
    pub fn selectable(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|o| !o.disabled)
            .map(|o| o.value.as_str())
    }

    pub fn patch(&self) -> UiPatch {
        UiPatch {
            element_id: self.category.element_id().to_string(),
            html: self.to_html(),
            degraded: self.degraded,
        }
    }
}

/// Placeholder first, then one option per server string in server order.
pub fn render_options(category: OptionCategory, items: &[String]) -> SelectView {
    let options = std::iter::once(SelectOption::placeholder(category.placeholder()))
        .chain(items.iter().map(|item| SelectOption::item(item)))
        .collect();
    SelectView {
        category,
        options,
        degraded: false,
    }
}

pub fn render_degraded(category: OptionCategory) -> SelectView {
    SelectView {
        category,
        options: vec![SelectOption::placeholder(format!("Unable to load {}", category))],
        degraded: true,
    }
}

pub fn render_option_list(category: OptionCategory, outcome: &Result<Vec<String>, ClientError>) -> SelectView {
    match outcome {
        Ok(items) => render_options(category, items),
        Err(_) => render_degraded(category),
    }
}

/// The three select controls after page load.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DropdownsView {
    pub cancer_categories: SelectView,
    pub diagnosis_methods: SelectView,
    pub treatment_categories: SelectView,
}

impl DropdownsView {
    pub fn get(&self, category: OptionCategory) -> &SelectView {
        match category {
            OptionCategory::CancerCategories => &self.cancer_categories,
            OptionCategory::DiagnosisMethods => &self.diagnosis_methods,
            OptionCategory::TreatmentCategories => &self.treatment_categories,
        }
    }

    pub fn patches(&self) -> Vec<UiPatch> {
        OptionCategory::ALL
            .iter()
            .map(|&category| self.get(category).patch())
            .collect()
    }
}

/// Instruction for the UI adapter: replace the content of `element_id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UiPatch {
    pub element_id: String,
    pub html: String,
    pub degraded: bool,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
