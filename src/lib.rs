//! # Treatment predictor
//!
//! Client for the TCGA-BRCA treatment prediction service. The form is read
//! into a [`FormSnapshot`], validated into a [`PredictionRequest`], sent through
//! a [`PredictionBackend`], and the outcome rendered into plain view values
//! that the desktop shell applies to the page.
//!
//! ```text
//! page load → FormController::load_dropdowns → 3 × option list → DropdownsView
//! predict   → FormController::submit → validate → predict → ResultView
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod logging;
pub mod render;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
use crate::commands::*;

pub use api::{HttpBackend, OptionCategory, PredictionBackend, PredictionRequest};
pub use config::ClientConfig;
pub use controller::FormController;
pub use error::{ClientError, ClientResult};
pub use form::{read_selected_stage, FormSnapshot, Stage, StageOption, NO_STAGE};
pub use render::{DropdownsView, ResultView, SelectView, UiPatch};

/// Builds a controller talking HTTP to the service named by `config`.
pub fn http_controller(config: ClientConfig) -> ClientResult<FormController> {
    let backend = HttpBackend::new(config)?;
    Ok(FormController::new(std::sync::Arc::new(backend)))
}

#[cfg(feature = "desktop")]
fn app_state() -> anyhow::Result<AppState> {
    use anyhow::Context;

    let config = ClientConfig::load().context("resolving client configuration")?;
    let controller = http_controller(config).context("building the HTTP client")?;
    Ok(AppState {
        controller: std::sync::Arc::new(controller),
    })
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    logging::init();

    let state = app_state().unwrap_or_else(|e| {
        tracing::error!(error = %format!("{:#}", e), "Startup failed");
        std::process::exit(1);
    });

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(state)
        .invoke_handler(tauri::generate_handler![
            load_dropdowns,
            stage_options,
            predict_treatment,
            stage_label
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
