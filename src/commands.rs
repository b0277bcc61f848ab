use crate::controller::FormController;
use crate::form::{standard_stage_options, FormSnapshot, StageOption};
use crate::render::UiPatch;
use std::sync::Arc;
use tauri::command;

// Global state only holds the controller; display state lives inside it.
pub struct AppState {
    pub controller: Arc<FormController>,
}

/* ---------- 1.  PAGE LOAD ---------- */

#[command]
pub async fn load_dropdowns(state: tauri::State<'_, AppState>) -> Result<Vec<UiPatch>, String> {
    let view = state.controller.load_dropdowns().await;
    Ok(view.patches())
}

#[command]
pub fn stage_options() -> Vec<StageOption> {
    standard_stage_options()
}

/* ---------- 2.  PREDICT ---------- */

/// `None` tells the page a newer click already owns the result area.
#[command]
pub async fn predict_treatment(
    form: FormSnapshot,
    state: tauri::State<'_, AppState>,
) -> Result<Option<UiPatch>, String> {
    let controller = state.controller.clone();
    let view = controller.submit(&form).await;
    Ok(view.map(|view| view.patch()))
}

#[command]
pub async fn stage_label(stage: i32, state: tauri::State<'_, AppState>) -> Result<String, String> {
    Ok(state.controller.stage_label(stage).await)
}
