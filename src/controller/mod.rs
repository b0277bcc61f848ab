//! Drives the prediction form: page-load population and predict submissions.
//!
//! The controller owns the display state. Every predict click gets a new
//! generation and cancels whatever submission was still in flight, and a
//! response only reaches the result area if its generation is still the
//! latest. The result therefore always belongs to the most recently issued
//! submission, whatever order the responses arrive in.

pub mod cancel;


pub use cancel::CancellationToken;

use crate::api::{OptionCategory, PredictionBackend};
use crate::error::{ClientError, ClientResult};
use crate::form::{stage_label, FormSnapshot};
use crate::render::{render_option_list, render_outcome, DropdownsView, ResultView, SelectView};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[derive(Default)]
struct DisplayState {
    result: ResultView,
    in_flight: Option<(u64, CancellationToken)>,
}

pub struct FormController {
    backend: Arc<dyn PredictionBackend>,
    display: Mutex<DisplayState>,
    generation: AtomicU64,
}

impl FormController {
    pub fn new(backend: Arc<dyn PredictionBackend>) -> Self {
        Self {
            backend,
            display: Mutex::new(DisplayState::default()),
            generation: AtomicU64::new(0),
        }
    }

    fn display(&self) -> MutexGuard<'_, DisplayState> {
        // A poisoned lock only means a render panicked; the state itself is plain data.
        self.display.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// What the result area currently shows.
    pub fn current_result(&self) -> ResultView {
        self.display().result.clone()
    }

    /// Number of submissions issued so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Handles a predict click.
    ///
    /// Returns the view that was applied to the result area, or `None` when a
    /// newer submission superseded this one before its response arrived.
    #[instrument(skip(self, form), fields(request_id = %Uuid::new_v4()))]
    pub async fn submit(&self, form: &FormSnapshot) -> Option<ResultView> {
        let (generation, token) = self.begin_submission();

        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                info!(generation, field = %e.field(), "Prediction form incomplete");
                return self.apply(generation, ResultView::ValidationError);
            }
        };

        info!(
            generation,
            stage = %stage_label(request.ajcc_pathologic_stage),
            "Submitting prediction request"
        );

        let outcome: ClientResult<String> = tokio::select! {
            _ = token.cancelled() => Err(ClientError::Cancelled),
            outcome = self.backend.predict(&request) => outcome,
        };

        match &outcome {
            Err(e) if e.is_cancelled() => {
                debug!(generation, "Prediction request superseded");
                return None;
            }
            Err(e) => warn!(generation, error = %e, "Prediction request failed"),
            Ok(prediction) => info!(generation, prediction = %prediction, "Prediction received"),
        }

        self.apply(generation, render_outcome(&outcome))
    }

    /// Issues the next generation and cancels the submission it supersedes.
    fn begin_submission(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut display = self.display();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((previous, stale)) = display.in_flight.replace((generation, token.clone())) {
            debug!(previous, generation, "Cancelling superseded prediction request");
            stale.cancel();
        }
        (generation, token)
    }

    /// Writes `view` to the result area if `generation` is still the latest.
    fn apply(&self, generation: u64, view: ResultView) -> Option<ResultView> {
        let mut display = self.display();
        if matches!(display.in_flight, Some((current, _)) if current == generation) {
            display.in_flight = None;
        }
        if generation != self.generation.load(Ordering::SeqCst) {
            debug!(generation, "Discarding stale prediction response");
            return None;
        }
        display.result = view.clone();
        Some(view)
    }

    /// Page-load population of the three select controls.
    ///
    /// The lists are fetched concurrently and fresh on every call, and nothing
    /// is kept once the view is returned. A list that
    /// fails to load is shown in its degraded form instead of being left empty.
    #[instrument(skip(self))]
    pub async fn load_dropdowns(&self) -> DropdownsView {
        info!("Loading dropdown options");

        let (cancer, diagnosis, treatment) = futures::future::join3(
            self.load_options(OptionCategory::CancerCategories),
            self.load_options(OptionCategory::DiagnosisMethods),
            self.load_options(OptionCategory::TreatmentCategories),
        )
        .await;

        DropdownsView {
            cancer_categories: cancer,
            diagnosis_methods: diagnosis,
            treatment_categories: treatment,
        }
    }

    async fn load_options(&self, category: OptionCategory) -> SelectView {
        let outcome = self.backend.option_list(category).await;
        match &outcome {
            Ok(items) => debug!(%category, count = items.len(), "Options loaded"),
            Err(e) => warn!(%category, error = %e, "Failed to load options"),
        }
        render_option_list(category, &outcome)
    }

    /// Asks the service for a stage label, falling back to the local table.
    pub async fn stage_label(&self, stage: i32) -> String {
        match self.backend.stage_label(stage).await {
            Ok(label) => label,
            Err(e) => {
                debug!(stage, error = %e, "Stage label lookup failed, using local table");
                stage_label(stage).to_string()
            }
        }
    }
}
