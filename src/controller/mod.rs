pub mod state;

pub use state::{reduce, AppState, Effect, Event};

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::SchoolApi;
use crate::models::{DraftError, DraftField, LocationField};

/// Form-and-list controller.
///
/// Owns the [`AppState`] and executes the reducer's effects as spawned tasks.
/// Completions come back over a channel and are applied one at a time by
/// [`Controller::process_next`], so the state has a single owner.
pub struct Controller<A> {
    api: Arc<A>,
    state: AppState,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
}

impl<A: SchoolApi + 'static> Controller<A> {
    pub fn new(api: A) -> Self {
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<A>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            state: AppState::default(),
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn update_draft_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.dispatch(Event::DraftChanged {
            field,
            value: value.into(),
        });
    }

    /// Fetches automatically once both coordinates are present
    pub fn update_location_field(&mut self, field: LocationField, value: impl Into<String>) {
        self.dispatch(Event::LocationChanged {
            field,
            value: value.into(),
        });
    }

    /// Send the draft to the backend. Incomplete drafts are rejected locally.
    pub fn submit_draft(&mut self) -> Result<(), DraftError> {
        let new_school = self.state.draft.to_new_school()?;
        self.dispatch(Event::SubmitRequested(new_school));
        Ok(())
    }

    pub fn refresh_schools(&mut self) {
        self.dispatch(Event::RefreshRequested);
    }

    /// Wait for the next request or timer completion and apply it.
    ///
    /// Cancel safe: an interrupted call loses no completion.
    pub async fn process_next(&mut self) {
        // The controller holds a sender, so the channel never closes.
        if let Some(event) = self.events_rx.recv().await {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: Event) {
        let transition = reduce(std::mem::take(&mut self.state), event);
        self.state = transition.state;
        for effect in transition.effects {
            self.run(effect);
        }
    }

    fn run(&self, effect: Effect) {
        let api = Arc::clone(&self.api);
        let events = self.events_tx.clone();

        match effect {
            Effect::FetchSchools { seq, location } => {
                debug!(
                    "Fetch #{} for ({}, {})",
                    seq, location.latitude, location.longitude
                );
                tokio::spawn(async move {
                    let event = match api.list_schools(&location).await {
                        Ok(schools) => {
                            info!("📋 Fetch #{} returned {} schools", seq, schools.len());
                            Event::SchoolsLoaded {
                                seq,
                                schools,
                                received_at: Utc::now(),
                            }
                        }
                        Err(err) => {
                            warn!("Fetch #{} failed: {:#}", seq, anyhow::Error::new(err));
                            Event::FetchFailed { seq }
                        }
                    };
                    let _ = events.send(event);
                });
            }
            Effect::AddSchool(new_school) => {
                tokio::spawn(async move {
                    let event = match api.add_school(&new_school).await {
                        Ok(school) => {
                            info!("🏫 Added school {} ({})", school.name, school.id);
                            Event::SchoolAdded(school)
                        }
                        Err(err) => {
                            warn!("Adding {:?} failed: {:#}", new_school.name, anyhow::Error::new(err));
                            Event::AddFailed
                        }
                    };
                    let _ = events.send(event);
                });
            }
            Effect::ClearStatusAfter { token, delay } => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events.send(Event::StatusExpired { token });
                });
            }
        }
    }
}
