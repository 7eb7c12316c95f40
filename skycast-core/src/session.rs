//! Drives the view state from user intents.
//!
//! Every trigger goes through the same path: take a ticket from the state (refused while
//! loading), resolve a query, fetch, then hand the result back with the ticket.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    error::WeatherError,
    input::{self, FixedGeolocator, Geolocator, SpeechRecognizer, Trigger},
    model::{Forecast, Query, Theme, Unit},
    navigator::Direction,
    provider::ForecastProvider,
    state::{Completion, FetchTicket, ViewState},
};

/// What a trigger ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Another attempt was already in flight; nothing happened.
    Ignored,
    /// The trigger failed before anything was fetched; the state did not change.
    Rejected(WeatherError),
    Loaded,
    Failed(WeatherError),
    /// The session was reset while this attempt was running.
    Discarded,
}

impl Outcome {
    /// Notice to show the user, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            Outcome::Rejected(err) | Outcome::Failed(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<Mutex<ViewState>>,
    provider: Arc<dyn ForecastProvider>,
    geolocator: Arc<dyn Geolocator>,
    speech: Option<Arc<dyn SpeechRecognizer>>,
}

impl Session {
    pub fn new(provider: Arc<dyn ForecastProvider>, initial: ViewState) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
            provider,
            geolocator: Arc::new(FixedGeolocator::default()),
            speech: None,
        }
    }

    pub fn with_geolocator(mut self, geolocator: Arc<dyn Geolocator>) -> Self {
        self.geolocator = geolocator;
        self
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechRecognizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> ViewState {
        self.state.lock().clone()
    }

    pub fn set_query_text(&self, text: impl Into<String>) {
        self.state.lock().set_query_text(text);
    }

    /// Submit whatever is in the input.
    pub async fn submit(&self) -> Outcome {
        let begun = self.state.lock().begin_submit();
        self.run_submit(begun).await
    }

    /// Replace the input and submit it in one step.
    pub async fn submit_text(&self, text: &str) -> Outcome {
        let begun = {
            let mut state = self.state.lock();
            state.set_query_text(text);
            state.begin_submit()
        };
        self.run_submit(begun).await
    }

    /// Look up the forecast for the device position.
    pub async fn locate(&self) -> Outcome {
        let Some(ticket) = self.state.lock().begin() else {
            tracing::debug!("geolocation ignored, a lookup is already running");
            return Outcome::Ignored;
        };

        match input::resolve_position(self.geolocator.as_ref()).await {
            Ok(query) => {
                if !self.state.lock().bind_query(ticket, query.clone()) {
                    return Outcome::Discarded;
                }
                self.fetch(ticket, query, Trigger::Geolocation).await
            }
            Err(err) => self.conclude(ticket, Err(err), Trigger::Geolocation),
        }
    }

    /// Listen for a spoken location, put it in the input and submit it.
    pub async fn listen(&self) -> Outcome {
        let ticket = {
            let mut state = self.state.lock();
            if state.is_loading() {
                tracing::debug!("voice input ignored, a lookup is already running");
                return Outcome::Ignored;
            }
            if self.speech.is_none() {
                return Outcome::Rejected(WeatherError::UnsupportedCapability("Voice input"));
            }
            match state.begin() {
                Some(ticket) => ticket,
                None => return Outcome::Ignored,
            }
        };

        let transcript = input::capture_transcript(self.speech.as_deref()).await;
        let query = transcript.and_then(|t| self.state.lock().commit_transcript(ticket, &t));

        match query {
            Ok(query) => self.fetch(ticket, query, Trigger::Voice).await,
            Err(err) => self.conclude(ticket, Err(err), Trigger::Voice),
        }
    }

    pub fn select_day(&self, index: usize) -> bool {
        self.state.lock().select_day(index)
    }

    pub fn step(&self, direction: Direction) -> bool {
        self.state.lock().step(direction)
    }

    pub fn set_unit(&self, unit: Unit) {
        self.state.lock().set_unit(unit);
    }

    pub fn toggle_unit(&self) -> Unit {
        self.state.lock().toggle_unit()
    }

    pub fn toggle_theme(&self) -> Theme {
        self.state.lock().toggle_theme()
    }

    /// Start over. A response still in flight is dropped when it arrives.
    pub fn reset(&self) {
        self.state.lock().reset();
    }

    async fn run_submit(
        &self,
        begun: Result<Option<(FetchTicket, Query)>, WeatherError>,
    ) -> Outcome {
        match begun {
            Ok(Some((ticket, query))) => self.fetch(ticket, query, Trigger::Text).await,
            Ok(None) => {
                tracing::debug!("submit ignored, a lookup is already running");
                Outcome::Ignored
            }
            Err(err) => {
                tracing::debug!(error = %err, "submit rejected");
                Outcome::Rejected(err)
            }
        }
    }

    async fn fetch(&self, ticket: FetchTicket, query: Query, trigger: Trigger) -> Outcome {
        if !self.state.lock().is_current(ticket) {
            return Outcome::Discarded;
        }
        tracing::debug!(%query, ?trigger, "fetching forecast");
        let result = self.provider.fetch_forecast(&query).await;
        self.conclude(ticket, result, trigger)
    }

    fn conclude(
        &self,
        ticket: FetchTicket,
        result: Result<Forecast, WeatherError>,
        trigger: Trigger,
    ) -> Outcome {
        let location = result.as_ref().ok().map(|f| f.location.name.clone());
        let completion = self.state.lock().complete(ticket, result);

        match completion {
            Completion::Applied => {
                tracing::info!(
                    location = location.as_deref().unwrap_or(""),
                    ?trigger,
                    "forecast loaded"
                );
                Outcome::Loaded
            }
            Completion::Failed(err) => {
                tracing::warn!(error = %err, kind = ?err.kind(), ?trigger, "lookup failed");
                Outcome::Failed(err)
            }
            Completion::Stale => Outcome::Discarded,
        }
    }
}
