//! The view state record and the transitions allowed on it.
//!
//! ```text
//! Idle | Success | Failed --begin--> Loading
//! Loading --complete(Ok)--> Success   forecast replaced, day index reset to 0
//! Loading --complete(Err)--> Failed   forecast left as it was
//! ```
//!
//! At most one attempt is in flight: `begin` refuses while loading. Each attempt carries a
//! [`FetchTicket`]; tickets issued before a [`ViewState::reset`] no longer match and their
//! results are dropped.

use crate::{
    error::WeatherError,
    model::{Forecast, ForecastDay, Query, Theme, Unit},
    navigator::{DayNavigator, Direction},
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// `query` is `None` while a geolocation or voice trigger is still resolving.
    Loading { query: Option<Query> },
    Success,
    Failed { notice: String },
}

/// Proof that the holder started the current attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket {
    generation: u64,
}

/// How a completed attempt was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Applied,
    Failed(WeatherError),
    /// The ticket predates a reset; nothing changed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    query_text: String,
    phase: Phase,
    forecast: Option<Forecast>,
    unit: Unit,
    theme: Theme,
    days: DayNavigator,
    generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Unit::default(), Theme::default())
    }
}

impl ViewState {
    pub fn new(unit: Unit, theme: Theme) -> Self {
        Self {
            query_text: String::new(),
            phase: Phase::Idle,
            forecast: None,
            unit,
            theme,
            days: DayNavigator::default(),
            generation: 0,
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    /// Query bound to the in-flight request, if one is bound yet.
    pub fn in_flight_query(&self) -> Option<&Query> {
        match &self.phase {
            Phase::Loading { query } => query.as_ref(),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { notice } => Some(notice),
            _ => None,
        }
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        self.forecast.as_ref()
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn selected_index(&self) -> usize {
        self.days.selected()
    }

    pub fn selected_day(&self) -> Option<&ForecastDay> {
        self.forecast.as_ref()?.days.get(self.days.selected())
    }

    pub fn can_step(&self, direction: Direction) -> bool {
        self.days.can_step(direction)
    }

    /// Editing the input is always allowed; it never touches the in-flight query.
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.query_text = text.into();
    }

    /// Enter `Loading` with no query bound yet. `None` if an attempt is already running.
    pub fn begin(&mut self) -> Option<FetchTicket> {
        if self.is_loading() {
            return None;
        }
        self.phase = Phase::Loading { query: None };
        tracing::debug!(generation = self.generation, "entering loading state");
        Some(FetchTicket { generation: self.generation })
    }

    /// Start an attempt from the current input text.
    ///
    /// `Ok(None)` while another attempt is running. A blank input is rejected with
    /// `EmptyQuery` and leaves the state exactly as it was.
    pub fn begin_submit(&mut self) -> Result<Option<(FetchTicket, Query)>, WeatherError> {
        if self.is_loading() {
            return Ok(None);
        }
        let query = Query::parse(&self.query_text)?;
        let Some(ticket) = self.begin() else {
            return Ok(None);
        };
        self.bind_query(ticket, query.clone());
        Ok(Some((ticket, query)))
    }

    /// Attach the resolved query to the running attempt. Ignored for stale tickets.
    pub fn bind_query(&mut self, ticket: FetchTicket, query: Query) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.phase = Phase::Loading { query: Some(query) };
        true
    }

    /// Put a voice transcript into the input and bind it to the running attempt in one step.
    pub fn commit_transcript(
        &mut self,
        ticket: FetchTicket,
        transcript: &str,
    ) -> Result<Query, WeatherError> {
        if self.is_current(ticket) {
            self.query_text = transcript.to_string();
        }
        let query = Query::parse(transcript)?;
        self.bind_query(ticket, query.clone());
        Ok(query)
    }

    /// Finish the attempt. Loading is always cleared for a current ticket.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Forecast, WeatherError>,
    ) -> Completion {
        if !self.is_current(ticket) {
            tracing::warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding result of an attempt from before the last reset"
            );
            return Completion::Stale;
        }

        match result {
            Ok(forecast) => {
                self.days = DayNavigator::new(forecast.days.len());
                self.forecast = Some(forecast);
                self.phase = Phase::Success;
                Completion::Applied
            }
            Err(err) => {
                self.phase = Phase::Failed { notice: err.to_string() };
                Completion::Failed(err)
            }
        }
    }

    /// Back to a fresh `Idle` state. Display preferences survive; in-flight tickets go stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.query_text.clear();
        self.phase = Phase::Idle;
        self.forecast = None;
        self.days = DayNavigator::default();
    }

    pub fn select_day(&mut self, index: usize) -> bool {
        self.days.select(index)
    }

    pub fn step(&mut self, direction: Direction) -> bool {
        self.days.step(direction)
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    pub fn toggle_unit(&mut self) -> Unit {
        self.unit = self.unit.toggled();
        self.unit
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Whether `ticket` still belongs to the running attempt.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation && self.is_loading()
    }
}
