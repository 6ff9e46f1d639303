//! One address input field
//!
//! Owns the field's query state: the visible text, the debounce timer, the
//! suggestion list and the Places session token. Selecting a candidate or
//! using the current location resolves a record and hands it to the
//! field's sink.

use crate::engine::current::{CurrentLocationResolver, LocateOutcome};
use crate::engine::debounce::Debouncer;
use crate::engine::resolve::{PlaceResolver, Resolution};
use crate::engine::sink::Deliver;
use crate::engine::suggest::{SuggestionBoard, SuggestionProvider};
use crate::geo::device::DeviceLocation;
use crate::geo::Geocoder;
use crate::places::{Candidate, PlacesBackend};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct LocationInput<P, G, D> {
    text: String,
    debounce: Debouncer,
    suggestions: Arc<SuggestionBoard>,
    session: Option<String>,
    provider: SuggestionProvider<P>,
    resolver: PlaceResolver<P, G>,
    locator: CurrentLocationResolver<D, G>,
    sink: Arc<dyn Deliver>,
}

impl<P, G, D> LocationInput<P, G, D>
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    pub(crate) fn new(
        debounce: Debouncer,
        session_tokens: bool,
        provider: SuggestionProvider<P>,
        resolver: PlaceResolver<P, G>,
        locator: CurrentLocationResolver<D, G>,
        sink: Arc<dyn Deliver>,
    ) -> Self {
        Self {
            text: String::new(),
            debounce,
            suggestions: Arc::new(SuggestionBoard::new()),
            session: session_tokens.then(new_session),
            provider,
            resolver,
            locator,
            sink,
        }
    }

    /// Visible query text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current suggestion list
    pub fn suggestions(&self) -> Vec<Candidate> {
        self.suggestions.snapshot()
    }

    /// Receiver that wakes whenever the suggestion list changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<Candidate>> {
        self.suggestions.subscribe()
    }

    pub fn is_lookup_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Places session token shared by this field's requests
    pub fn session_token(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Replace the visible text without looking anything up
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Keystroke handler
    ///
    /// Updates the text at once and schedules a lookup after the quiet
    /// interval, replacing any pending one. Text below the minimum length
    /// cancels the pending lookup and empties the list instead.
    pub fn on_text_changed(&mut self, text: impl Into<String>) {
        self.text = text.into();

        if !self.provider.accepts(&self.text) {
            self.debounce.cancel();
            self.suggestions.clear();
            return;
        }

        let text = self.text.clone();
        let provider = self.provider.clone();
        let board = Arc::clone(&self.suggestions);
        let session = self.session.clone();

        self.debounce.schedule(async move {
            let ticket = board.issue();
            let candidates = provider.fetch_suggestions(&text, session.as_deref()).await;
            if !board.publish(ticket, candidates) {
                debug!(query = %text, "dropped stale suggestions");
            }
        });
    }

    /// Resolve a selected candidate and deliver it
    ///
    /// A candidate with a blank description has no address to deliver; it
    /// is ignored and the field is left as it was.
    pub async fn select(&mut self, candidate: &Candidate) -> Option<Resolution> {
        if candidate.description.trim().is_empty() {
            warn!(place_id = %candidate.place_id, "ignoring selection without a description");
            return None;
        }
        self.debounce.cancel();

        let resolution = self
            .resolver
            .resolve(candidate, self.session.as_deref())
            .await;
        self.sink.deliver(resolution.record.clone());
        self.commit(candidate.description.clone());

        // A details call closes the Places session.
        if self.session.is_some() {
            self.session = Some(new_session());
        }
        Some(resolution)
    }

    /// Resolve the device position and deliver it
    pub async fn use_current_location(&mut self) -> LocateOutcome {
        let outcome = self.locator.locate().await;
        if let LocateOutcome::Located(record) = &outcome {
            self.sink.deliver(record.clone());
            self.commit(record.address().to_string());
        }
        outcome
    }

    fn commit(&mut self, text: String) {
        self.debounce.cancel();
        self.text = text;
        self.suggestions.clear();
    }
}

fn new_session() -> String {
    Uuid::new_v4().to_string()
}
