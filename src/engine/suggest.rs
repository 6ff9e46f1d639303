//! Suggestion provider and the per-field suggestion list

use crate::config::defaults::MIN_QUERY_CHARS_FLOOR;
use crate::engine::Settings;
use crate::places::{Candidate, PlacesBackend};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Turns query text into ranked candidates
///
/// Never fails: short text, non-`OK` statuses and transport errors all
/// come back as an empty list.
pub struct SuggestionProvider<P> {
    places: Arc<P>,
    min_query_chars: usize,
}

impl<P> Clone for SuggestionProvider<P> {
    fn clone(&self) -> Self {
        Self {
            places: Arc::clone(&self.places),
            min_query_chars: self.min_query_chars,
        }
    }
}

impl<P: PlacesBackend> SuggestionProvider<P> {
    pub fn new(places: Arc<P>, settings: &Settings) -> Self {
        Self {
            places,
            min_query_chars: settings.min_query_chars.max(MIN_QUERY_CHARS_FLOOR),
        }
    }

    /// Whether `text` is long enough to be worth a lookup
    pub fn accepts(&self, text: &str) -> bool {
        text.chars().count() >= self.min_query_chars
    }

    pub async fn fetch_suggestions(&self, text: &str, session: Option<&str>) -> Vec<Candidate> {
        if !self.accepts(text) {
            return Vec::new();
        }

        match self.places.autocomplete(text, session).await {
            Ok(response) => {
                if response.status != crate::constants::api::STATUS_OK {
                    debug!(
                        query = text,
                        status = %response.status,
                        error = response.error_message.as_deref().unwrap_or(""),
                        "autocomplete returned no usable predictions"
                    );
                }
                response.into_candidates()
            }
            Err(e) => {
                warn!(query = text, error = %e, "autocomplete lookup failed");
                Vec::new()
            }
        }
    }
}

/// The visible suggestion list of one field
///
/// Every lookup takes a ticket from [`Self::issue`] when it fires and may
/// only publish while that ticket is still the newest. Clearing also takes
/// a ticket, so a late answer cannot repopulate a cleared list.
#[derive(Debug)]
pub struct SuggestionBoard {
    latest: AtomicU64,
    list: watch::Sender<Vec<Candidate>>,
}

impl Default for SuggestionBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionBoard {
    pub fn new() -> Self {
        let (list, _) = watch::channel(Vec::new());
        Self {
            latest: AtomicU64::new(0),
            list,
        }
    }

    /// Take the next request ticket
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the list if `ticket` is still the newest; returns whether it was
    pub fn publish(&self, ticket: u64, candidates: Vec<Candidate>) -> bool {
        let mut applied = false;
        self.list.send_if_modified(|list| {
            if self.latest.load(Ordering::SeqCst) != ticket {
                return false;
            }
            applied = true;
            if *list == candidates {
                return false;
            }
            *list = candidates;
            true
        });
        applied
    }

    /// Empty the list and invalidate every outstanding lookup
    pub fn clear(&self) {
        self.issue();
        self.list.send_if_modified(|list| {
            let changed = !list.is_empty();
            list.clear();
            changed
        });
    }

    pub fn snapshot(&self) -> Vec<Candidate> {
        self.list.borrow().clone()
    }

    /// Receiver that wakes whenever the list changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<Candidate>> {
        self.list.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePlaces;
    use serde_json::json;

    fn provider(places: FakePlaces) -> (SuggestionProvider<FakePlaces>, Arc<FakePlaces>) {
        let places = Arc::new(places);
        (
            SuggestionProvider::new(Arc::clone(&places), &Settings::default()),
            places,
        )
    }

    fn eiffel() -> serde_json::Value {
        json!({
            "status": "OK",
            "predictions": [
                {"description": "Eiffel Tower, Paris, France", "place_id": "p1"},
                {"description": "Eiffel Tower Restaurant, Las Vegas, NV, USA", "place_id": "p2"}
            ]
        })
    }

    #[tokio::test]
    async fn test_ok_response_keeps_remote_order() {
        let (provider, _) = provider(FakePlaces::new().with_autocomplete("Eiffel", eiffel()));

        let candidates = provider.fetch_suggestions("Eiffel", None).await;
        let ids: Vec<_> = candidates.iter().map(|c| c.place_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_short_text_makes_no_call() {
        let (provider, places) = provider(FakePlaces::new());

        assert!(provider.fetch_suggestions("", None).await.is_empty());
        assert!(provider.fetch_suggestions("E", None).await.is_empty());
        assert!(provider.fetch_suggestions("É", None).await.is_empty());
        assert!(places.queries().is_empty());
    }

    #[tokio::test]
    async fn test_zero_minimum_still_skips_short_text() {
        let places = Arc::new(FakePlaces::new());
        let settings = Settings {
            min_query_chars: 0,
            ..Settings::default()
        };
        let provider = SuggestionProvider::new(Arc::clone(&places), &settings);

        assert!(!provider.accepts(""));
        assert!(provider.fetch_suggestions("E", None).await.is_empty());
        assert!(places.queries().is_empty());
    }

    #[tokio::test]
    async fn test_non_ok_status_is_empty() {
        let (provider, _) = provider(FakePlaces::new().with_autocomplete(
            "zzzz",
            json!({"status": "ZERO_RESULTS", "predictions": []}),
        ));
        assert!(provider.fetch_suggestions("zzzz", None).await.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_empty() {
        let (provider, places) = provider(FakePlaces::failing());
        assert!(provider.fetch_suggestions("Eiffel", None).await.is_empty());
        assert_eq!(places.queries(), vec!["Eiffel"]);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let board = SuggestionBoard::new();
        let slow = board.issue();
        let fast = board.issue();

        assert!(board.publish(fast, vec![Candidate::new("Eiffel Tower", "p1")]));
        assert!(!board.publish(slow, vec![Candidate::new("Ei", "stale")]));
        assert_eq!(board.snapshot(), vec![Candidate::new("Eiffel Tower", "p1")]);
    }

    #[test]
    fn test_clear_invalidates_outstanding_tickets() {
        let board = SuggestionBoard::new();
        let ticket = board.issue();
        board.clear();

        assert!(!board.publish(ticket, vec![Candidate::new("late", "x")]));
        assert!(board.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let board = SuggestionBoard::new();
        let mut rx = board.subscribe();

        let ticket = board.issue();
        board.publish(ticket, vec![Candidate::new("Eiffel Tower", "p1")]);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
