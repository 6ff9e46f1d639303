//! Address resolution and autocomplete engine
//!
//! ```text
//! keystrokes ─► Debouncer ─► SuggestionProvider ─► SuggestionBoard
//!                                                       │ select
//!                                                       ▼
//!                                                 PlaceResolver ──┐
//! "use my location" ─► CurrentLocationResolver ───────────────────┤
//!                                                                 ▼
//!                                                       Deliver (callback | navigation)
//! ```
//!
//! An [`Engine`] owns the remote collaborators and mounts any number of
//! [`LocationInput`] fields; each field keeps its own text, timer and
//! suggestion list.

pub mod current;
pub mod debounce;
pub mod field;
pub mod notice;
pub mod record;
pub mod resolve;
pub mod sink;
pub mod suggest;

pub use current::{CurrentLocationResolver, LocateOutcome};
pub use field::LocationInput;
pub use notice::{NoticeLog, Notifier, StderrNotifier};
pub use record::LocationRecord;
pub use resolve::{PlaceResolver, Resolution, ResolutionSource};
pub use sink::{CallbackSink, Deliver, NavigationSink, Navigator, Route, RouteLog};
pub use suggest::{SuggestionBoard, SuggestionProvider};

use crate::config::Config;
use crate::config::defaults::{DEFAULT_DEBOUNCE_MS, DEFAULT_MIN_QUERY_CHARS, MIN_QUERY_CHARS_FLOOR};
use crate::geo::device::{DeviceLocation, Pinned};
use crate::geo::{Coordinates, Geocoder};
use crate::places::PlacesBackend;
use debounce::Debouncer;
use std::sync::Arc;
use std::time::Duration;

/// Tunables shared by every field of an engine
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Quiet interval before a lookup fires
    pub debounce: Duration,
    /// Shortest text that triggers a lookup
    pub min_query_chars: usize,
    /// Give each field a Places session token
    pub session_tokens: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            session_tokens: true,
        }
    }
}

impl Settings {
    /// A config file edited by hand may carry a lower minimum; it is raised
    /// to the floor.
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.input.debounce(),
            min_query_chars: config.input.min_query_chars.max(MIN_QUERY_CHARS_FLOOR),
            session_tokens: config.places.session_tokens,
        }
    }
}

/// Remote collaborators plus settings; mounts input fields
pub struct Engine<P, G, D> {
    places: Arc<P>,
    geocoder: Arc<G>,
    device: Arc<D>,
    notifier: Arc<dyn Notifier>,
    settings: Settings,
}

impl<P, G, D> Engine<P, G, D>
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    pub fn new(places: P, geocoder: G, device: D, notifier: Arc<dyn Notifier>, settings: Settings) -> Self {
        Self {
            places: Arc::new(places),
            geocoder: Arc::new(geocoder),
            device: Arc::new(device),
            notifier,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn places(&self) -> &Arc<P> {
        &self.places
    }

    pub fn suggestion_provider(&self) -> SuggestionProvider<P> {
        SuggestionProvider::new(Arc::clone(&self.places), &self.settings)
    }

    pub fn place_resolver(&self) -> PlaceResolver<P, G> {
        PlaceResolver::new(Arc::clone(&self.places), Arc::clone(&self.geocoder))
    }

    pub fn current_location(&self) -> CurrentLocationResolver<D, G> {
        CurrentLocationResolver::new(
            Arc::clone(&self.device),
            Arc::clone(&self.geocoder),
            Arc::clone(&self.notifier),
        )
    }

    /// Current-location resolver whose position fix is `at`
    pub fn current_location_at(&self, at: Coordinates) -> CurrentLocationResolver<Pinned<D>, G> {
        CurrentLocationResolver::new(
            Arc::new(Pinned::new(Arc::clone(&self.device), at)),
            Arc::clone(&self.geocoder),
            Arc::clone(&self.notifier),
        )
    }

    /// Mount an empty input field delivering to `sink`
    pub fn mount(&self, sink: Arc<dyn Deliver>) -> LocationInput<P, G, D> {
        LocationInput::new(
            Debouncer::new(self.settings.debounce),
            self.settings.session_tokens,
            self.suggestion_provider(),
            self.place_resolver(),
            self.current_location(),
            sink,
        )
    }

    /// Mount a field showing `initial` (e.g. a previously chosen address)
    pub fn mount_with_text(&self, initial: impl Into<String>, sink: Arc<dyn Deliver>) -> LocationInput<P, G, D> {
        let mut field = self.mount(sink);
        field.set_text(initial);
        field
    }
}
