//! Server shared state
//!
//! Holds the engine, the ride store it delivers into, and the notices it
//! raised for the API to report.

use crate::config::Config;
use crate::engine::{Deliver, Engine, NavigationSink, NoticeLog, Notifier, Settings};
use crate::error::Result;
use crate::geo::device::{ConfiguredDevice, DeviceLocation};
use crate::geo::nominatim::NominatimBackend;
use crate::geo::Geocoder;
use crate::places::google::GooglePlaces;
use crate::places::PlacesBackend;
use crate::ride::{Endpoint, FindRide, RideStore};
use std::sync::Arc;
use std::time::Instant;

/// State backed by Google Places, Nominatim and the configured device
pub type LiveState = AppState<GooglePlaces, NominatimBackend, ConfiguredDevice>;

/// Shared state for the HTTP server
pub struct AppState<P, G, D> {
    pub engine: Engine<P, G, D>,
    pub ride: Arc<RideStore>,
    pub notices: Arc<NoticeLog>,
    places_configured: bool,
    started: Instant,
}

impl<P, G, D> AppState<P, G, D>
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    /// Wrap collaborators; notices go to a log the handlers drain
    pub fn new(places: P, geocoder: G, device: D, settings: Settings, places_configured: bool) -> Self {
        let notices = Arc::new(NoticeLog::new());
        let engine = Engine::new(
            places,
            geocoder,
            device,
            Arc::clone(&notices) as Arc<dyn Notifier>,
            settings,
        );
        Self {
            engine,
            ride: Arc::new(RideStore::new()),
            notices,
            places_configured,
            started: Instant::now(),
        }
    }

    pub fn places_configured(&self) -> bool {
        self.places_configured
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Sink for a request: a ride endpoint by callback, or the find-ride
    /// handoff when no endpoint was named
    pub fn sink_for(&self, field: Option<Endpoint>) -> Arc<dyn Deliver> {
        match field {
            Some(endpoint) => self.ride.sink(endpoint),
            None => Arc::new(self.find_ride_sink()),
        }
    }

    pub fn find_ride_sink(&self) -> NavigationSink<FindRide> {
        NavigationSink::new(FindRide::new(Arc::clone(&self.ride)))
    }
}

impl LiveState {
    /// Build the live collaborators from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let places = GooglePlaces::new(config.places.clone(), &config.http)?;
        let configured = places.has_api_key();
        let geocoder = NominatimBackend::new(&config.geocoding, &config.http)?;
        let device = ConfiguredDevice::from_config(
            &config.location,
            config.http.client(&config.geocoding.user_agent)?,
        )?;
        Ok(Self::new(
            places,
            geocoder,
            device,
            Settings::from_config(config),
            configured,
        ))
    }
}
