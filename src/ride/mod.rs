//! Ride state and the find-ride screen
//!
//! The consumer side of the engine: a pickup ("from") and destination
//! ("to") store that fields deliver into by callback, and the find-ride
//! handoff target that rebuilds a destination from navigation parameters.

use crate::constants::nav::FIND_RIDE_PATH;
use crate::engine::{CallbackSink, Deliver, LocationRecord, Navigator, Route};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Which end of the ride a field edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Pickup, the user's location
    From,
    /// Destination
    To,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::From => write!(f, "from"),
            Endpoint::To => write!(f, "to"),
        }
    }
}

impl FromStr for Endpoint {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "from" | "user" | "pickup" => Ok(Endpoint::From),
            "to" | "destination" => Ok(Endpoint::To),
            other => Err(crate::error::Error::InvalidParams(format!(
                "unknown ride endpoint: {}",
                other
            ))),
        }
    }
}

/// Snapshot of the ride being planned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RideState {
    pub user: Option<LocationRecord>,
    pub destination: Option<LocationRecord>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Shared ride state
#[derive(Debug, Default)]
pub struct RideStore {
    state: RwLock<RideState>,
}

impl RideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RideState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, endpoint: Endpoint, record: LocationRecord) {
        info!(%endpoint, address = record.address(), "ride location set");
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match endpoint {
            Endpoint::From => state.user = Some(record),
            Endpoint::To => state.destination = Some(record),
        }
        state.updated_at = Some(Utc::now());
    }

    pub fn clear(&self) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = RideState::default();
    }

    /// Callback sink writing into `endpoint`
    pub fn sink(self: &Arc<Self>, endpoint: Endpoint) -> Arc<dyn Deliver> {
        let store = Arc::clone(self);
        Arc::new(CallbackSink::new(move |record| store.set(endpoint, record)))
    }
}

/// Navigation target for `/find-ride`
///
/// Reconstructs the record from its string parameters and makes it the
/// destination.
#[derive(Debug, Clone)]
pub struct FindRide {
    store: Arc<RideStore>,
}

impl FindRide {
    pub fn new(store: Arc<RideStore>) -> Self {
        Self { store }
    }

    /// Apply handoff parameters; incomplete parameters change nothing
    pub fn apply(&self, params: &HashMap<String, String>) -> Result<Option<LocationRecord>> {
        let record = LocationRecord::from_params(params)?;
        match &record {
            Some(record) => self.store.set(Endpoint::To, record.clone()),
            None => debug!("find-ride opened without a complete location"),
        }
        Ok(record)
    }
}

impl Navigator for FindRide {
    fn push(&self, route: Route) {
        if route.pathname != FIND_RIDE_PATH {
            warn!(pathname = %route.pathname, "no screen for route");
            return;
        }
        if let Err(e) = self.apply(&route.params_map()) {
            warn!(error = %e, url = %route.to_url(), "rejected find-ride parameters");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NavigationSink;

    fn eiffel() -> LocationRecord {
        LocationRecord::new(48.8584, 2.2945, "Eiffel Tower, Paris, France")
    }

    #[test]
    fn test_callback_sinks_fill_both_ends() {
        let store = Arc::new(RideStore::new());
        let home = LocationRecord::new(48.85, 2.35, "Hôtel de Ville Paris");

        store.sink(Endpoint::From).deliver(home.clone());
        store.sink(Endpoint::To).deliver(eiffel());

        let state = store.snapshot();
        assert_eq!(state.user, Some(home));
        assert_eq!(state.destination, Some(eiffel()));
        assert!(state.updated_at.is_some());
    }

    #[test]
    fn test_navigation_sets_destination() {
        let store = Arc::new(RideStore::new());
        let sink = NavigationSink::new(FindRide::new(Arc::clone(&store)));

        sink.deliver(eiffel());

        assert_eq!(store.snapshot().destination, Some(eiffel()));
        assert!(store.snapshot().user.is_none());
    }

    #[test]
    fn test_callback_and_navigation_store_identical_records() {
        let by_callback = Arc::new(RideStore::new());
        let by_navigation = Arc::new(RideStore::new());
        let record = LocationRecord::new(-33.856_784, 151.215_297_1, "Sydney Opera House");

        by_callback.sink(Endpoint::To).deliver(record.clone());
        NavigationSink::new(FindRide::new(Arc::clone(&by_navigation))).deliver(record);

        assert_eq!(
            by_callback.snapshot().destination,
            by_navigation.snapshot().destination
        );
    }

    #[test]
    fn test_incomplete_or_bad_params_change_nothing() {
        let store = Arc::new(RideStore::new());
        let screen = FindRide::new(Arc::clone(&store));

        let partial: HashMap<String, String> =
            [("address".to_string(), "Paris".to_string())].into_iter().collect();
        assert_eq!(screen.apply(&partial).unwrap(), None);

        screen.push(Route::new(
            FIND_RIDE_PATH,
            vec![
                ("latitude".to_string(), "NaN-ish".to_string()),
                ("longitude".to_string(), "2.29".to_string()),
                ("address".to_string(), "Paris".to_string()),
            ],
        ));
        screen.push(Route::new("/confirm-ride", eiffel().to_params()));

        assert_eq!(store.snapshot(), RideState::default());
    }

    #[test]
    fn test_endpoint_parse() {
        assert_eq!("from".parse::<Endpoint>().unwrap(), Endpoint::From);
        assert_eq!("Destination".parse::<Endpoint>().unwrap(), Endpoint::To);
        assert!("middle".parse::<Endpoint>().is_err());
        assert_eq!(Endpoint::To.to_string(), "to");
    }

    #[test]
    fn test_clear() {
        let store = Arc::new(RideStore::new());
        store.set(Endpoint::To, eiffel());
        store.clear();
        assert_eq!(store.snapshot(), RideState::default());
    }
}
