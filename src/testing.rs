//! Shared fixtures for unit tests
//!
//! In-process fakes for the remote collaborators, plus a helper that serves
//! an axum router on an ephemeral port so HTTP clients can be exercised
//! against canned responses.

use crate::error::{Error, Result};
use crate::geo::device::{DeviceLocation, Permission};
use crate::geo::{Coordinates, Geocoder, PlaceAddress};
use crate::places::{AutocompleteResponse, DetailsResponse, PlacesBackend};
use axum::Router;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::net::TcpListener;

/// Serve `app` on 127.0.0.1 and return its base URL
pub async fn serve_fixture(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Places backend answering from canned JSON
#[derive(Default)]
pub struct FakePlaces {
    autocomplete: HashMap<String, serde_json::Value>,
    details: HashMap<String, serde_json::Value>,
    delays: HashMap<String, Duration>,
    failing: bool,
    pub queries: Mutex<Vec<String>>,
    pub detail_calls: AtomicUsize,
}

impl FakePlaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_autocomplete(mut self, input: &str, body: serde_json::Value) -> Self {
        self.autocomplete.insert(input.to_string(), body);
        self
    }

    pub fn with_details(mut self, place_id: &str, body: serde_json::Value) -> Self {
        self.details.insert(place_id.to_string(), body);
        self
    }

    /// Delay the autocomplete answer for `input`
    pub fn with_delay(mut self, input: &str, delay: Duration) -> Self {
        self.delays.insert(input.to_string(), delay);
        self
    }

    /// Every call fails as a transport error would
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl PlacesBackend for FakePlaces {
    async fn autocomplete(&self, input: &str, _session: Option<&str>) -> Result<AutocompleteResponse> {
        self.queries.lock().unwrap().push(input.to_string());
        if let Some(delay) = self.delays.get(input) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing {
            return Err(Error::Places("connection refused".to_string()));
        }
        let body = self
            .autocomplete
            .get(input)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({"status": "ZERO_RESULTS", "predictions": []}));
        Ok(serde_json::from_value(body)?)
    }

    async fn details(&self, place_id: &str, _session: Option<&str>) -> Result<DetailsResponse> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(Error::Places("connection refused".to_string()));
        }
        let body = self
            .details
            .get(place_id)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({"status": "NOT_FOUND"}));
        Ok(serde_json::from_value(body)?)
    }
}

/// Geocoder answering from fixed tables
#[derive(Default)]
pub struct FakeGeocoder {
    pub forward: HashMap<String, Vec<Coordinates>>,
    pub reverse: Option<PlaceAddress>,
    pub failing: bool,
    pub forward_calls: AtomicUsize,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_forward(mut self, text: &str, matches: Vec<Coordinates>) -> Self {
        self.forward.insert(text.to_string(), matches);
        self
    }

    pub fn with_reverse(mut self, address: PlaceAddress) -> Self {
        self.reverse = Some(address);
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }
}

impl Geocoder for FakeGeocoder {
    async fn forward(&self, text: &str) -> Result<Vec<Coordinates>> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(Error::Geo("geocoder offline".to_string()));
        }
        Ok(self.forward.get(text).cloned().unwrap_or_default())
    }

    async fn reverse(&self, _coords: Coordinates) -> Result<Option<PlaceAddress>> {
        if self.failing {
            return Err(Error::Geo("geocoder offline".to_string()));
        }
        Ok(self.reverse.clone())
    }
}

/// Device with a scripted permission answer and position
pub struct FakeDevice {
    pub permission: Permission,
    pub position: Option<Coordinates>,
    pub position_calls: AtomicUsize,
}

impl FakeDevice {
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            permission: Permission::Granted,
            position: Some(Coordinates::new(lat, lng)),
            position_calls: AtomicUsize::new(0),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Permission::Denied,
            position: None,
            position_calls: AtomicUsize::new(0),
        }
    }

    pub fn without_fix() -> Self {
        Self {
            permission: Permission::Granted,
            position: None,
            position_calls: AtomicUsize::new(0),
        }
    }
}

impl DeviceLocation for FakeDevice {
    async fn request_permission(&self) -> Result<Permission> {
        Ok(self.permission)
    }

    async fn current_position(&self) -> Result<Coordinates> {
        self.position_calls.fetch_add(1, Ordering::SeqCst);
        self.position
            .ok_or_else(|| Error::Geo("no position fix".to_string()))
    }
}
