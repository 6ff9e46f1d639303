//! Geocoding and device location
//!
//! Forward/reverse geocoding (coordinates <-> text) and the device position
//! sources the current-location flow reads from.

pub mod device;
pub mod ip_location;
pub mod nominatim;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::str::FromStr;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Parses `"lat,lng"`, e.g. `"48.8584, 2.2945"`
impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| Error::InvalidCoordinates(format!("Expected \"lat,lng\": {}", s)))?;

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCoordinates(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCoordinates(format!("Invalid longitude: {}", lng)))?;

        let coords = Self::new(lat, lng);
        coords.validate()?;
        Ok(coords)
    }
}

/// Address components returned by reverse geocoding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceAddress {
    /// Name of the place (building, venue, house number)
    pub name: Option<String>,
    /// Street
    pub street: Option<String>,
    /// City
    pub city: Option<String>,
}

impl PlaceAddress {
    /// Join the present components with single spaces
    ///
    /// Missing or blank components are skipped, never replaced by a
    /// placeholder. Returns an empty string when nothing is present.
    pub fn formatted(&self) -> String {
        [&self.name, &self.street, &self.city]
            .into_iter()
            .flatten()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Trait for geocoding backends
pub trait Geocoder: Send + Sync {
    /// Resolve free text to coordinates, best match first
    fn forward(&self, text: &str) -> impl Future<Output = Result<Vec<Coordinates>>> + Send;

    /// Resolve coordinates to address components
    ///
    /// Returns `None` when nothing is known at that position
    fn reverse(
        &self,
        coords: Coordinates,
    ) -> impl Future<Output = Result<Option<PlaceAddress>>> + Send;
}
