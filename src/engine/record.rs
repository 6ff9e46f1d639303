//! The resolved-location payload

use crate::error::{Error, Result};
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameter names carried by a navigation handoff
pub const PARAM_LATITUDE: &str = "latitude";
pub const PARAM_LONGITUDE: &str = "longitude";
pub const PARAM_ADDRESS: &str = "address";

/// A resolved location
///
/// `(0.0, 0.0)` means the coordinates could not be resolved; see
/// [`ResolutionSource`](crate::engine::ResolutionSource) for the tag that
/// tells the two apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    latitude: f64,
    longitude: f64,
    address: String,
}

impl LocationRecord {
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
        }
    }

    /// A record whose coordinates are the `0.0, 0.0` sentinel
    pub fn unresolved(address: impl Into<String>) -> Self {
        Self::new(0.0, 0.0, address)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// String-typed navigation parameters
    ///
    /// Numbers use `f64`'s `Display`, the shortest text that parses back to
    /// the same value, so a round trip through [`Self::from_params`] is exact.
    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            (PARAM_LATITUDE.to_string(), self.latitude.to_string()),
            (PARAM_LONGITUDE.to_string(), self.longitude.to_string()),
            (PARAM_ADDRESS.to_string(), self.address.clone()),
        ]
    }

    /// Rebuild a record from navigation parameters
    ///
    /// Returns `Ok(None)` unless all three parameters are present and
    /// non-empty. Coordinates must be finite and in range.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Option<Self>> {
        let present = |key: &str| params.get(key).filter(|v| !v.is_empty());

        let (Some(lat), Some(lng), Some(address)) = (
            present(PARAM_LATITUDE),
            present(PARAM_LONGITUDE),
            present(PARAM_ADDRESS),
        ) else {
            return Ok(None);
        };

        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| Error::InvalidParams(format!("latitude is not a number: {}", lat)))?;
        let longitude: f64 = lng
            .trim()
            .parse()
            .map_err(|_| Error::InvalidParams(format!("longitude is not a number: {}", lng)))?;

        let record = Self::new(latitude, longitude, address.clone());
        record
            .coordinates()
            .validate()
            .map_err(|e| Error::InvalidParams(e.to_string()))?;
        Ok(Some(record))
    }
}
