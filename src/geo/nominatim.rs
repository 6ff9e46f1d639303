//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for forward and reverse geocoding.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::config::{GeocodingConfig, HttpConfig};
use crate::error::{Error, Result};
use crate::geo::{Coordinates, Geocoder, PlaceAddress};
use serde::Deserialize;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

/// Nominatim reverse response
///
/// Unknown positions come back as `200 {"error": "Unable to geocode"}`.
#[derive(Debug, Deserialize)]
struct ReverseResult {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<ReverseAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseAddress {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

impl NominatimBackend {
    /// Create a backend from geocoding and HTTP settings
    pub fn new(geocoding: &GeocodingConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: http.client(&geocoding.user_agent)?,
            base_url: geocoding.nominatim_url.trim_end_matches('/').to_string(),
        })
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<Coordinates> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Geo(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::Geo(format!("Invalid longitude: {}", lng)))?;
        Ok(Coordinates::new(lat, lng))
    }

    fn into_address(result: ReverseResult) -> Option<PlaceAddress> {
        if result.error.is_some() {
            return None;
        }
        let address = result.address.unwrap_or_default();
        let name = result
            .name
            .filter(|n| !n.trim().is_empty())
            .or(address.house_number);

        Some(PlaceAddress {
            name,
            street: address.road,
            city: address.city.or(address.town).or(address.village),
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geo(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }
        Ok(response)
    }
}

impl Geocoder for NominatimBackend {
    async fn forward(&self, text: &str) -> Result<Vec<Coordinates>> {
        let url = format!(
            "{}/search?q={}&format=json&limit=5",
            self.base_url,
            urlencoding::encode(text)
        );
        debug!(query = text, "forward geocoding");

        let results: Vec<SearchResult> = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse Nominatim response: {}", e)))?;

        results
            .iter()
            .map(|r| Self::parse_coords(&r.lat, &r.lon))
            .collect()
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<PlaceAddress>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, coords.lat, coords.lng
        );
        debug!(lat = coords.lat, lng = coords.lng, "reverse geocoding");

        let result: ReverseResult = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse Nominatim response: {}", e)))?;

        Ok(Self::into_address(result))
    }
}
