//! IP-based geolocation
//!
//! Position source for hosts without a GPS receiver. Uses ip-api.com with
//! file-based caching.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_LOCATION_CACHE_FILE, IP_LOCATION_TTL_SECS};
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::debug;

/// IP location service with caching
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    url: String,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Cached position
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedPosition {
    position: Coordinates,
    timestamp: u64,
}

impl IpLocator {
    /// Create an IP locator with the default cache path
    pub fn new(client: reqwest::Client) -> Self {
        let cache_path = dirs::cache_dir()
            .map(|p| p.join(crate::config::defaults::APP_DIR_NAME).join(IP_LOCATION_CACHE_FILE));

        Self {
            client,
            url: IP_API_URL.to_string(),
            cache_path,
        }
    }

    /// Use a specific cache file
    pub fn with_cache_path(mut self, cache_path: PathBuf) -> Self {
        self.cache_path = Some(cache_path);
        self
    }

    /// Disable caching
    pub fn without_cache(mut self) -> Self {
        self.cache_path = None;
        self
    }

    /// Query a different lookup endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Get the current position based on the public IP address
    pub async fn locate(&self) -> Result<Coordinates> {
        if let Some(cached) = self.load_cache() {
            debug!("using cached IP position");
            return Ok(cached);
        }

        let position = self.fetch_position().await?;
        self.save_cache(&position);
        Ok(position)
    }

    async fn fetch_position(&self) -> Result<Coordinates> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geo(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse IP location response: {}", e)))?;

        if data.status != "success" {
            return Err(Error::Geo("IP location lookup failed".to_string()));
        }

        let lat = data
            .lat
            .ok_or_else(|| Error::Geo("No latitude in response".to_string()))?;
        let lng = data
            .lon
            .ok_or_else(|| Error::Geo("No longitude in response".to_string()))?;

        Ok(Coordinates::new(lat, lng))
    }

    fn load_cache(&self) -> Option<Coordinates> {
        let cache_path = self.cache_path.as_ref()?;
        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedPosition = serde_json::from_str(&content).ok()?;

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();

        (now.saturating_sub(cached.timestamp) < IP_LOCATION_TTL_SECS).then_some(cached.position)
    }

    fn save_cache(&self, position: &Coordinates) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let cached = CachedPosition {
            position: *position,
            timestamp,
        };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            let _ = fs::write(cache_path, content);
        }
    }
}
