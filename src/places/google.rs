//! Google Places HTTP backend
//!
//! Autocomplete: `GET {autocomplete_url}?input=..&key=..&language=..`
//! Details: `GET {details_url}?place_id=..&key=..&fields=geometry`
//!
//! Both accept an optional `sessiontoken` that groups a run of keystrokes
//! and the final details call into one billing session.

use crate::config::{HttpConfig, PlacesConfig};
use crate::error::{Error, Result};
use crate::places::{AutocompleteResponse, DetailsResponse, PlacesBackend};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Google Places backend
#[derive(Debug, Clone)]
pub struct GooglePlaces {
    client: reqwest::Client,
    config: PlacesConfig,
}

impl GooglePlaces {
    /// Create a backend from Places and HTTP settings
    pub fn new(config: PlacesConfig, http: &HttpConfig) -> Result<Self> {
        let client = http.client(concat!("veloce/", env!("CARGO_PKG_VERSION")))?;
        Ok(Self { client, config })
    }

    /// Whether an API key was configured
    pub fn has_api_key(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn autocomplete_url(&self, input: &str, session: Option<&str>) -> String {
        let mut url = format!(
            "{}?input={}&key={}&language={}",
            self.config.autocomplete_url,
            urlencoding::encode(input),
            urlencoding::encode(&self.config.api_key),
            urlencoding::encode(&self.config.language),
        );
        self.append_session(&mut url, session);
        url
    }

    fn details_url(&self, place_id: &str, session: Option<&str>) -> String {
        let mut url = format!(
            "{}?place_id={}&key={}&fields=geometry",
            self.config.details_url,
            urlencoding::encode(place_id),
            urlencoding::encode(&self.config.api_key),
        );
        self.append_session(&mut url, session);
        url
    }

    fn append_session(&self, url: &mut String, session: Option<&str>) {
        if let (true, Some(token)) = (self.config.session_tokens, session) {
            url.push_str("&sessiontoken=");
            url.push_str(&urlencoding::encode(token));
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Places(format!("Places request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Places(format!(
                "Places API returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Places(format!("Failed to parse Places response: {}", e)))
    }
}

impl PlacesBackend for GooglePlaces {
    async fn autocomplete(&self, input: &str, session: Option<&str>) -> Result<AutocompleteResponse> {
        debug!(input, "places autocomplete");
        let response: AutocompleteResponse =
            self.get_json(&self.autocomplete_url(input, session)).await?;
        debug!(status = %response.status, count = response.predictions.len(), "autocomplete answered");
        Ok(response)
    }

    async fn details(&self, place_id: &str, session: Option<&str>) -> Result<DetailsResponse> {
        debug!(place_id, "places details");
        let response: DetailsResponse = self.get_json(&self.details_url(place_id, session)).await?;
        debug!(status = %response.status, "details answered");
        Ok(response)
    }
}
