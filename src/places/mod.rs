//! Places API: autocomplete and place details
//!
//! Wire types for the two Places endpoints and the backend trait the engine
//! talks to. Status policy lives on the response types so every backend
//! applies it the same way.

pub mod google;

use crate::constants::api::STATUS_OK;
use crate::error::Result;
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A place suggestion for partial text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Display text, e.g. "Eiffel Tower, Paris, France"
    pub description: String,
    /// Opaque place identifier for the details lookup
    pub place_id: String,
}

impl Candidate {
    pub fn new(description: impl Into<String>, place_id: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            place_id: place_id.into(),
        }
    }
}

/// Autocomplete endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub predictions: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AutocompleteResponse {
    /// Predictions of an `OK` response; empty for any other status
    pub fn into_candidates(self) -> Vec<Candidate> {
        if self.status == STATUS_OK {
            self.predictions
        } else {
            Vec::new()
        }
    }
}

/// Place details endpoint response (`fields=geometry`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PlaceResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl DetailsResponse {
    /// Coordinates of an `OK` response that carries geometry
    pub fn coordinates(&self) -> Option<Coordinates> {
        if self.status != STATUS_OK {
            return None;
        }
        let location = self.result.as_ref()?.geometry.as_ref()?.location?;
        Some(Coordinates::new(location.lat, location.lng))
    }
}

/// Remote Places service
///
/// Implementations return the decoded response whatever its status; only
/// transport and decoding problems are errors.
pub trait PlacesBackend: Send + Sync {
    /// Ranked predictions for partial text
    fn autocomplete(
        &self,
        input: &str,
        session: Option<&str>,
    ) -> impl Future<Output = Result<AutocompleteResponse>> + Send;

    /// Geometry of one identified place
    fn details(
        &self,
        place_id: &str,
        session: Option<&str>,
    ) -> impl Future<Output = Result<DetailsResponse>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_predictions_surface() {
        let response: AutocompleteResponse = serde_json::from_value(json!({
            "status": "OK",
            "predictions": [
                {"description": "Eiffel Tower, Paris, France", "place_id": "p1", "types": ["tourist_attraction"]},
                {"description": "Eiffel Tower, Las Vegas, NV, USA", "place_id": "p2"}
            ]
        }))
        .unwrap();

        let candidates = response.into_candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], Candidate::new("Eiffel Tower, Paris, France", "p1"));
        assert_eq!(candidates[1].place_id, "p2");
    }

    #[test]
    fn test_non_ok_status_yields_nothing() {
        for status in ["ZERO_RESULTS", "REQUEST_DENIED", "OVER_QUERY_LIMIT", "INVALID_REQUEST"] {
            let response: AutocompleteResponse = serde_json::from_value(json!({
                "status": status,
                "predictions": [{"description": "stale", "place_id": "x"}]
            }))
            .unwrap();
            assert!(response.into_candidates().is_empty(), "{} leaked predictions", status);
        }
    }

    #[test]
    fn test_ok_without_predictions_field() {
        let response: AutocompleteResponse =
            serde_json::from_value(json!({"status": "OK"})).unwrap();
        assert!(response.into_candidates().is_empty());
    }

    #[test]
    fn test_details_coordinates() {
        let response: DetailsResponse = serde_json::from_value(json!({
            "status": "OK",
            "result": {"geometry": {"location": {"lat": 48.8584, "lng": 2.2945}}}
        }))
        .unwrap();
        assert_eq!(response.coordinates(), Some(Coordinates::new(48.8584, 2.2945)));
    }

    #[test]
    fn test_details_without_geometry() {
        let cases = [
            json!({"status": "ZERO_RESULTS"}),
            json!({"status": "OK"}),
            json!({"status": "OK", "result": {}}),
            json!({"status": "OK", "result": {"geometry": {}}}),
            json!({"status": "NOT_FOUND", "result": {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}}),
        ];
        for body in cases {
            let response: DetailsResponse = serde_json::from_value(body.clone()).unwrap();
            assert!(response.coordinates().is_none(), "{} produced coordinates", body);
        }
    }
}
