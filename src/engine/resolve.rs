//! Place resolver
//!
//! Turns a selected candidate into coordinates in two stages: the place
//! details lookup, then forward geocoding of the candidate's description.
//! When both come up empty the record still goes out, carrying the
//! `0.0, 0.0` sentinel, so a selection always produces a location.

use crate::engine::record::LocationRecord;
use crate::geo::{Coordinates, Geocoder};
use crate::places::{Candidate, PlacesBackend};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Which stage produced the coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    PlaceDetails,
    Geocoded,
    /// Device position fix, address from reverse geocoding
    CurrentLocation,
    Unresolved,
}

/// A resolved record tagged with how it was resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub record: LocationRecord,
    pub source: ResolutionSource,
}

impl Resolution {
    /// False when the record carries the sentinel coordinates
    pub fn is_resolved(&self) -> bool {
        self.source != ResolutionSource::Unresolved
    }
}

pub struct PlaceResolver<P, G> {
    places: Arc<P>,
    geocoder: Arc<G>,
}

impl<P, G> Clone for PlaceResolver<P, G> {
    fn clone(&self) -> Self {
        Self {
            places: Arc::clone(&self.places),
            geocoder: Arc::clone(&self.geocoder),
        }
    }
}

impl<P: PlacesBackend, G: Geocoder> PlaceResolver<P, G> {
    pub fn new(places: Arc<P>, geocoder: Arc<G>) -> Self {
        Self { places, geocoder }
    }

    pub async fn resolve(&self, candidate: &Candidate, session: Option<&str>) -> Resolution {
        let (coords, source) = if let Some(coords) = self.from_details(candidate, session).await {
            (coords, ResolutionSource::PlaceDetails)
        } else if let Some(coords) = self.from_geocoder(candidate).await {
            (coords, ResolutionSource::Geocoded)
        } else {
            warn!(
                place_id = %candidate.place_id,
                description = %candidate.description,
                "no coordinates for selection, emitting unresolved record"
            );
            return Resolution {
                record: LocationRecord::unresolved(candidate.description.clone()),
                source: ResolutionSource::Unresolved,
            };
        };

        debug!(?source, lat = coords.lat, lng = coords.lng, "resolved selection");
        Resolution {
            record: LocationRecord::new(coords.lat, coords.lng, candidate.description.clone()),
            source,
        }
    }

    async fn from_details(&self, candidate: &Candidate, session: Option<&str>) -> Option<Coordinates> {
        match self.places.details(&candidate.place_id, session).await {
            Ok(response) => {
                let coords = response.coordinates();
                if coords.is_none() {
                    debug!(status = %response.status, "details lookup has no geometry");
                }
                coords
            }
            Err(e) => {
                warn!(place_id = %candidate.place_id, error = %e, "details lookup failed");
                None
            }
        }
    }

    async fn from_geocoder(&self, candidate: &Candidate) -> Option<Coordinates> {
        match self.geocoder.forward(&candidate.description).await {
            Ok(matches) => matches.into_iter().next(),
            Err(e) => {
                warn!(description = %candidate.description, error = %e, "geocoding fallback failed");
                None
            }
        }
    }
}
