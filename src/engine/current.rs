//! Current location resolver
//!
//! Permission, position fix, reverse geocoding. Unlike a selection there is
//! no text to fall back on, so any failure ends the operation without a
//! record.

use crate::constants::nav::PERMISSION_DENIED_NOTICE;
use crate::engine::notice::Notifier;
use crate::engine::record::LocationRecord;
use crate::engine::resolve::{Resolution, ResolutionSource};
use crate::geo::device::{DeviceLocation, Permission};
use crate::geo::{Coordinates, Geocoder};
use std::sync::Arc;
use tracing::{debug, warn};

/// How a current-location request ended
#[derive(Debug, Clone, PartialEq)]
pub enum LocateOutcome {
    Located(LocationRecord),
    /// The user refused access; a notice was shown
    Denied,
    /// Position or address could not be determined
    Unavailable,
}

impl LocateOutcome {
    pub fn into_record(self) -> Option<LocationRecord> {
        match self {
            LocateOutcome::Located(record) => Some(record),
            LocateOutcome::Denied | LocateOutcome::Unavailable => None,
        }
    }

    /// The located record tagged as coming from the device
    pub fn into_resolution(self) -> Option<Resolution> {
        self.into_record().map(|record| Resolution {
            record,
            source: ResolutionSource::CurrentLocation,
        })
    }
}

pub struct CurrentLocationResolver<D, G> {
    device: Arc<D>,
    geocoder: Arc<G>,
    notifier: Arc<dyn Notifier>,
}

impl<D, G> Clone for CurrentLocationResolver<D, G> {
    fn clone(&self) -> Self {
        Self {
            device: Arc::clone(&self.device),
            geocoder: Arc::clone(&self.geocoder),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<D: DeviceLocation, G: Geocoder> CurrentLocationResolver<D, G> {
    pub fn new(device: Arc<D>, geocoder: Arc<G>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            device,
            geocoder,
            notifier,
        }
    }

    pub async fn locate(&self) -> LocateOutcome {
        match self.device.request_permission().await {
            Ok(Permission::Granted) => {}
            Ok(Permission::Denied) => {
                self.notifier.notify(PERMISSION_DENIED_NOTICE);
                return LocateOutcome::Denied;
            }
            Err(e) => {
                warn!(error = %e, "location permission request failed");
                return LocateOutcome::Unavailable;
            }
        }

        let coords = match self.device.current_position().await {
            Ok(coords) => coords,
            Err(e) => {
                warn!(error = %e, "could not acquire current position");
                return LocateOutcome::Unavailable;
            }
        };

        let address = match self.geocoder.reverse(coords).await {
            Ok(Some(address)) => address,
            Ok(None) => {
                warn!(lat = coords.lat, lng = coords.lng, "reverse geocoding found nothing");
                return LocateOutcome::Unavailable;
            }
            Err(e) => {
                warn!(error = %e, "reverse geocoding failed");
                return LocateOutcome::Unavailable;
            }
        };

        let mut formatted = address.formatted();
        if formatted.is_empty() {
            formatted = coordinate_label(coords);
        }
        debug!(address = %formatted, "located device");

        LocateOutcome::Located(LocationRecord::new(coords.lat, coords.lng, formatted))
    }
}

/// Address text for a position with no named components
fn coordinate_label(coords: Coordinates) -> String {
    format!("{:.5}, {:.5}", coords.lat, coords.lng)
}
