//! veloce: address resolution and autocomplete engine
//!
//! The location-entry core of a ride-hailing client. Each address field
//! debounces keystrokes into Places autocomplete lookups, resolves a
//! selected suggestion to coordinates (place details first, forward
//! geocoding second) and can fill itself from the device position with a
//! reverse-geocoded address. Resolved locations leave the engine through a
//! single sink: a callback, or a navigation handoff to the find-ride screen.
//!
//! ## Features
//!
//! - Debounced autocomplete with stale-response protection
//! - Place details with geocoding fallback
//! - Current location with permission gate and reverse geocoding
//! - Callback or navigation delivery with identical payloads
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use veloce::config::Config;
//! use veloce::engine::{CallbackSink, Engine, Settings, StderrNotifier};
//! use veloce::geo::device::ConfiguredDevice;
//! use veloce::geo::nominatim::NominatimBackend;
//! use veloce::places::google::GooglePlaces;
//!
//! # async fn demo() -> veloce::Result<()> {
//! let config = Config::load()?;
//! let engine = Engine::new(
//!     GooglePlaces::new(config.places.clone(), &config.http)?,
//!     NominatimBackend::new(&config.geocoding, &config.http)?,
//!     ConfiguredDevice::from_config(&config.location, reqwest::Client::new())?,
//!     Arc::new(StderrNotifier),
//!     Settings::from_config(&config),
//! );
//!
//! let sink = Arc::new(CallbackSink::new(|record| println!("{:?}", record)));
//! let mut field = engine.mount(sink);
//! field.on_text_changed("Eiffel");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod format;
pub mod geo;
pub mod places;
pub mod ride;
pub mod server;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use engine::{LocationRecord, Resolution, ResolutionSource};
pub use error::{Error, Result};
pub use geo::Coordinates;
pub use places::Candidate;
