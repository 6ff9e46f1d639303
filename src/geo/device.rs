//! Device location collaborator
//!
//! Foreground permission plus the current position fix. A host supplies
//! either a fixed position (a GPS fix handed over by the caller) or falls
//! back to IP geolocation.

use crate::config::LocationConfig;
use crate::error::Result;
use crate::geo::ip_location::IpLocator;
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

/// Outcome of a foreground permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
}

/// Access to the device's position
pub trait DeviceLocation: Send + Sync {
    /// Ask for foreground location access
    fn request_permission(&self) -> impl Future<Output = Result<Permission>> + Send;

    /// Acquire the current position
    fn current_position(&self) -> impl Future<Output = Result<Coordinates>> + Send;
}

/// Where the position comes from
#[derive(Debug, Clone)]
pub enum PositionSource {
    /// A fix supplied by the caller
    Fixed(Coordinates),
    /// Public IP geolocation
    Ip(IpLocator),
}

/// Device location driven by configuration
#[derive(Debug, Clone)]
pub struct ConfiguredDevice {
    permission: Permission,
    source: PositionSource,
}

impl ConfiguredDevice {
    pub fn new(permission: Permission, source: PositionSource) -> Self {
        Self { permission, source }
    }

    /// Build from `[location]` settings; IP lookups use `client`
    pub fn from_config(config: &LocationConfig, client: reqwest::Client) -> Result<Self> {
        let permission = if config.permission_granted {
            Permission::Granted
        } else {
            Permission::Denied
        };
        let source = match config.fixed_position()? {
            Some(coords) => PositionSource::Fixed(coords),
            None => PositionSource::Ip(IpLocator::new(client)),
        };
        Ok(Self::new(permission, source))
    }
}

impl DeviceLocation for ConfiguredDevice {
    async fn request_permission(&self) -> Result<Permission> {
        Ok(self.permission)
    }

    async fn current_position(&self) -> Result<Coordinates> {
        match &self.source {
            PositionSource::Fixed(coords) => Ok(*coords),
            PositionSource::Ip(locator) => locator.locate().await,
        }
    }
}

/// Position supplied per request; permission still comes from `inner`
#[derive(Debug)]
pub struct Pinned<D> {
    inner: Arc<D>,
    at: Coordinates,
}

impl<D> Pinned<D> {
    pub fn new(inner: Arc<D>, at: Coordinates) -> Self {
        Self { inner, at }
    }
}

impl<D: DeviceLocation> DeviceLocation for Pinned<D> {
    async fn request_permission(&self) -> Result<Permission> {
        self.inner.request_permission().await
    }

    async fn current_position(&self) -> Result<Coordinates> {
        Ok(self.at)
    }
}
