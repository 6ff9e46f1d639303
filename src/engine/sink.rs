//! Resolution sink
//!
//! Every resolved location leaves the engine through [`Deliver`]. A field
//! either hands the record to a caller-supplied callback or navigates to the
//! find-ride screen with the record encoded as string parameters. Both paths
//! carry identical field values.

use crate::constants::nav::FIND_RIDE_PATH;
use crate::engine::record::LocationRecord;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Exit point for resolved locations
pub trait Deliver: Send + Sync {
    fn deliver(&self, record: LocationRecord);
}

/// Delivers by invoking a closure synchronously
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: Fn(LocationRecord) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Deliver for CallbackSink<F>
where
    F: Fn(LocationRecord) + Send + Sync,
{
    fn deliver(&self, record: LocationRecord) {
        debug!(address = record.address(), "delivering by callback");
        (self.callback)(record);
    }
}

/// A navigation target with string-typed query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub pathname: String,
    pub params: Vec<(String, String)>,
}

impl Route {
    pub fn new(pathname: impl Into<String>, params: Vec<(String, String)>) -> Self {
        Self {
            pathname: pathname.into(),
            params,
        }
    }

    /// Value of the first parameter named `key`
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn params_map(&self) -> HashMap<String, String> {
        self.params.iter().cloned().collect()
    }

    /// Render as `pathname?k=v&...` with percent-encoded values
    pub fn to_url(&self) -> String {
        if self.params.is_empty() {
            return self.pathname.clone();
        }
        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.pathname, query)
    }

    /// Parse a URL produced by [`Self::to_url`]
    pub fn from_url(url: &str) -> Result<Self> {
        let (pathname, query) = url.split_once('?').unwrap_or((url, ""));
        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                let decode = |s: &str| {
                    urlencoding::decode(&s.replace('+', " "))
                        .map(|d| d.into_owned())
                        .map_err(|e| Error::InvalidParams(format!("bad encoding in {}: {}", pair, e)))
                };
                Ok((decode(k)?, decode(v)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(pathname, params))
    }
}

/// Something that can be navigated to
pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);
}

/// Delivers by navigating to the find-ride screen
pub struct NavigationSink<N> {
    navigator: N,
    pathname: String,
}

impl<N: Navigator> NavigationSink<N> {
    pub fn new(navigator: N) -> Self {
        Self {
            navigator,
            pathname: FIND_RIDE_PATH.to_string(),
        }
    }

    pub fn route_for(&self, record: &LocationRecord) -> Route {
        Route::new(self.pathname.clone(), record.to_params())
    }
}

impl<N: Navigator> Deliver for NavigationSink<N> {
    fn deliver(&self, record: LocationRecord) {
        let route = self.route_for(&record);
        debug!(url = %route.to_url(), "delivering by navigation");
        self.navigator.push(route);
    }
}

/// Navigator that remembers every route it was given
#[derive(Debug, Default)]
pub struct RouteLog {
    routes: Mutex<Vec<Route>>,
}

impl RouteLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RouteLog {
    fn push(&self, route: Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}

impl<N: Navigator + ?Sized> Navigator for std::sync::Arc<N> {
    fn push(&self, route: Route) {
        (**self).push(route);
    }
}
