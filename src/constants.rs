//! Centralized constants for the veloce crate
//!
//! Endpoints and cache settings shared between the engine collaborators
//! and the config defaults.

/// External API endpoints
pub mod api {
    /// Google Places autocomplete endpoint
    pub const PLACES_AUTOCOMPLETE_URL: &str =
        "https://maps.googleapis.com/maps/api/place/autocomplete/json";

    /// Google Places details endpoint
    pub const PLACES_DETAILS_URL: &str =
        "https://maps.googleapis.com/maps/api/place/details/json";

    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Status value the Places API uses for a usable response
    pub const STATUS_OK: &str = "OK";
}

/// Navigation handoff
pub mod nav {
    /// Screen that receives a resolved location by navigation
    pub const FIND_RIDE_PATH: &str = "/find-ride";

    /// Notice shown when the user refuses location access
    pub const PERMISSION_DENIED_NOTICE: &str = "Permission denied";
}

/// Cache settings
pub mod cache {
    /// IP location cache duration in seconds (1 hour)
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    /// IP location cache file name
    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location_cache.json";
}
