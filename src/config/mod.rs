//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/veloce/config.toml

pub mod defaults;

use crate::constants::api::{NOMINATIM_URL, PLACES_AUTOCOMPLETE_URL, PLACES_DETAILS_URL};
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Places API settings (autocomplete + details)
    #[serde(default)]
    pub places: PlacesConfig,

    /// Input field behaviour
    #[serde(default)]
    pub input: InputConfig,

    /// Forward/reverse geocoding settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Device location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Map URL settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Places API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// API key sent with every Places request
    #[serde(default)]
    pub api_key: String,

    /// Autocomplete endpoint
    #[serde(default = "default_autocomplete_url")]
    pub autocomplete_url: String,

    /// Place details endpoint
    #[serde(default = "default_details_url")]
    pub details_url: String,

    /// Language preference for predictions
    #[serde(default = "default_language")]
    pub language: String,

    /// Send a per-field session token with autocomplete and details calls
    #[serde(default = "default_true")]
    pub session_tokens: bool,
}

/// Input field behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Quiet interval before a lookup fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shortest query that triggers a lookup
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
}

/// Geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim base URL
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// User agent for Nominatim requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Device location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Whether the user has granted foreground location access
    #[serde(default = "default_true")]
    pub permission_granted: bool,

    /// Fixed device position as "lat,lng"; IP geolocation is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<String>,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_true() -> bool {
    true
}
fn default_autocomplete_url() -> String {
    PLACES_AUTOCOMPLETE_URL.to_string()
}
fn default_details_url() -> String {
    PLACES_DETAILS_URL.to_string()
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_min_query_chars() -> usize {
    DEFAULT_MIN_QUERY_CHARS
}
fn default_nominatim_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/search/?api=1&query={lat},{lng}".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            autocomplete_url: default_autocomplete_url(),
            details_url: default_details_url(),
            language: default_language(),
            session_tokens: true,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
        }
    }
}

impl InputConfig {
    /// Quiet interval as a `Duration`
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            permission_granted: true,
            fixed: None,
        }
    }
}

impl LocationConfig {
    /// Parse the fixed position, if one is configured
    pub fn fixed_position(&self) -> Result<Option<Coordinates>> {
        self.fixed.as_deref().map(str::parse::<Coordinates>).transpose()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
        }
    }
}

impl HttpConfig {
    /// Build a reqwest client honouring the configured timeout
    pub fn client(&self, user_agent: &str) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(Error::from)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["places", "api_key"] => Some(self.places.api_key.clone()),
            ["places", "autocomplete_url"] => Some(self.places.autocomplete_url.clone()),
            ["places", "details_url"] => Some(self.places.details_url.clone()),
            ["places", "language"] => Some(self.places.language.clone()),
            ["places", "session_tokens"] => Some(self.places.session_tokens.to_string()),

            ["input", "debounce_ms"] => Some(self.input.debounce_ms.to_string()),
            ["input", "min_query_chars"] => Some(self.input.min_query_chars.to_string()),

            ["geocoding", "nominatim_url"] => Some(self.geocoding.nominatim_url.clone()),
            ["geocoding", "user_agent"] => Some(self.geocoding.user_agent.clone()),

            ["location", "permission_granted"] => {
                Some(self.location.permission_granted.to_string())
            }
            ["location", "fixed"] => Some(self.location.fixed.clone().unwrap_or_default()),

            ["http", "timeout_secs"] => Some(self.http.timeout_secs.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["places", "api_key"] => {
                self.places.api_key = value.to_string();
            }
            ["places", "autocomplete_url"] => {
                self.places.autocomplete_url = value.to_string();
            }
            ["places", "details_url"] => {
                self.places.details_url = value.to_string();
            }
            ["places", "language"] => {
                self.places.language = value.to_string();
            }
            ["places", "session_tokens"] => {
                self.places.session_tokens = parse_bool(value)?;
            }

            ["input", "debounce_ms"] => {
                self.input.debounce_ms = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid debounce value: {}", value))
                })?;
            }
            ["input", "min_query_chars"] => {
                let chars: usize = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid character count: {}", value))
                })?;
                if chars < MIN_QUERY_CHARS_FLOOR {
                    return Err(Error::Config(format!(
                        "input.min_query_chars must be at least {}",
                        MIN_QUERY_CHARS_FLOOR
                    )));
                }
                self.input.min_query_chars = chars;
            }

            ["geocoding", "nominatim_url"] => {
                self.geocoding.nominatim_url = value.to_string();
            }
            ["geocoding", "user_agent"] => {
                self.geocoding.user_agent = value.to_string();
            }

            ["location", "permission_granted"] => {
                self.location.permission_granted = parse_bool(value)?;
            }
            ["location", "fixed"] => {
                if value.is_empty() {
                    self.location.fixed = None;
                } else {
                    value.parse::<Coordinates>().map_err(|e| {
                        Error::Config(format!("Invalid fixed position: {}", e))
                    })?;
                    self.location.fixed = Some(value.to_string());
                }
            }

            ["http", "timeout_secs"] => {
                self.http.timeout_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "places.api_key",
            "places.autocomplete_url",
            "places.details_url",
            "places.language",
            "places.session_tokens",
            "input.debounce_ms",
            "input.min_query_chars",
            "geocoding.nominatim_url",
            "geocoding.user_agent",
            "location.permission_granted",
            "location.fixed",
            "http.timeout_secs",
            "server.host",
            "server.port",
            "url.default",
        ]
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid boolean value: {}", value)))
}
