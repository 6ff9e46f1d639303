//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default language preference sent to the autocomplete endpoint
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default quiet interval before a lookup fires, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Shortest query (in characters) that triggers a lookup
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// Lowest accepted `input.min_query_chars`; shorter text never looks up
pub const MIN_QUERY_CHARS_FLOOR: usize = 2;

/// Default per-request timeout for remote calls, in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// User agent sent to Nominatim (required by its usage policy)
pub const DEFAULT_USER_AGENT: &str = "veloce/0.1.0";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8081;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "veloce";

/// Environment variable that overrides `places.api_key` in the CLI
pub const API_KEY_ENV: &str = "VELOCE_GOOGLE_API_KEY";
