//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions. This layer is
//! the only place that reads the config file or the API key environment
//! variable; everything below it receives explicit settings.

pub mod config;
pub mod locate;
pub mod resolve;
pub mod serve;
pub mod suggest;
pub mod typing;

use crate::config::defaults::API_KEY_ENV;
use crate::config::Config;
use crate::engine::{Engine, Notifier, Settings, StderrNotifier};
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, OutputFormatter};
use crate::geo::device::{ConfiguredDevice, Permission, PositionSource};
use crate::geo::nominatim::NominatimBackend;
use crate::places::google::GooglePlaces;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Address autocomplete and resolution for ride requests
#[derive(Parser)]
#[command(name = "veloce")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List autocomplete suggestions for a query
    Suggest(suggest::SuggestArgs),

    /// Pick a suggestion and resolve it to coordinates
    Resolve(resolve::ResolveArgs),

    /// Replay keystrokes through a debounced input field
    #[command(name = "type")]
    Type(typing::TypeArgs),

    /// Resolve the current location to an address
    Locate(locate::LocateArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Output format shared by the lookup commands
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format: json, text or url
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Map provider for the url format
    #[arg(long)]
    pub provider: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

impl OutputArgs {
    pub fn formatter(&self) -> Result<Box<dyn OutputFormatter>> {
        get_formatter(&self.format)
            .ok_or_else(|| Error::Config(format!("Unknown output format: {}", self.format)))
    }
}

/// Engine wired to the live services
pub type LiveEngine = Engine<GooglePlaces, NominatimBackend, ConfiguredDevice>;

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest(args) => suggest::run(args).await,
        Commands::Resolve(args) => resolve::run(args).await,
        Commands::Type(args) => typing::run(args).await,
        Commands::Locate(args) => locate::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Initialize logging; `RUST_LOG` overrides `default`
pub(crate) fn init_logging(default: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file, letting the environment supply the API key
pub(crate) fn load_config() -> Result<Config> {
    let mut config = Config::load()?;
    apply_env_key(&mut config, std::env::var(API_KEY_ENV).ok());
    Ok(config)
}

fn apply_env_key(config: &mut Config, key: Option<String>) {
    if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
        config.places.api_key = key;
    }
}

/// Build the engine from configuration
///
/// `device` replaces the configured device when given (e.g. `--at`).
pub(crate) fn live_engine(config: &Config, device: Option<ConfiguredDevice>) -> Result<LiveEngine> {
    let places = GooglePlaces::new(config.places.clone(), &config.http)?;
    if !places.has_api_key() {
        eprintln!(
            "Warning: no Places API key; set places.api_key or {}",
            API_KEY_ENV
        );
    }
    let geocoder = NominatimBackend::new(&config.geocoding, &config.http)?;
    let device = match device {
        Some(device) => device,
        None => ConfiguredDevice::from_config(
            &config.location,
            config.http.client(&config.geocoding.user_agent)?,
        )?,
    };
    Ok(Engine::new(
        places,
        geocoder,
        device,
        Arc::new(StderrNotifier) as Arc<dyn Notifier>,
        Settings::from_config(config),
    ))
}

/// Device with an explicit position and permission answer
pub(crate) fn fixed_device(position: PositionSource, granted: bool) -> ConfiguredDevice {
    let permission = if granted {
        Permission::Granted
    } else {
        Permission::Denied
    };
    ConfiguredDevice::new(permission, position)
}

pub(crate) fn list_formats() {
    println!("Available formats:");
    for f in available_formats() {
        println!("  {:<6} {}", f.name, f.description);
    }
}
