//! Locate command handler
//!
//! Runs the current-location flow: permission, position fix, reverse
//! geocoding, delivery.

use crate::cli::{fixed_device, init_logging, list_formats, live_engine, load_config, OutputArgs};
use crate::constants::nav::{FIND_RIDE_PATH, PERMISSION_DENIED_NOTICE};
use crate::engine::{Deliver, LocateOutcome, NavigationSink, Route};
use crate::error::{Error, Result};
use crate::format::url::UrlFormatter;
use crate::geo::device::PositionSource;
use crate::geo::ip_location::IpLocator;
use crate::geo::Coordinates;
use crate::ride::{Endpoint, FindRide, RideStore};
use clap::Args;
use std::sync::Arc;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Use this position fix ("lat,lng") instead of the configured source
    #[arg(long)]
    pub at: Option<String>,

    /// Answer the permission prompt with "deny"
    #[arg(long)]
    pub deny: bool,

    /// Deliver through the find-ride navigation handoff
    #[arg(long)]
    pub navigate: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    if args.output.list_formats {
        list_formats();
        return Ok(());
    }
    init_logging("warn");

    let config = load_config()?;
    let formatter = args.output.formatter()?;

    let device = match (&args.at, args.deny) {
        (None, false) => None,
        (at, deny) => {
            let position = match at {
                Some(at) => PositionSource::Fixed(at.parse::<Coordinates>()?),
                None => match config.location.fixed_position()? {
                    Some(coords) => PositionSource::Fixed(coords),
                    None => PositionSource::Ip(IpLocator::new(
                        config.http.client(&config.geocoding.user_agent)?,
                    )),
                },
            };
            Some(fixed_device(position, !deny && config.location.permission_granted))
        }
    };
    let engine = live_engine(&config, device)?;

    let ride = Arc::new(RideStore::new());
    let sink: Arc<dyn Deliver> = if args.navigate {
        Arc::new(NavigationSink::new(FindRide::new(Arc::clone(&ride))))
    } else {
        ride.sink(Endpoint::From)
    };
    let mut field = engine.mount(sink);

    let outcome = field.use_current_location().await;
    if outcome == LocateOutcome::Denied {
        return Err(Error::PermissionDenied(PERMISSION_DENIED_NOTICE.to_string()));
    }
    let resolution = outcome.into_resolution().ok_or_else(|| {
        Error::Geo("Current location could not be determined".to_string())
    })?;

    let output = if args.output.format.eq_ignore_ascii_case("url") {
        UrlFormatter.format_with_provider(&resolution, &config, args.output.provider.as_deref())?
    } else {
        formatter.format(&resolution, &config)?
    };
    println!("{}", output.trim_end());

    if args.navigate {
        let route = Route::new(FIND_RIDE_PATH, resolution.record.to_params());
        eprintln!("Navigated to {}", route.to_url());
    }
    Ok(())
}
