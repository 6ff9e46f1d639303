//! Resolve command handler
//!
//! Looks up suggestions for the text, selects one and resolves it through
//! an input field, delivering into the ride state either by callback or by
//! the find-ride navigation handoff.

use crate::cli::{init_logging, list_formats, live_engine, load_config, OutputArgs};
use crate::constants::nav::FIND_RIDE_PATH;
use crate::engine::{Deliver, NavigationSink, Route};
use crate::error::{Error, Result};
use crate::format::url::UrlFormatter;
use crate::ride::{Endpoint, FindRide, RideStore};
use clap::Args;
use std::sync::Arc;

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Address text to search for
    pub text: String,

    /// Which suggestion to select (1-based)
    #[arg(long, default_value = "1")]
    pub pick: usize,

    /// Deliver through the find-ride navigation handoff
    #[arg(long)]
    pub navigate: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the resolve command
pub async fn run(args: ResolveArgs) -> Result<()> {
    if args.output.list_formats {
        list_formats();
        return Ok(());
    }
    init_logging("warn");

    let config = load_config()?;
    let formatter = args.output.formatter()?;
    let engine = live_engine(&config, None)?;

    let candidates = engine
        .suggestion_provider()
        .fetch_suggestions(&args.text, None)
        .await;
    let candidate = pick(&candidates, args.pick)
        .ok_or_else(|| {
            Error::Places(format!(
                "No suggestion #{} for '{}' ({} found)",
                args.pick,
                args.text,
                candidates.len()
            ))
        })?
        .clone();

    let ride = Arc::new(RideStore::new());
    let sink: Arc<dyn Deliver> = if args.navigate {
        Arc::new(NavigationSink::new(FindRide::new(Arc::clone(&ride))))
    } else {
        ride.sink(Endpoint::To)
    };

    let mut field = engine.mount_with_text(args.text.clone(), sink);
    let resolution = field.select(&candidate).await.ok_or_else(|| {
        Error::Places(format!("Suggestion #{} has no description", args.pick))
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
        if let Some(destination) = ride.snapshot().destination {
            eprintln!("find-ride destination: {}", destination.address());
        }
    }
    Ok(())
}

/// 1-based pick from the suggestion list
fn pick<T>(items: &[T], n: usize) -> Option<&T> {
    n.checked_sub(1).and_then(|i| items.get(i))
}
