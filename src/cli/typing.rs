//! Type command handler
//!
//! Replays keystrokes through one debounced input field so the coalescing
//! can be watched: each argument is the field's text after one keystroke.

use crate::cli::{init_logging, list_formats, live_engine, load_config, OutputArgs};
use crate::error::Result;
use crate::ride::{Endpoint, RideStore};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Type command arguments
#[derive(Args)]
pub struct TypeArgs {
    /// Successive field contents, e.g. `E Ei Eif Eiff`
    #[arg(required_unless_present = "list_formats")]
    pub keystrokes: Vec<String>,

    /// Delay between keystrokes in milliseconds
    #[arg(long, default_value = "100")]
    pub interval_ms: u64,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the type command
pub async fn run(args: TypeArgs) -> Result<()> {
    if args.output.list_formats {
        list_formats();
        return Ok(());
    }
    init_logging("warn");

    let config = load_config()?;
    let formatter = args.output.formatter()?;
    let engine = live_engine(&config, None)?;

    let ride = Arc::new(RideStore::new());
    let mut field = engine.mount(ride.sink(Endpoint::To));
    let mut updates = field.subscribe();
    let interval = Duration::from_millis(args.interval_ms);

    for (i, text) in args.keystrokes.into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(interval).await;
        }
        info!(text = %text, "keystroke");
        field.on_text_changed(text);
    }

    if engine.suggestion_provider().accepts(field.text()) {
        // Let the last timer fire, then wait for its response.
        tokio::time::sleep(engine.settings().debounce).await;
        let _ = updates.borrow_and_update();
        let settle = Duration::from_secs(config.http.timeout_secs);
        let _ = tokio::time::timeout(settle, updates.changed()).await;
    }

    eprintln!("Queried: {}", field.text());
    print!("{}", formatter.format_suggestions(&field.suggestions(), &config)?);
    Ok(())
}
