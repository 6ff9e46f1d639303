//! Suggest command handler
//!
//! One autocomplete lookup, no debouncing.

use crate::cli::{init_logging, list_formats, live_engine, load_config, OutputArgs};
use crate::error::Result;
use clap::Args;

/// Suggest command arguments
#[derive(Args)]
pub struct SuggestArgs {
    /// Partial address text
    #[arg(default_value = "")]
    pub text: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the suggest command
pub async fn run(args: SuggestArgs) -> Result<()> {
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

    print!("{}", formatter.format_suggestions(&candidates, &config)?);
    Ok(())
}
