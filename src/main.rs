//! veloce CLI entry point
//!
//! Address autocomplete and resolution - CLI + web API

use veloce::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
