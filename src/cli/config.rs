//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "input.debounce_ms")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    // Show path
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Reset config
    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            print!("{}", render_config(&config));
        }

        // Key only: show that value
        (Some(key), None) => {
            if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                eprintln!("Unknown config key: {}", key);
                eprintln!("\nAvailable keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                std::process::exit(1);
            }
        }

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        // Value without key: not valid
        (None, Some(_)) => {
            eprintln!("Error: Must specify a key to set a value");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Render every key grouped by section; the API key is masked
fn render_config(config: &Config) -> String {
    let mut output = String::new();
    let mut section = "";

    for key in Config::available_keys() {
        let Some((head, name)) = key.split_once('.') else {
            continue;
        };
        if head != section {
            if !section.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("[{}]\n", head));
            section = head;
        }

        let value = config.get(key).unwrap_or_default();
        let line = match key {
            "places.api_key" if value.is_empty() => format!("{} = \"\" # not configured", name),
            "places.api_key" => format!("{} = \"***\" # configured", name),
            _ if value.parse::<f64>().is_ok() || value == "true" || value == "false" => {
                format!("{} = {}", name, value)
            }
            _ => format!("{} = \"{}\"", name, value),
        };
        output.push_str(&line);
        output.push('\n');
    }

    output.push_str("\n[url.providers]\n");
    let mut providers: Vec<_> = config.url.providers.iter().collect();
    providers.sort();
    for (name, template) in providers {
        output.push_str(&format!("{} = \"{}\"\n", name, template));
    }
    output
}
