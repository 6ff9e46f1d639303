//! Output formatters
//!
//! Trait-based rendering of resolved locations and suggestion lists for the
//! CLI.

pub mod json;
pub mod text;
pub mod url;

use crate::config::Config;
use crate::engine::Resolution;
use crate::error::Result;
use crate::places::Candidate;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a resolved location
    ///
    /// # Arguments
    /// * `resolution` - The record plus where its coordinates came from
    /// * `config` - Application config (for url providers, etc.)
    fn format(&self, resolution: &Resolution, config: &Config) -> Result<String>;

    /// Format a suggestion list
    fn format_suggestions(&self, candidates: &[Candidate], config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "url" => Some(Box::new(url::UrlFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    ["json", "text", "url"]
        .into_iter()
        .filter_map(get_formatter)
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}
