//! JSON output formatter

use crate::config::Config;
use crate::engine::Resolution;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::places::Candidate;

/// JSON formatter - pretty-printed record and source
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Record and resolution source as JSON"
    }

    fn format(&self, resolution: &Resolution, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(resolution)?)
    }

    fn format_suggestions(&self, candidates: &[Candidate], _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(candidates)?)
    }
}
