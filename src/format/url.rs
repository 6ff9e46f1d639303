//! URL output formatter

use crate::config::Config;
use crate::engine::Resolution;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::places::Candidate;

/// URL formatter - outputs a map URL for the resolved location
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URL with optional provider override
    pub fn format_with_provider(
        &self,
        resolution: &Resolution,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        if !resolution.is_resolved() {
            return Err(Error::Geo(format!(
                "No coordinates for: {}",
                resolution.record.address()
            )));
        }
        let record = &resolution.record;
        config.format_url(provider, record.latitude(), record.longitude())
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for the resolved location"
    }

    fn format(&self, resolution: &Resolution, config: &Config) -> Result<String> {
        self.format_with_provider(resolution, config, None)
    }

    fn format_suggestions(&self, _candidates: &[Candidate], _config: &Config) -> Result<String> {
        Err(Error::Config(
            "url format needs a resolved location; use json or text".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;

    #[test]
    fn test_url_format_default_provider() {
        let output = UrlFormatter
            .format(&fixtures::eiffel(), &Config::default())
            .unwrap();

        // Default provider is Google
        assert!(output.contains("google.com/maps"));
        assert!(output.contains("48.8584,2.2945"));
    }

    #[test]
    fn test_url_format_with_provider() {
        let output = UrlFormatter
            .format_with_provider(&fixtures::eiffel(), &Config::default(), Some("openstreetmap"))
            .unwrap();

        assert!(output.contains("openstreetmap.org"));
    }

    #[test]
    fn test_url_format_unresolved() {
        let result = UrlFormatter.format(&fixtures::unresolved(), &Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_url_suggestions_rejected() {
        assert!(UrlFormatter.format_suggestions(&[], &Config::default()).is_err());
    }
}
