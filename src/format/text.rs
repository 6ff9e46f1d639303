//! Human-readable text output formatter

use crate::config::Config;
use crate::engine::{Resolution, ResolutionSource};
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::places::Candidate;

/// Text formatter - outputs a short human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, resolution: &Resolution, _config: &Config) -> Result<String> {
        let record = &resolution.record;
        let mut output = String::new();

        output.push_str(&format!("{}\n", record.address()));
        output.push_str(&format!(
            "  ({:.6}, {:.6})\n",
            record.latitude(),
            record.longitude()
        ));
        let source = match resolution.source {
            ResolutionSource::PlaceDetails => "place details",
            ResolutionSource::Geocoded => "geocoded",
            ResolutionSource::CurrentLocation => "current location",
            ResolutionSource::Unresolved => "unresolved (coordinates unknown)",
        };
        output.push_str(&format!("  source: {}\n", source));

        Ok(output)
    }

    fn format_suggestions(&self, candidates: &[Candidate], _config: &Config) -> Result<String> {
        if candidates.is_empty() {
            return Ok("No suggestions\n".to_string());
        }
        Ok(candidates
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:>2}. {}\n", i + 1, c.description))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;

    #[test]
    fn test_text_format() {
        let output = TextFormatter
            .format(&fixtures::eiffel(), &Config::default())
            .unwrap();

        assert!(output.starts_with("Eiffel Tower, Paris, France\n"));
        assert!(output.contains("(48.858400, 2.294500)"));
        assert!(output.contains("source: place details"));
    }

    #[test]
    fn test_text_unresolved() {
        let output = TextFormatter
            .format(&fixtures::unresolved(), &Config::default())
            .unwrap();
        assert!(output.contains("unresolved"));
    }

    #[test]
    fn test_text_current_location() {
        let resolution = Resolution {
            source: ResolutionSource::CurrentLocation,
            ..fixtures::eiffel()
        };
        let output = TextFormatter.format(&resolution, &Config::default()).unwrap();
        assert!(output.contains("source: current location"));
    }

    #[test]
    fn test_text_suggestions_numbered() {
        let candidates = vec![
            Candidate::new("Eiffel Tower, Paris, France", "p1"),
            Candidate::new("Eiffel Tower Restaurant, Las Vegas", "p2"),
        ];
        let output = TextFormatter
            .format_suggestions(&candidates, &Config::default())
            .unwrap();

        assert_eq!(
            output,
            " 1. Eiffel Tower, Paris, France\n 2. Eiffel Tower Restaurant, Las Vegas\n"
        );
        assert_eq!(
            TextFormatter.format_suggestions(&[], &Config::default()).unwrap(),
            "No suggestions\n"
        );
    }
}
