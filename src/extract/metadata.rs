//! Effective-date and location extraction from first-page regions.

use crate::config::{LayoutConfig, Region};
use crate::model::DocumentMetadata;
use crate::source::DocumentSource;
use chrono::NaiveDate;
use regex::Regex;

/// Scans fixed first-page regions for the effective date and the plant
/// location. Stateless per document and best-effort throughout: any failure
/// yields `None`, never an error that aborts the pipeline.
#[derive(Debug)]
pub struct MetadataExtractor {
    date_pattern: Regex,
    date_region: Option<Region>,
    location_region: Option<Region>,
    location_literal: Option<String>,
}

impl MetadataExtractor {
    /// Build an extractor from a layout configuration.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            date_pattern: Regex::new(r"\d{1,2}/\d{1,2}/(\d{4}|\d{2})").unwrap(),
            date_region: config.date_region,
            location_region: config.location_region,
            location_literal: config.location_literal.clone(),
        }
    }

    /// Extract both metadata fields from a document.
    pub fn extract<S: DocumentSource + ?Sized>(&self, source: &S) -> DocumentMetadata {
        DocumentMetadata {
            effective_date: self.effective_date(source),
            location: self.location(source),
        }
    }

    /// First date in the date region. The year convention (two-digit vs
    /// four-digit) is picked from the width of the matched year; chrono's
    /// `%Y` would otherwise accept a two-digit year as year 24 AD.
    fn effective_date<S: DocumentSource + ?Sized>(&self, source: &S) -> Option<NaiveDate> {
        let region = self.date_region.as_ref()?;
        let text = source.region_text(region)?;
        let captures = self.date_pattern.captures(&text)?;
        let matched = captures.get(0)?.as_str();
        let format = match captures.get(1).map(|y| y.as_str().len()) {
            Some(4) => "%m/%d/%Y",
            _ => "%m/%d/%y",
        };

        match NaiveDate::parse_from_str(matched, format) {
            Ok(date) => Some(date),
            Err(_) => {
                log::debug!("date '{matched}' matched the pattern but is not a valid date");
                None
            }
        }
    }

    /// The configured facility literal if it occurs in the location region,
    /// otherwise the region's first non-empty line, upper-cased with commas
    /// stripped.
    fn location<S: DocumentSource + ?Sized>(&self, source: &S) -> Option<String> {
        let region = self.location_region.as_ref()?;
        let text = source.region_text(region)?;

        if let Some(literal) = &self.location_literal {
            if text.to_uppercase().contains(&literal.to_uppercase()) {
                return Some(literal.clone());
            }
        }

        text.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(|line| line.replace(',', "").to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CapturedDocument;

    fn extractor() -> MetadataExtractor {
        MetadataExtractor::from_config(&LayoutConfig::vertical())
    }

    fn capture_with(date_text: &str, location_text: &str) -> CapturedDocument {
        let mut capture = CapturedDocument::new();
        // vertical preset: date region (54,10)-(82,254), location (0,500)-(40,700)
        capture.push_text(1, 100.0, 60.0, date_text);
        capture.push_text(1, 550.0, 20.0, location_text);
        capture
    }

    #[test]
    fn test_four_digit_date() {
        let capture = capture_with("EFFECTIVE DATE 10/07/2024", "Statesville, NC");
        let metadata = extractor().extract(&capture);
        assert_eq!(
            metadata.effective_date,
            NaiveDate::from_ymd_opt(2024, 10, 7)
        );
    }

    #[test]
    fn test_two_digit_date() {
        let capture = capture_with("EFFECTIVE 01/05/24", "Statesville, NC");
        let metadata = extractor().extract(&capture);
        assert_eq!(metadata.effective_date, NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn test_no_date_match_is_none() {
        let capture = capture_with("no date here", "Statesville, NC");
        assert!(extractor().extract(&capture).effective_date.is_none());
    }

    #[test]
    fn test_location_fallback_uppercases_and_strips_commas() {
        let capture = capture_with("10/07/2024", "Statesville, NC");
        let metadata = extractor().extract(&capture);
        assert_eq!(metadata.location.as_deref(), Some("STATESVILLE NC"));
    }

    #[test]
    fn test_location_literal_wins() {
        let config = LayoutConfig::horizontal();
        let extractor = MetadataExtractor::from_config(&config);

        let mut capture = CapturedDocument::new();
        // horizontal preset: location region (10,400)-(40,700)
        capture.push_text(1, 450.0, 20.0, "Hudson's Feed Mill price list");
        let metadata = extractor.extract(&capture);
        assert_eq!(metadata.location.as_deref(), Some("HUDSON'S"));
    }

    #[test]
    fn test_missing_regions_yield_empty_metadata() {
        let capture = CapturedDocument::new();
        let metadata = extractor().extract(&capture);
        assert!(metadata.is_empty());
    }
}
