//! Document sources.
//!
//! The engine never renders or extracts pages itself. A `DocumentSource`
//! stands in for the external extraction component: it supplies the ordered
//! fragment list and answers bounded-region text lookups for metadata.

use crate::config::Region;
use crate::error::Result;
use crate::model::Fragment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Supplies page-level fragments and positioned text for one document.
pub trait DocumentSource {
    /// Ordered fragments, in page order. May legitimately be empty; the
    /// engine never assumes a non-empty result.
    fn fragments(&self) -> Result<Vec<Fragment>>;

    /// Text found inside a page region, lines joined by newline, or `None`
    /// if the region holds no text.
    fn region_text(&self, region: &Region) -> Option<String>;
}

/// A serialized snapshot of an extracted document: fragments plus the
/// positioned text blocks metadata extraction scans.
///
/// Captures let fixtures, tests, and the CLI run the engine without any
/// page-rendering machinery attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedDocument {
    /// Page-level table fragments, in page order
    #[serde(default)]
    pub fragments: Vec<Fragment>,

    /// Loose text anchored to page positions
    #[serde(default)]
    pub texts: Vec<PlacedText>,
}

/// A text block anchored to a point on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedText {
    /// 1-based page number
    pub page: u32,
    /// Horizontal anchor in points
    pub x: f32,
    /// Vertical anchor in points
    pub y: f32,
    /// Text content
    pub content: String,
}

impl CapturedDocument {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a capture from JSON.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Read a capture from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Append a fragment.
    pub fn push_fragment(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Anchor a text block to a page position.
    pub fn push_text(&mut self, page: u32, x: f32, y: f32, content: impl Into<String>) {
        self.texts.push(PlacedText {
            page,
            x,
            y,
            content: content.into(),
        });
    }
}

impl DocumentSource for CapturedDocument {
    fn fragments(&self) -> Result<Vec<Fragment>> {
        Ok(self.fragments.clone())
    }

    fn region_text(&self, region: &Region) -> Option<String> {
        let lines: Vec<&str> = self
            .texts
            .iter()
            .filter(|t| region.contains(t.page, t.x, t.y))
            .map(|t| t.content.as_str())
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    #[test]
    fn test_region_text_joins_blocks_in_region() {
        let mut capture = CapturedDocument::new();
        capture.push_text(1, 520.0, 20.0, "Hudson's Mill,");
        capture.push_text(1, 520.0, 30.0, "North Carolina");
        capture.push_text(1, 100.0, 20.0, "elsewhere");

        let region = Region::new(1, 0.0, 500.0, 40.0, 700.0);
        assert_eq!(
            capture.region_text(&region).as_deref(),
            Some("Hudson's Mill,\nNorth Carolina")
        );
    }

    #[test]
    fn test_region_text_empty_outside_blocks() {
        let mut capture = CapturedDocument::new();
        capture.push_text(2, 520.0, 20.0, "wrong page");

        let region = Region::new(1, 0.0, 500.0, 40.0, 700.0);
        assert!(capture.region_text(&region).is_none());
    }

    #[test]
    fn test_capture_json_round_trip() {
        let mut capture = CapturedDocument::new();
        capture.push_fragment(Fragment::with_rows(
            1,
            vec![vec![Cell::text("5555"), Cell::null()]],
        ));
        capture.push_text(1, 10.0, 60.0, "EFFECTIVE 10/07/24");

        let json = serde_json::to_string(&capture).unwrap();
        let back = CapturedDocument::from_json(&json).unwrap();
        assert_eq!(capture, back);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(CapturedDocument::from_json("{nope").is_err());
    }
}
