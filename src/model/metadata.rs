//! Per-document metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata read once from a fixed region of a document's first page and
/// attached uniformly to every record produced from that document.
///
/// Both fields are best-effort: extraction failures leave them `None` and
/// never block record production.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Effective date printed on the first page
    pub effective_date: Option<NaiveDate>,

    /// Plant/location string from the first-page header
    pub location: Option<String>,
}

impl DocumentMetadata {
    /// Metadata with both fields absent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create metadata with both fields present.
    pub fn new(effective_date: NaiveDate, location: impl Into<String>) -> Self {
        Self {
            effective_date: Some(effective_date),
            location: Some(location.into()),
        }
    }

    /// Whether neither field was extracted.
    pub fn is_empty(&self) -> bool {
        self.effective_date.is_none() && self.location.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metadata() {
        let metadata = DocumentMetadata::empty();
        assert!(metadata.is_empty());
        assert!(metadata.effective_date.is_none());
    }

    #[test]
    fn test_populated_metadata() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 7).unwrap();
        let metadata = DocumentMetadata::new(date, "STATESVILLE NC");
        assert!(!metadata.is_empty());
        assert_eq!(metadata.location.as_deref(), Some("STATESVILLE NC"));
    }
}
