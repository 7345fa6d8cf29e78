//! Cell primitive.

use serde::{Deserialize, Serialize};

/// A single extracted cell: raw text, or explicitly absent.
///
/// Absence is distinct from an empty string. Extraction produces blanks for
/// cells a page simply does not have, while a zero-length string is a cell
/// that exists but carries no characters; row classification counts them
/// differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell(Option<String>);

impl Cell {
    /// Create a cell holding text.
    pub fn text(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    /// Create an absent cell.
    pub fn null() -> Self {
        Self(None)
    }

    /// Whether the cell is absent.
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// The raw text, if present.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The text with surrounding whitespace removed, if present.
    pub fn trimmed(&self) -> Option<&str> {
        self.0.as_deref().map(str::trim)
    }

    /// Consume the cell and return its text, if present.
    pub fn into_text(self) -> Option<String> {
        self.0
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_vs_empty() {
        assert!(Cell::null().is_null());
        assert!(!Cell::text("").is_null());
        assert_eq!(Cell::text("").as_str(), Some(""));
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(Cell::text("  BAG  ").trimmed(), Some("BAG"));
        assert_eq!(Cell::null().trimmed(), None);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&vec![Cell::text("5555"), Cell::null()]).unwrap();
        assert_eq!(json, r#"["5555",null]"#);

        let cells: Vec<Cell> = serde_json::from_str(r#"["a",null,""]"#).unwrap();
        assert_eq!(cells, vec![Cell::text("a"), Cell::null(), Cell::text("")]);
    }
}
