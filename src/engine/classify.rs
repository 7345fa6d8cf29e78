//! Row classification.

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::model::Cell;
use regex::Regex;

/// Label assigned to every aligned row. Exactly one label per row; the label
/// is a pure function of row content and configuration, never of position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLabel {
    /// A real record row
    Data,
    /// The column header re-emitted by paginated extraction
    Header,
    /// A single-value noise row carrying no record data
    Placeholder,
    /// A category banner applying to subsequent data rows
    SectionMarker,
}

/// Labels aligned rows.
///
/// Checks apply in fixed precedence order: header, placeholder, section
/// marker, data. Ambiguity between a stray header fragment and real data is
/// resolved by that order, not guessed per document.
#[derive(Debug)]
pub struct RowClassifier {
    header_tokens: Vec<String>,
    id_pattern: Regex,
}

impl RowClassifier {
    /// Build a classifier from a layout configuration.
    pub fn from_config(config: &LayoutConfig) -> Result<Self> {
        let id_pattern = Regex::new(&config.id_pattern)
            .map_err(|e| Error::InvalidConfig(format!("bad identifier pattern: {e}")))?;
        Ok(Self {
            header_tokens: config
                .header_tokens
                .iter()
                .map(|t| t.to_uppercase())
                .collect(),
            id_pattern,
        })
    }

    /// Classify one aligned row.
    pub fn classify(&self, row: &[Cell]) -> RowLabel {
        if self.is_header(row) {
            return RowLabel::Header;
        }
        if Self::is_placeholder(row) {
            return RowLabel::Placeholder;
        }
        if self.is_section_marker(row) {
            return RowLabel::SectionMarker;
        }
        RowLabel::Data
    }

    /// Each configured token must prefix the corresponding leading cell,
    /// case-insensitively. Pagination re-emits the header on every page.
    fn is_header(&self, row: &[Cell]) -> bool {
        !self.header_tokens.is_empty()
            && self.header_tokens.iter().enumerate().all(|(i, token)| {
                row.get(i)
                    .and_then(Cell::trimmed)
                    .map(|text| text.to_uppercase().starts_with(token))
                    .unwrap_or(false)
            })
    }

    /// Exactly one non-null cell among two or more columns.
    fn is_placeholder(row: &[Cell]) -> bool {
        row.len() > 1 && row.iter().filter(|c| !c.is_null()).count() == 1
    }

    /// Leading cell present but not a record identifier.
    fn is_section_marker(&self, row: &[Cell]) -> bool {
        match row.first().and_then(Cell::trimmed) {
            Some(text) => !text.is_empty() && !self.id_pattern.is_match(text),
            None => false,
        }
    }
}

/// Normalized section value of a marker row: the leading-cell text,
/// upper-cased with commas stripped.
pub fn section_value(row: &[Cell]) -> Option<String> {
    row.first()
        .and_then(Cell::trimmed)
        .filter(|text| !text.is_empty())
        .map(|text| text.replace(',', "").to_uppercase())
}
