//! Fragment: one page-level raw table extraction result.

use super::Cell;
use serde::{Deserialize, Serialize};

/// A 2-D grid of cells extracted from one page.
///
/// Rows may be ragged: extraction noise splits and merges cells, so row
/// lengths within one fragment can differ. The aligner is responsible for
/// producing a uniform width downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// 1-based page number the fragment was extracted from
    pub page: u32,

    /// Rows of raw cells, in page order
    pub rows: Vec<Vec<Cell>>,
}

impl Fragment {
    /// Create an empty fragment for a page.
    pub fn new(page: u32) -> Self {
        Self {
            page,
            rows: Vec::new(),
        }
    }

    /// Create a fragment with rows.
    pub fn with_rows(page: u32, rows: Vec<Vec<Cell>>) -> Self {
        Self { page, rows }
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether the fragment has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_of_ragged_rows() {
        let fragment = Fragment::with_rows(
            1,
            vec![
                vec![Cell::text("a")],
                vec![Cell::text("b"), Cell::null(), Cell::text("c")],
                vec![],
            ],
        );
        assert_eq!(fragment.width(), 3);
        assert_eq!(fragment.row_count(), 3);
    }

    #[test]
    fn test_empty_fragment() {
        let fragment = Fragment::new(2);
        assert!(fragment.is_empty());
        assert_eq!(fragment.width(), 0);
    }
}
