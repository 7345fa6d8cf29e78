//! Column alignment.

use crate::model::Cell;

/// Pads or merges ragged rows to a uniform column count.
///
/// Excess trailing cells are assumed to be overflow of the last (widest,
/// free-text) column and are re-joined with a single space rather than
/// truncated; missing trailing cells become nulls.
#[derive(Debug, Clone, Copy)]
pub struct ColumnAligner {
    arity: usize,
}

impl ColumnAligner {
    /// Create an aligner targeting the given column count.
    pub fn new(arity: usize) -> Self {
        Self { arity }
    }

    /// Align one row to exactly the target arity.
    pub fn align_row(&self, mut row: Vec<Cell>) -> Vec<Cell> {
        if row.len() < self.arity {
            row.resize(self.arity, Cell::null());
            return row;
        }
        if row.len() > self.arity {
            let excess: Vec<Cell> = row.split_off(self.arity);
            let last = row.pop().unwrap_or_else(Cell::null);
            row.push(Self::merge(last, excess));
        }
        row
    }

    fn merge(last: Cell, excess: Vec<Cell>) -> Cell {
        let mut parts: Vec<String> = Vec::new();
        if let Some(text) = last.into_text() {
            parts.push(text);
        }
        parts.extend(excess.into_iter().filter_map(Cell::into_text));

        if parts.is_empty() {
            Cell::null()
        } else {
            Cell::text(parts.join(" "))
        }
    }
}
