//! Canonical schema: the fixed, ordered column list all output records
//! conform to.

use serde::{Deserialize, Serialize};

/// Value kind of a canonical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// String representation
    Text,
    /// Signed floating value
    Numeric,
}

/// One canonical column: name plus declared value kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Declared value kind
    pub kind: ColumnKind,
}

impl Column {
    /// Create a column.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered mapping from column name to value kind.
///
/// Fixed and injected as configuration; defines both output column order and
/// per-column type coercion. Every output record has exactly these columns,
/// in this order, never fewer or extra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSchema {
    columns: Vec<Column>,
}

impl CanonicalSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Append a text column.
    pub fn text(mut self, name: impl Into<String>) -> Self {
        self.columns.push(Column::new(name, ColumnKind::Text));
        self
    }

    /// Append a numeric column.
    pub fn numeric(mut self, name: impl Into<String>) -> Self {
        self.columns.push(Column::new(name, ColumnKind::Numeric));
        self
    }

    /// Number of columns.
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// All columns, in canonical order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column at a position.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Position of a column by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Whether a column with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Declared kind of the column at a position.
    pub fn kind_of(&self, index: usize) -> Option<ColumnKind> {
        self.columns.get(index).map(|c| c.kind)
    }

    /// Column names, in canonical order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Default for CanonicalSchema {
    fn default() -> Self {
        Self::new()
    }
}
