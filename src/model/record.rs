//! Typed output values, records, and the result table.

use crate::schema::CanonicalSchema;
use serde::{Deserialize, Serialize};

/// A typed cell of the output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value
    Null,
    /// Signed floating value of a numeric column
    Number(f64),
    /// Text value
    Text(String),
}

impl Value {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// Whether the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The text value, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Flat textual rendering: empty string for null, `to_string` for numbers.
    pub fn to_field(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

/// One data row after numeric coercion, context propagation, and schema
/// projection. Immutable once produced; values are in canonical column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    values: Vec<Value>,
}

impl NormalizedRecord {
    /// Create a record from values already in canonical order.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// All values, in canonical column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at a column position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }
}

/// The single output table of a document: schema plus records.
///
/// Always schema-shaped. A document with no usable fragments produces a
/// zero-row table, never an error, so callers can distinguish "ran
/// successfully, found nothing" from a hard failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordTable {
    schema: CanonicalSchema,
    records: Vec<NormalizedRecord>,
}

impl RecordTable {
    /// Create an empty table for a schema.
    pub fn new(schema: CanonicalSchema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// The canonical schema of this table.
    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    /// All records.
    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record. The record must already match the schema arity.
    pub fn push(&mut self, record: NormalizedRecord) {
        debug_assert_eq!(record.len(), self.schema.arity());
        self.records.push(record);
    }

    /// All values of one column, by name.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.schema.position(name)?;
        Some(self.records.iter().filter_map(|r| r.get(index)).collect())
    }

    pub(crate) fn records_mut(&mut self) -> &mut Vec<NormalizedRecord> {
        &mut self.records
    }
}
