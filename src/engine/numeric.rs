//! Numeric normalization.
//!
//! Source documents mix two typographic conventions for negative prices
//! across layout generations: accountant parentheses `(1,234.56)` and a
//! trailing hyphen `1234.56-`. Which one appears is not known in advance,
//! so both are always handled.

use crate::config::LayoutConfig;
use crate::model::{Cell, Value};
use crate::schema::{CanonicalSchema, ColumnKind};

/// Parse a raw numeric-looking cell into a signed value.
///
/// Thousands separators are stripped first. Parenthesized and
/// trailing-hyphen text negates; anything else gets a direct parse. `None`
/// means unparseable, which the pipeline treats as a recoverable per-cell
/// condition, never a fragment-level failure.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let text = raw.trim().replace(',', "");
    if text.is_empty() {
        return None;
    }

    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().map(|v| -v);
    }
    if let Some(body) = text.strip_suffix('-') {
        return body.trim().parse::<f64>().ok().map(|v| -v);
    }
    text.parse::<f64>().ok()
}

/// Per-column coercion bookkeeping for one run.
///
/// Tracks, for every extracted column, how many non-blank cells a numeric
/// parse was attempted on and how many succeeded. A numeric column where
/// every attempt failed means the schema itself disagrees with the data.
#[derive(Debug, Clone)]
pub struct CoercionCounters {
    attempted: Vec<usize>,
    parsed: Vec<usize>,
}

impl CoercionCounters {
    /// Counters for the given extracted arity.
    pub fn new(arity: usize) -> Self {
        Self {
            attempted: vec![0; arity],
            parsed: vec![0; arity],
        }
    }

    fn record(&mut self, column: usize, ok: bool) {
        self.attempted[column] += 1;
        if ok {
            self.parsed[column] += 1;
        }
    }

    /// Total unparseable cells across all columns.
    pub fn unparseable(&self) -> usize {
        self.attempted
            .iter()
            .zip(&self.parsed)
            .map(|(a, p)| a - p)
            .sum()
    }

    /// Name of the first numeric column whose non-blank cells all failed to
    /// parse, if any.
    pub fn violation(&self, schema: &CanonicalSchema) -> Option<String> {
        self.attempted
            .iter()
            .zip(&self.parsed)
            .enumerate()
            .find(|(_, (attempted, parsed))| **attempted > 0 && **parsed == 0)
            .and_then(|(i, _)| schema.column(i).map(|c| c.name.clone()))
    }
}

/// Coerces the extracted cells of a data row into typed values, honoring
/// the declared kind of each column.
#[derive(Debug)]
pub struct NumericNormalizer {
    kinds: Vec<ColumnKind>,
}

impl NumericNormalizer {
    /// Build a normalizer covering the extracted columns of a layout.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            kinds: config
                .schema
                .columns()
                .iter()
                .take(config.extracted_arity)
                .map(|c| c.kind)
                .collect(),
        }
    }

    /// Number of extracted columns covered.
    pub fn arity(&self) -> usize {
        self.kinds.len()
    }

    /// Coerce one aligned row. Text columns trim; numeric columns parse,
    /// with failures recorded and absorbed as nulls.
    pub fn normalize_row(&self, row: &[Cell], counters: &mut CoercionCounters) -> Vec<Value> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let cell = row.get(i);
                match kind {
                    ColumnKind::Text => match cell.and_then(|c| c.trimmed()) {
                        Some(text) if !text.is_empty() => Value::text(text),
                        _ => Value::Null,
                    },
                    ColumnKind::Numeric => match cell.and_then(|c| c.trimmed()) {
                        Some(text) if !text.is_empty() => match parse_numeric(text) {
                            Some(number) => {
                                counters.record(i, true);
                                Value::Number(number)
                            }
                            None => {
                                counters.record(i, false);
                                log::debug!("unparseable numeric cell '{text}' in column {i}");
                                Value::Null
                            }
                        },
                        _ => Value::Null,
                    },
                }
            })
            .collect()
    }
}
