//! # tabmend
//!
//! Fragment reconciliation engine for paginated price sheets.
//!
//! Page extraction of loosely-structured tabular documents yields ragged,
//! noisy page-level fragments: repeated headers, stray placeholder rows,
//! category banners interleaved with data, and two competing typographic
//! conventions for negative prices. This library reconciles those fragments
//! into a single schema-conformant table of typed records, enriched with
//! per-document metadata read from the first page.
//!
//! ## Quick Start
//!
//! ```
//! use tabmend::{Cell, CapturedDocument, Fragment, LayoutConfig, Pipeline};
//!
//! fn main() -> tabmend::Result<()> {
//!     let pipeline = Pipeline::new(LayoutConfig::vertical())?;
//!
//!     let mut fragment = Fragment::new(1);
//!     let mut row = vec![Cell::null(); 16];
//!     row[0] = Cell::text("5555");
//!     row[2] = Cell::text("AQUAMAX FINGERLING");
//!     row[11] = Cell::text("(12.34)");
//!     fragment.push_row(row);
//!
//!     let mut capture = CapturedDocument::new();
//!     capture.push_fragment(fragment);
//!
//!     let table = pipeline.read(&capture)?;
//!     assert_eq!(table.len(), 1);
//!     assert_eq!(table.column("list_price").unwrap()[0].as_f64(), Some(-12.34));
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Explicit configuration, no guessing**: each document layout family is
//!   a [`LayoutConfig`] (schema, arity, header tokens, metadata regions)
//!   selected by the caller, never inferred by trial-and-error.
//! - **Anomalies absorb, configuration errors surface**: rejected fragments,
//!   unparseable cells, and missing metadata become nulls; only an
//!   inconsistent schema or configuration is fatal.
//! - **Always schema-shaped output**: a document with no usable fragments
//!   produces a typed zero-row table, not an error.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;
pub mod schema;
pub mod sink;
pub mod source;

// Re-export commonly used types
pub use config::{ArityRule, LayoutConfig, Region, WeightBackfill};
pub use engine::{Pipeline, RowLabel, RunStage, RunStats};
pub use error::{Error, Result};
pub use extract::MetadataExtractor;
pub use model::{Cell, DocumentMetadata, Fragment, NormalizedRecord, RecordTable, Value};
pub use render::{to_csv, to_json, JsonFormat};
pub use schema::{CanonicalSchema, Column, ColumnKind};
pub use sink::{CsvFileSink, TableSink};
pub use source::{CapturedDocument, DocumentSource, PlacedText};

use rayon::prelude::*;
use std::path::Path;

/// Read one document with a layout configuration.
///
/// Builds a pipeline, extracts metadata, and reconciles the document's
/// fragments into a schema-shaped table.
///
/// # Example
///
/// ```no_run
/// use tabmend::{read_capture_file, LayoutConfig};
///
/// let table = read_capture_file("document.json", LayoutConfig::horizontal()).unwrap();
/// println!("{} records", table.len());
/// ```
pub fn read_document<S: DocumentSource + ?Sized>(
    source: &S,
    config: LayoutConfig,
) -> Result<RecordTable> {
    Pipeline::new(config)?.read(source)
}

/// Read a captured document from a JSON file.
pub fn read_capture_file<P: AsRef<Path>>(path: P, config: LayoutConfig) -> Result<RecordTable> {
    let capture = CapturedDocument::from_path(path)?;
    read_document(&capture, config)
}

/// Read a batch of documents in parallel, one independent pipeline run per
/// document. The configuration is validated once and shared read-only.
pub fn read_documents<S: DocumentSource + Sync>(
    sources: &[S],
    config: LayoutConfig,
) -> Result<Vec<RecordTable>> {
    let pipeline = Pipeline::new(config)?;
    sources
        .par_iter()
        .map(|source| pipeline.read(source))
        .collect()
}
