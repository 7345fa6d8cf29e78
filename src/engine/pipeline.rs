//! Pipeline orchestration.
//!
//! One `Pipeline` per layout family; one run per document. Each run is a
//! strictly forward pass over in-memory structures with no suspension
//! points, and no stage mutates its input in place, so a failure in one
//! stage cannot corrupt data an earlier stage already validated.

use crate::config::LayoutConfig;
use crate::engine::align::ColumnAligner;
use crate::engine::classify::{self, RowClassifier, RowLabel};
use crate::engine::context::ContextPropagator;
use crate::engine::filter::FragmentFilter;
use crate::engine::numeric::{CoercionCounters, NumericNormalizer};
use crate::engine::project::SchemaProjector;
use crate::error::{Error, Result};
use crate::extract::MetadataExtractor;
use crate::model::{Cell, DocumentMetadata, Fragment, RecordTable, Value};
use crate::schema::CanonicalSchema;
use crate::source::DocumentSource;
use std::cmp::Ordering;

/// Stage of one document's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// Fragments received
    Start,
    /// Unusable fragments dropped
    FragmentsFiltered,
    /// Rows padded/merged to uniform arity
    Aligned,
    /// Non-data rows stripped
    Classified,
    /// Numeric cells coerced
    NumericNormalized,
    /// Section context stamped
    ContextPropagated,
    /// Records projected onto the schema
    Projected,
    /// Run finished with a table
    Done,
    /// Terminal: zero fragments passed the filter
    Empty,
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Fragments supplied by the source
    pub fragments_seen: usize,
    /// Fragments rejected by the arity filter
    pub fragments_rejected: usize,
    /// Repeated header rows dropped
    pub header_rows: usize,
    /// Placeholder rows dropped
    pub placeholder_rows: usize,
    /// Section marker rows consumed
    pub section_rows: usize,
    /// Numeric cells absorbed as null
    pub unparseable_cells: usize,
    /// Records in the output table
    pub records: usize,
}

/// Transient aggregate of one document's processing. Owns nothing beyond
/// the stage marker and counters; all row data flows through the stages and
/// is discarded with the run.
#[derive(Debug)]
struct PipelineRun {
    stage: RunStage,
    stats: RunStats,
}

impl PipelineRun {
    fn new() -> Self {
        Self {
            stage: RunStage::Start,
            stats: RunStats::default(),
        }
    }

    fn advance(&mut self, stage: RunStage) {
        log::debug!("pipeline stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}

/// A row that survived classification.
enum StrippedRow {
    Data(Vec<Cell>),
    Marker(String),
}

/// A stripped row after numeric coercion.
enum StagedRow {
    Data(Vec<Value>),
    Marker(String),
}

/// Sequences the engine components over a document's fragment list and
/// merges the result into one schema-shaped table.
///
/// Construction validates the layout configuration once; a `Pipeline` is
/// then immutable and can process any number of documents, including
/// concurrently from multiple threads.
#[derive(Debug)]
pub struct Pipeline {
    config: LayoutConfig,
    filter: FragmentFilter,
    aligner: ColumnAligner,
    classifier: RowClassifier,
    normalizer: NumericNormalizer,
    projector: SchemaProjector,
    metadata_extractor: MetadataExtractor,
}

impl Pipeline {
    /// Build a pipeline for a layout family.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            filter: FragmentFilter::new(config.arity_rule),
            aligner: ColumnAligner::new(config.extracted_arity),
            classifier: RowClassifier::from_config(&config)?,
            normalizer: NumericNormalizer::from_config(&config),
            projector: SchemaProjector::from_config(&config),
            metadata_extractor: MetadataExtractor::from_config(&config),
            config,
        })
    }

    /// The layout configuration this pipeline was built from.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The canonical output schema.
    pub fn schema(&self) -> &CanonicalSchema {
        &self.config.schema
    }

    /// Read one document: extract metadata, then reconcile its fragments.
    pub fn read<S: DocumentSource + ?Sized>(&self, source: &S) -> Result<RecordTable> {
        self.read_with_stats(source).map(|(table, _)| table)
    }

    /// `read`, also returning the run counters.
    pub fn read_with_stats<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<(RecordTable, RunStats)> {
        let metadata = self.metadata_extractor.extract(source);
        let fragments = source.fragments()?;
        self.run_with_stats(fragments, &metadata)
    }

    /// Reconcile already-extracted fragments with known metadata.
    pub fn run(
        &self,
        fragments: Vec<Fragment>,
        metadata: &DocumentMetadata,
    ) -> Result<RecordTable> {
        self.run_with_stats(fragments, metadata)
            .map(|(table, _)| table)
    }

    /// `run`, also returning the run counters.
    pub fn run_with_stats(
        &self,
        fragments: Vec<Fragment>,
        metadata: &DocumentMetadata,
    ) -> Result<(RecordTable, RunStats)> {
        let mut run = PipelineRun::new();
        run.stats.fragments_seen = fragments.len();

        let usable: Vec<Fragment> = fragments
            .into_iter()
            .filter(|fragment| {
                if self.filter.accepts(fragment) {
                    true
                } else {
                    run.stats.fragments_rejected += 1;
                    log::debug!(
                        "rejected fragment on page {} (width {})",
                        fragment.page,
                        fragment.width()
                    );
                    false
                }
            })
            .collect();
        run.advance(RunStage::FragmentsFiltered);

        if usable.is_empty() {
            run.advance(RunStage::Empty);
            log::warn!("no usable fragments; returning an empty table");
            return Ok((RecordTable::new(self.config.schema.clone()), run.stats));
        }

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for fragment in usable {
            for row in fragment.rows {
                rows.push(self.aligner.align_row(row));
            }
        }
        run.advance(RunStage::Aligned);

        let mut kept: Vec<StrippedRow> = Vec::new();
        for row in rows {
            match self.classifier.classify(&row) {
                RowLabel::Header => run.stats.header_rows += 1,
                RowLabel::Placeholder => run.stats.placeholder_rows += 1,
                RowLabel::SectionMarker => {
                    run.stats.section_rows += 1;
                    if let Some(section) = classify::section_value(&row) {
                        kept.push(StrippedRow::Marker(section));
                    }
                }
                RowLabel::Data => kept.push(StrippedRow::Data(row)),
            }
        }
        run.advance(RunStage::Classified);

        let mut counters = CoercionCounters::new(self.config.extracted_arity);
        let staged: Vec<StagedRow> = kept
            .into_iter()
            .map(|row| match row {
                StrippedRow::Data(cells) => {
                    StagedRow::Data(self.normalizer.normalize_row(&cells, &mut counters))
                }
                StrippedRow::Marker(section) => StagedRow::Marker(section),
            })
            .collect();
        run.stats.unparseable_cells = counters.unparseable();
        run.advance(RunStage::NumericNormalized);

        if let Some(column) = counters.violation(&self.config.schema) {
            return Err(Error::SchemaViolation(format!(
                "numeric column '{column}' has no parseable values"
            )));
        }

        let mut propagator = ContextPropagator::new();
        let mut stamped: Vec<(Vec<Value>, Option<String>)> = Vec::new();
        for row in staged {
            match row {
                StagedRow::Marker(section) => propagator.set(section),
                StagedRow::Data(values) => {
                    stamped.push((values, propagator.current().map(str::to_owned)))
                }
            }
        }
        run.advance(RunStage::ContextPropagated);

        let mut table = RecordTable::new(self.config.schema.clone());
        for (values, section) in stamped {
            table.push(self.projector.project(values, section.as_deref(), metadata));
        }
        if let Some(name) = &self.config.sort_by {
            if let Some(index) = self.config.schema.position(name) {
                table
                    .records_mut()
                    .sort_by(|a, b| compare_values(a.get(index), b.get(index)));
            }
        }
        run.stats.records = table.len();
        run.advance(RunStage::Projected);

        run.advance(RunStage::Done);
        log::debug!(
            "run finished: {} records, {} of {} fragments rejected, {} unparseable cells",
            run.stats.records,
            run.stats.fragments_rejected,
            run.stats.fragments_seen,
            run.stats.unparseable_cells
        );
        Ok((table, run.stats))
    }
}

/// Sort ordering for output values: numbers, then text, nulls last.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            Some(Value::Number(_)) => 0,
            Some(Value::Text(_)) => 1,
            _ => 2,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Text(x)), Some(Value::Text(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArityRule, LayoutConfig};
    use crate::schema::CanonicalSchema;

    fn pipeline() -> Pipeline {
        Pipeline::new(LayoutConfig::vertical()).unwrap()
    }

    fn data_row(id: &str, price: &str) -> Vec<Cell> {
        let mut row = vec![Cell::null(); 16];
        row[0] = Cell::text(id);
        row[2] = Cell::text("TEST FEED");
        row[11] = Cell::text(price);
        row
    }

    #[test]
    fn test_empty_input_yields_schema_shaped_table() {
        let (table, stats) = pipeline()
            .run_with_stats(Vec::new(), &DocumentMetadata::empty())
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.schema().arity(), 20);
        assert_eq!(stats.fragments_seen, 0);
    }

    #[test]
    fn test_narrow_fragments_all_rejected() {
        let fragment = Fragment::with_rows(1, vec![vec![Cell::text("stray caption")]]);
        let (table, stats) = pipeline()
            .run_with_stats(vec![fragment], &DocumentMetadata::empty())
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(stats.fragments_rejected, 1);
    }

    #[test]
    fn test_section_propagation_across_rows() {
        let mut marker = vec![Cell::null(); 16];
        marker[0] = Cell::text("FISH");
        marker[1] = Cell::text("");

        let mut marker2 = vec![Cell::null(); 16];
        marker2[0] = Cell::text("SHRIMP");
        marker2[1] = Cell::text("");

        let fragment = Fragment::with_rows(
            1,
            vec![
                marker,
                data_row("100", "1.00"),
                data_row("200", "2.00"),
                marker2,
                data_row("300", "3.00"),
            ],
        );

        let table = pipeline()
            .run(vec![fragment], &DocumentMetadata::empty())
            .unwrap();
        let species = table.column("species").unwrap();
        assert_eq!(species[0].as_str(), Some("FISH"));
        assert_eq!(species[1].as_str(), Some("FISH"));
        assert_eq!(species[2].as_str(), Some("SHRIMP"));
    }

    #[test]
    fn test_rows_before_first_marker_have_null_section() {
        let fragment = Fragment::with_rows(1, vec![data_row("100", "1.00")]);
        let table = pipeline()
            .run(vec![fragment], &DocumentMetadata::empty())
            .unwrap();
        assert!(table.column("species").unwrap()[0].is_null());
    }

    #[test]
    fn test_schema_violation_when_numeric_column_never_parses() {
        let schema = CanonicalSchema::new().text("id").numeric("price");
        let config = LayoutConfig::new(schema).with_arity_rule(ArityRule::AtLeast(2));
        let pipeline = Pipeline::new(config).unwrap();

        let fragment = Fragment::with_rows(
            1,
            vec![
                vec![Cell::text("1"), Cell::text("N/A")],
                vec![Cell::text("2"), Cell::text("TBD")],
            ],
        );
        let result = pipeline.run(vec![fragment], &DocumentMetadata::empty());
        assert!(matches!(result, Err(Error::SchemaViolation(_))));
    }

    #[test]
    fn test_single_unparseable_cell_is_absorbed() {
        let schema = CanonicalSchema::new().text("id").numeric("price");
        let config = LayoutConfig::new(schema).with_arity_rule(ArityRule::AtLeast(2));
        let pipeline = Pipeline::new(config).unwrap();

        let fragment = Fragment::with_rows(
            1,
            vec![
                vec![Cell::text("1"), Cell::text("N/A")],
                vec![Cell::text("2"), Cell::text("4.50")],
            ],
        );
        let (table, stats) = pipeline
            .run_with_stats(vec![fragment], &DocumentMetadata::empty())
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(stats.unparseable_cells, 1);
        assert!(table.records()[0].get(1).unwrap().is_null());
        assert_eq!(table.records()[1].get(1).unwrap().as_f64(), Some(4.5));
    }

    #[test]
    fn test_sort_by_orders_records_with_nulls_last() {
        let schema = CanonicalSchema::new().text("id").numeric("price");
        let config = LayoutConfig::new(schema)
            .with_arity_rule(ArityRule::AtLeast(2))
            .with_sort_by("id");
        let pipeline = Pipeline::new(config).unwrap();

        let fragment = Fragment::with_rows(
            1,
            vec![
                vec![Cell::text("300"), Cell::text("1")],
                vec![Cell::text(""), Cell::text("2")],
                vec![Cell::text("100"), Cell::text("3")],
            ],
        );
        let table = pipeline
            .run(vec![fragment], &DocumentMetadata::empty())
            .unwrap();
        let ids: Vec<Option<&str>> = table
            .records()
            .iter()
            .map(|r| r.get(0).unwrap().as_str())
            .collect();
        assert_eq!(ids, vec![Some("100"), Some("300"), None]);
    }
}
