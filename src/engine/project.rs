//! Schema projection.

use crate::config::LayoutConfig;
use crate::model::{DocumentMetadata, NormalizedRecord, Value};
use regex::Regex;

/// Projects a coerced, context-stamped row onto the canonical schema.
///
/// Extracted values occupy the leading schema positions; the remaining
/// columns are derived from propagation state, document metadata, and the
/// provenance tag. Output records always have exactly the schema's columns,
/// in its order.
#[derive(Debug)]
pub struct SchemaProjector {
    arity: usize,
    section_index: Option<usize>,
    location_index: Option<usize>,
    date_index: Option<usize>,
    source_index: Option<usize>,
    provenance: String,
    backfill: Option<CompiledBackfill>,
}

#[derive(Debug)]
struct CompiledBackfill {
    weight_index: usize,
    desc_index: usize,
    token: String,
    pattern: Regex,
}

impl SchemaProjector {
    /// Build a projector from a validated layout configuration.
    pub fn from_config(config: &LayoutConfig) -> Self {
        let position = |name: &Option<String>| {
            name.as_deref().and_then(|n| config.schema.position(n))
        };

        let backfill = config.weight_backfill.as_ref().and_then(|b| {
            let weight_index = config.schema.position(&b.weight_column)?;
            let desc_index = config.schema.position(&b.desc_column)?;
            let pattern =
                Regex::new(&format!(r"\d*\s*{}", regex::escape(&b.unit_token))).unwrap();
            Some(CompiledBackfill {
                weight_index,
                desc_index,
                token: b.unit_token.to_uppercase(),
                pattern,
            })
        });

        Self {
            arity: config.schema.arity(),
            section_index: position(&config.section_column),
            location_index: position(&config.location_column),
            date_index: position(&config.date_column),
            source_index: position(&config.source_column),
            provenance: config.provenance.clone(),
            backfill,
        }
    }

    /// Project one row. `values` holds the coerced extracted columns.
    pub fn project(
        &self,
        mut values: Vec<Value>,
        section: Option<&str>,
        metadata: &DocumentMetadata,
    ) -> NormalizedRecord {
        values.resize(self.arity, Value::Null);

        if let Some(index) = self.section_index {
            values[index] = match section {
                Some(section) => Value::text(section),
                None => Value::Null,
            };
        }
        if let Some(index) = self.location_index {
            values[index] = match &metadata.location {
                Some(location) => Value::text(location),
                None => Value::Null,
            };
        }
        if let Some(index) = self.date_index {
            values[index] = match metadata.effective_date {
                Some(date) => Value::text(date.format("%Y-%m-%d").to_string()),
                None => Value::Null,
            };
        }
        if let Some(index) = self.source_index {
            values[index] = Value::text(&self.provenance);
        }

        let mut record = NormalizedRecord::new(values);
        self.backfill_unit_weight(&mut record);
        record
    }

    /// Copy a `\d*\s*TOKEN` match from the description column into the
    /// weight column when the weight cell lacks the unit token.
    fn backfill_unit_weight(&self, record: &mut NormalizedRecord) {
        let Some(backfill) = &self.backfill else {
            return;
        };

        let has_token = record
            .get(backfill.weight_index)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_uppercase().contains(&backfill.token));
        if has_token {
            return;
        }

        let found = record
            .get(backfill.desc_index)
            .and_then(Value::as_str)
            .and_then(|desc| backfill.pattern.find(desc))
            .map(|m| m.as_str().trim().to_string());

        if let Some(weight) = found {
            if let Some(slot) = record.get_mut(backfill.weight_index) {
                *slot = Value::Text(weight);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use chrono::NaiveDate;

    fn projector() -> SchemaProjector {
        SchemaProjector::from_config(&LayoutConfig::vertical())
    }

    fn metadata() -> DocumentMetadata {
        DocumentMetadata::new(
            NaiveDate::from_ymd_opt(2024, 10, 7).unwrap(),
            "STATESVILLE NC",
        )
    }

    fn extracted(desc: &str, weight: &str) -> Vec<Value> {
        let mut values = vec![Value::Null; 16];
        values[0] = Value::text("5555");
        values[2] = Value::text(desc);
        values[4] = Value::text(weight);
        values[11] = Value::Number(-12.34);
        values
    }

    #[test]
    fn test_derived_columns_filled() {
        let record = projector().project(
            extracted("AQUAMAX FINGERLING", "50 LB"),
            Some("AQUACULTURE"),
            &metadata(),
        );

        assert_eq!(record.len(), 20);
        assert_eq!(record.get(16).unwrap().as_str(), Some("AQUACULTURE"));
        assert_eq!(record.get(17).unwrap().as_str(), Some("STATESVILLE NC"));
        assert_eq!(record.get(18).unwrap().as_str(), Some("2024-10-07"));
        assert_eq!(record.get(19).unwrap().as_str(), Some("pdf"));
    }

    #[test]
    fn test_missing_context_and_metadata_stay_null() {
        let record = projector().project(
            extracted("AQUAMAX FINGERLING 50 LB", "50 LB"),
            None,
            &DocumentMetadata::empty(),
        );
        assert!(record.get(16).unwrap().is_null());
        assert!(record.get(17).unwrap().is_null());
        assert!(record.get(18).unwrap().is_null());
        assert_eq!(record.get(19).unwrap().as_str(), Some("pdf"));
    }

    #[test]
    fn test_weight_backfilled_from_description() {
        let record = projector().project(
            extracted("AQUAMAX FINGERLING 300 50 LB", "300"),
            None,
            &metadata(),
        );
        assert_eq!(record.get(4).unwrap().as_str(), Some("50 LB"));
    }

    #[test]
    fn test_weight_kept_when_token_present() {
        let record = projector().project(
            extracted("AQUAMAX FINGERLING 300", "25 lb"),
            None,
            &metadata(),
        );
        assert_eq!(record.get(4).unwrap().as_str(), Some("25 lb"));
    }

    #[test]
    fn test_weight_unchanged_when_description_has_no_match() {
        let record = projector().project(
            extracted("AQUAMAX FINGERLING", "300"),
            None,
            &metadata(),
        );
        assert_eq!(record.get(4).unwrap().as_str(), Some("300"));
    }
}
