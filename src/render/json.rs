//! JSON rendering.

use crate::error::{Error, Result};
use crate::model::RecordTable;
use serde_json::{Map, Value as Json};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormat {
    /// Pretty-printed with indentation
    Pretty,
    /// Compact single-line
    Compact,
}

/// Render a table as a JSON array of objects keyed by canonical column
/// name, preserving column order within each object.
pub fn to_json(table: &RecordTable, format: JsonFormat) -> Result<String> {
    let names = table.schema().names();
    let rows: Vec<Json> = table
        .records()
        .iter()
        .map(|record| {
            let mut object = Map::new();
            for (name, value) in names.iter().zip(record.values()) {
                let json = serde_json::to_value(value)
                    .map_err(|e| Error::Render(e.to_string()))?;
                object.insert((*name).to_string(), json);
            }
            Ok(Json::Object(object))
        })
        .collect::<Result<_>>()?;

    let output = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&rows),
        JsonFormat::Compact => serde_json::to_string(&rows),
    };
    output.map_err(|e| Error::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NormalizedRecord, Value};
    use crate::schema::CanonicalSchema;

    #[test]
    fn test_json_objects_keyed_by_column() {
        let schema = CanonicalSchema::new().text("product_desc").numeric("list_price");
        let mut table = RecordTable::new(schema);
        table.push(NormalizedRecord::new(vec![
            Value::text("FEED"),
            Value::Number(-5.0),
        ]));

        let json = to_json(&table, JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"[{"product_desc":"FEED","list_price":-5.0}]"#);
    }

    #[test]
    fn test_null_values_serialize_as_null() {
        let schema = CanonicalSchema::new().text("a");
        let mut table = RecordTable::new(schema);
        table.push(NormalizedRecord::new(vec![Value::Null]));

        let json = to_json(&table, JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"[{"a":null}]"#);
    }

    #[test]
    fn test_empty_table_is_empty_array() {
        let schema = CanonicalSchema::new().text("a");
        let json = to_json(&RecordTable::new(schema), JsonFormat::Compact).unwrap();
        assert_eq!(json, "[]");
    }
}
