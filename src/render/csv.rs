//! CSV rendering.

use crate::error::{Error, Result};
use crate::model::RecordTable;

/// Render a table as CSV: one header row of canonical column names, then
/// one line per record. Nulls become empty fields.
pub fn to_csv(table: &RecordTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table.schema().names())?;
    for record in table.records() {
        writer.write_record(record.values().iter().map(|v| v.to_field()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Render(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NormalizedRecord, Value};
    use crate::schema::CanonicalSchema;

    #[test]
    fn test_csv_header_and_rows() {
        let schema = CanonicalSchema::new().text("product_desc").numeric("list_price");
        let mut table = RecordTable::new(schema);
        table.push(NormalizedRecord::new(vec![
            Value::text("AQUAMAX FINGERLING"),
            Value::Number(-12.34),
        ]));
        table.push(NormalizedRecord::new(vec![Value::text("MEAL"), Value::Null]));

        let csv = to_csv(&table).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "product_desc,list_price");
        assert_eq!(lines[1], "AQUAMAX FINGERLING,-12.34");
        assert_eq!(lines[2], "MEAL,");
    }

    #[test]
    fn test_empty_table_renders_header_only() {
        let schema = CanonicalSchema::new().text("a").text("b");
        let csv = to_csv(&RecordTable::new(schema)).unwrap();
        assert_eq!(csv.trim_end(), "a,b");
    }
}
