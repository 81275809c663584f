//! Row hydration: database rows into clean records
//!
//! Every column is read as a dynamic value and folded into the record's
//! string form, so integer affinity columns round-trip as decimal strings.

use feedstore_core::model::Record;
use rusqlite::types::Value;
use rusqlite::Row;

/// Canonical string form of a stored value; NULL becomes `""`
pub fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s,
        Value::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
    }
}

/// Build a clean record from a row, keyed by `columns` in result order
pub fn row_to_record(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<Record> {
    let mut values = Vec::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        let value: Value = row.get(index)?;
        values.push((column.clone(), value_to_string(value)));
    }
    Ok(Record::from_existing(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(Value::Null), "");
        assert_eq!(value_to_string(Value::Integer(600)), "600");
        assert_eq!(value_to_string(Value::Real(1.5)), "1.5");
        assert_eq!(value_to_string(Value::Text("x".to_string())), "x");
        assert_eq!(value_to_string(Value::Blob(b"abc".to_vec())), "abc");
    }

    #[test]
    fn test_row_to_record_is_clean() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT 'f1' AS id, 42 AS views, NULL AS memo").unwrap();
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let record = stmt
            .query_row([], |row| row_to_record(row, &columns))
            .unwrap();

        assert!(!record.is_dirty());
        assert_eq!(record.get("id"), "f1");
        assert_eq!(record.get("views"), "42");
        assert_eq!(record.get("memo"), "");
    }
}
