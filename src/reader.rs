use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;

use crate::error::{CleanError, Result};
use crate::model::Table;

/// Read a newline-delimited JSON file into a table.
///
/// Each non-blank line must be a JSON object. The column list is the
/// union of keys across all records in first-seen order; a record
/// missing a key gets a null cell.
pub fn read_ndjson(path: &Path) -> Result<Table> {
    let file = File::open(path)?;
    read_ndjson_from(BufReader::new(file))
}

/// Read newline-delimited JSON records from any buffered source.
pub fn read_ndjson_from<R: BufRead>(input: R) -> Result<Table> {
    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<Vec<Value>> = Vec::new();

    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(&line)?;
        let object = match value {
            Value::Object(map) => map,
            _ => return Err(CleanError::NotAnObject(line_no + 1)),
        };

        let mut row = vec![Value::Null; columns.len()];
        for (key, cell) in object {
            let position = match index.get(&key) {
                Some(&position) => position,
                None => {
                    // New column: pad every earlier row with a null cell.
                    let position = columns.len();
                    index.insert(key.clone(), position);
                    columns.push(key);
                    for earlier in &mut rows {
                        earlier.push(Value::Null);
                    }
                    row.push(Value::Null);
                    position
                }
            };
            row[position] = cell;
        }

        rows.push(row);
    }

    log::debug!("loaded {} rows over {} columns", rows.len(), columns.len());
    Ok(Table::from_parts(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_read_basic_records() {
        let input = concat!(
            r#"{"id": 1, "email": "a@b.com"}"#,
            "\n",
            r#"{"id": 2, "email": "c@d.com"}"#,
            "\n",
        );
        let table = read_ndjson_from(Cursor::new(input)).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.columns(), &["id", "email"]);
        assert_eq!(table.cell(1, 0), &json!(2));
    }

    #[test]
    fn test_column_union_pads_with_nulls() {
        let input = concat!(
            r#"{"id": 1}"#,
            "\n",
            r#"{"id": 2, "location": "China"}"#,
            "\n",
        );
        let table = read_ndjson_from(Cursor::new(input)).unwrap();
        assert_eq!(table.columns(), &["id", "location"]);
        // The first row predates the location column.
        assert_eq!(table.cell(0, 1), &Value::Null);
        assert_eq!(table.cell(1, 1), &json!("China"));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let input = "\n{\"id\": 1}\n\n{\"id\": 2}\n\n";
        let table = read_ndjson_from(Cursor::new(input)).unwrap();
        assert_eq!(table.height(), 2);
    }

    #[test]
    fn test_non_object_line_rejected() {
        let input = "{\"id\": 1}\n[1, 2, 3]\n";
        let err = read_ndjson_from(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, CleanError::NotAnObject(2)));
    }

    #[test]
    fn test_malformed_json_propagates() {
        let input = "{\"id\": 1}\n{not json}\n";
        let err = read_ndjson_from(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, CleanError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_ndjson(Path::new("no_such_file.json")).unwrap_err();
        assert!(matches!(err, CleanError::Io(_)));
    }
}
