use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::error::{CleanError, Result};
use crate::model::Table;

/// Write a table to `<filename>.json` in the requested orientation:
/// `records` (array of row objects), `columns` (column name to an object
/// of row-index strings), or `values` (array of row arrays).
pub fn write_json(table: &Table, format: &str, filename: &str) -> Result<PathBuf> {
    if table.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    if format.is_empty() {
        return Err(CleanError::EmptyArgument("format"));
    }
    if filename.is_empty() {
        return Err(CleanError::EmptyArgument("filename"));
    }

    let rendered = match format {
        "records" => records(table),
        "columns" => columns(table),
        "values" => values(table),
        other => return Err(CleanError::UnknownFormat(other.to_string())),
    };

    let path = PathBuf::from(format!("{filename}.json"));
    let file = File::create(&path)?;
    serde_json::to_writer(BufWriter::new(file), &rendered)?;

    log::debug!("wrote {} rows to {}", table.height(), path.display());
    Ok(path)
}

fn records(table: &Table) -> Value {
    let rows: Vec<Value> = table
        .rows()
        .map(|row| {
            let mut object = Map::new();
            for (name, cell) in table.columns().iter().zip(row) {
                object.insert(name.clone(), cell.clone());
            }
            Value::Object(object)
        })
        .collect();
    Value::Array(rows)
}

fn columns(table: &Table) -> Value {
    let mut object = Map::new();
    for (index, name) in table.columns().iter().enumerate() {
        let mut cells = Map::new();
        for (row_index, row) in table.rows().enumerate() {
            cells.insert(row_index.to_string(), row[index].clone());
        }
        object.insert(name.clone(), Value::Object(cells));
    }
    Value::Object(object)
}

fn values(table: &Table) -> Value {
    Value::Array(
        table
            .rows()
            .map(|row| Value::Array(row.to_vec()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample_table() -> Table {
        let mut table = Table::new(vec!["id".to_string(), "email_anon".to_string()]);
        table.push_row(vec![json!(1), json!("YUBiLmNvbQ==")]);
        table.push_row(vec![json!(2), json!(null)]);
        table
    }

    #[test]
    fn test_records_orientation() {
        let dir = tempdir().unwrap();
        let stem = dir.path().join("output");
        let path = write_json(&sample_table(), "records", stem.to_str().unwrap()).unwrap();
        assert!(path.to_string_lossy().ends_with("output.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            parsed,
            json!([
                {"id": 1, "email_anon": "YUBiLmNvbQ=="},
                {"id": 2, "email_anon": null},
            ])
        );
        // Cells keep column order in the rendered text.
        assert!(written.starts_with(r#"[{"id":1,"#));
    }

    #[test]
    fn test_columns_orientation() {
        let dir = tempdir().unwrap();
        let stem = dir.path().join("output");
        let path = write_json(&sample_table(), "columns", stem.to_str().unwrap()).unwrap();

        let parsed: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["id"], json!({"0": 1, "1": 2}));
    }

    #[test]
    fn test_values_orientation() {
        let dir = tempdir().unwrap();
        let stem = dir.path().join("output");
        let path = write_json(&sample_table(), "values", stem.to_str().unwrap()).unwrap();

        let parsed: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, json!([[1, "YUBiLmNvbQ=="], [2, null]]));
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            write_json(&sample_table(), "sideways", "out"),
            Err(CleanError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_empty_arguments() {
        assert!(matches!(
            write_json(&sample_table(), "", "out"),
            Err(CleanError::EmptyArgument("format"))
        ));
        assert!(matches!(
            write_json(&sample_table(), "records", ""),
            Err(CleanError::EmptyArgument("filename"))
        ));
    }

    #[test]
    fn test_empty_table_is_domain_error() {
        let table = Table::new(vec!["id".to_string()]);
        assert!(matches!(
            write_json(&table, "records", "out"),
            Err(CleanError::EmptyTable)
        ));
    }
}
