use serde::Deserialize;
use serde_json::Value;

use crate::error::{CleanError, Result};
use crate::model::Table;

/// One element of a `widget_list` cell. Fields stay as raw JSON values so
/// an unusual amount (say, a string) survives into the output unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
struct WidgetEntry {
    name: Option<Value>,
    amount: Option<Value>,
}

/// Expand `widget_list` into one row per element. Every other cell is
/// duplicated onto the emitted rows; the element's `name` and `amount`
/// populate two new columns, `widget_name` before `widget_amount`,
/// appended after the remaining columns. A row with an empty or missing
/// list yields a single row with null widget cells: the user has no
/// widgets.
pub fn flatten_widgets(table: &Table) -> Result<Table> {
    if table.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    let widget_list = table.require_column("widget_list")?;

    let mut columns: Vec<String> = table
        .columns()
        .iter()
        .filter(|name| name.as_str() != "widget_list")
        .cloned()
        .collect();
    columns.push("widget_name".to_string());
    columns.push("widget_amount".to_string());

    let mut flat = Table::new(columns);
    for row in table.rows() {
        let base: Vec<Value> = row
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != widget_list)
            .map(|(_, cell)| cell.clone())
            .collect();

        match &row[widget_list] {
            Value::Array(entries) if !entries.is_empty() => {
                for entry in entries {
                    let widget: WidgetEntry =
                        serde_json::from_value(entry.clone()).unwrap_or_default();
                    let mut out = base.clone();
                    out.push(widget.name.unwrap_or(Value::Null));
                    out.push(widget.amount.unwrap_or(Value::Null));
                    flat.push_row(out);
                }
            }
            _ => {
                let mut out = base.clone();
                out.push(Value::Null);
                out.push(Value::Null);
                flat.push_row(out);
            }
        }
    }

    log::debug!(
        "flattened {} rows into {}",
        table.height(),
        flat.height()
    );
    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table_with_widgets(widgets: Vec<Value>) -> Table {
        let mut table = Table::new(vec![
            "id".to_string(),
            "widget_list".to_string(),
            "location".to_string(),
        ]);
        for (index, list) in widgets.into_iter().enumerate() {
            table.push_row(vec![json!(index as i64 + 1), list, json!("China")]);
        }
        table
    }

    #[test]
    fn test_one_row_per_widget() {
        let table = table_with_widgets(vec![json!([
            {"name": "gear", "amount": 2},
            {"name": "gadget", "amount": 5},
        ])]);
        let flat = flatten_widgets(&table).unwrap();
        assert_eq!(flat.height(), 2);

        let name = flat.require_column("widget_name").unwrap();
        let amount = flat.require_column("widget_amount").unwrap();
        assert_eq!(flat.cell(0, name), &json!("gear"));
        assert_eq!(flat.cell(0, amount), &json!(2));
        assert_eq!(flat.cell(1, name), &json!("gadget"));

        // Shared cells are duplicated onto each emitted row.
        let id = flat.require_column("id").unwrap();
        assert_eq!(flat.cell(0, id), flat.cell(1, id));
    }

    #[test]
    fn test_empty_list_yields_placeholder_row() {
        let table = table_with_widgets(vec![json!([])]);
        let flat = flatten_widgets(&table).unwrap();
        assert_eq!(flat.height(), 1);
        let name = flat.require_column("widget_name").unwrap();
        let amount = flat.require_column("widget_amount").unwrap();
        assert_eq!(flat.cell(0, name), &Value::Null);
        assert_eq!(flat.cell(0, amount), &Value::Null);
    }

    #[test]
    fn test_null_list_yields_placeholder_row() {
        let table = table_with_widgets(vec![json!(null)]);
        let flat = flatten_widgets(&table).unwrap();
        assert_eq!(flat.height(), 1);
    }

    #[test]
    fn test_row_counts_sum_per_row() {
        let table = table_with_widgets(vec![
            json!([{"name": "a", "amount": 1}]),
            json!([]),
            json!([{"name": "b", "amount": 2}, {"name": "c", "amount": 3}]),
        ]);
        let flat = flatten_widgets(&table).unwrap();
        // max(1, widgets) per input row: 1 + 1 + 2.
        assert_eq!(flat.height(), 4);
    }

    #[test]
    fn test_column_order() {
        let table = table_with_widgets(vec![json!([])]);
        let flat = flatten_widgets(&table).unwrap();
        assert_eq!(
            flat.columns(),
            &["id", "location", "widget_name", "widget_amount"]
        );
    }

    #[test]
    fn test_partial_entries() {
        let table = table_with_widgets(vec![json!([{"name": "solo"}])]);
        let flat = flatten_widgets(&table).unwrap();
        let name = flat.require_column("widget_name").unwrap();
        let amount = flat.require_column("widget_amount").unwrap();
        assert_eq!(flat.cell(0, name), &json!("solo"));
        assert_eq!(flat.cell(0, amount), &Value::Null);
    }

    #[test]
    fn test_empty_table_is_domain_error() {
        let table = Table::new(vec!["widget_list".to_string()]);
        assert!(matches!(
            flatten_widgets(&table),
            Err(CleanError::EmptyTable)
        ));
    }
}
