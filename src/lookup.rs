use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use crate::error::{CleanError, Result};
use crate::model::Table;

/// Build the location lookup table: one row per distinct `location`
/// value, ordered by location, with the distinct `id`s seen under that
/// location gathered into a list in first-seen order. Flattening upstream
/// duplicates ids, hence the dedup here.
pub fn location_table(table: &Table) -> Result<Table> {
    if table.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    let location = table.require_column("location")?;
    let id = table.require_column("id")?;

    let mut groups: BTreeMap<String, (Value, Vec<Value>, HashSet<String>)> = BTreeMap::new();
    for row in table.rows() {
        let entry = groups
            .entry(row[location].to_string())
            .or_insert_with(|| (row[location].clone(), Vec::new(), HashSet::new()));
        if entry.2.insert(row[id].to_string()) {
            entry.1.push(row[id].clone());
        }
    }

    let mut lookup = Table::new(vec!["location".to_string(), "id".to_string()]);
    for (_, (value, ids, _)) in groups {
        lookup.push_row(vec![value, Value::Array(ids)]);
    }
    Ok(lookup)
}

/// Return the ids recorded for an exact `location` match, flattened into
/// one list. An unknown location is not an error: the result is empty.
pub fn get_ids(location_tag: &str, table: &Table) -> Result<Vec<Value>> {
    if table.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    if location_tag.is_empty() {
        return Err(CleanError::EmptyArgument("location_tag"));
    }
    let location = table.require_column("location")?;
    let id = table.require_column("id")?;

    let mut ids = Vec::new();
    for row in table.rows() {
        if row[location].as_str() == Some(location_tag) {
            match &row[id] {
                Value::Array(entries) => ids.extend(entries.iter().cloned()),
                Value::Null => {}
                single => ids.push(single.clone()),
            }
        }
    }
    Ok(ids)
}
