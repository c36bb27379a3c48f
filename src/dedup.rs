use std::collections::HashSet;

use crate::error::{CleanError, Result};
use crate::model::Table;

/// Remove rows with a repeated `(id, created_at)` pair, keeping the first
/// occurrence in original row order. Returns a new table; the input is
/// left untouched.
pub fn remove_duplicates(table: &Table) -> Result<Table> {
    if table.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    let id = table.require_column("id")?;
    let created_at = table.require_column("created_at")?;

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut kept = Table::new(table.columns().to_vec());

    for row in table.rows() {
        // Compare by exact JSON value; nulls compare equal to nulls.
        let key = (row[id].to_string(), row[created_at].to_string());
        if seen.insert(key) {
            kept.push_row(row.to_vec());
        }
    }

    log::debug!(
        "dedup kept {} of {} rows",
        kept.height(),
        table.height()
    );
    Ok(kept)
}
