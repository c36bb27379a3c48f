use std::collections::HashMap;

use serde_json::{json, Value};

use crate::error::{CleanError, Result};
use crate::model::Table;

/// Add a `sub_group_rank` column: the rank of `user_score` within each
/// `age_group`, descending (rank 1 = highest score). Ties receive the
/// average of the positional ranks they span. Rows with a null or
/// non-numeric score get a null rank.
pub fn add_sub_group_rank(table: &mut Table) -> Result<()> {
    if table.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    let age_group = table.require_column("age_group")?;
    let user_score = table.require_column("user_score")?;

    // Group row indices by the age_group cell; null is its own group.
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, row) in table.rows().enumerate() {
        groups
            .entry(row[age_group].to_string())
            .or_default()
            .push(index);
    }

    let mut ranks = vec![Value::Null; table.height()];
    for members in groups.values() {
        let scores: Vec<(usize, f64)> = members
            .iter()
            .filter_map(|&index| {
                table.cell(index, user_score).as_f64().map(|s| (index, s))
            })
            .collect();

        for &(index, score) in &scores {
            let greater = scores.iter().filter(|&&(_, other)| other > score).count();
            let equal = scores.iter().filter(|&&(_, other)| other == score).count();
            // Average rank: count above, plus the midpoint of the tie run.
            let rank = greater as f64 + (equal as f64 + 1.0) / 2.0;
            ranks[index] = json!(rank);
        }
    }

    table.add_column("sub_group_rank", ranks);
    Ok(())
}
