use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

use crate::error::{CleanError, Result};
use crate::model::Table;

/// Replace the `email` column with base64-encoded `email_anon`.
///
/// Each email cell must be text; the encoder takes the string's UTF-8
/// bytes and stores the standard, padded base64 representation. The
/// `email` column is removed and `email_anon` appended in its place at
/// the end of the column list.
pub fn encode_emails(table: &mut Table) -> Result<()> {
    if table.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    let email = table.require_column("email")?;

    let mut encoded = Vec::with_capacity(table.height());
    for (index, row) in table.rows().enumerate() {
        match &row[email] {
            Value::String(text) => {
                encoded.push(Value::String(general_purpose::STANDARD.encode(text)))
            }
            _ => {
                return Err(CleanError::NonTextCell {
                    column: "email".to_string(),
                    row: index,
                })
            }
        }
    }

    table.drop_column("email")?;
    table.add_column("email_anon", encoded);
    Ok(())
}

/// Decode the whole `email_anon` column back to plain text, in row order.
///
/// Not intended for general use: callers looking up a single tag should
/// go through [`decode_one`]. Returns the recovered values instead of
/// mutating the table, so no transient column is ever left behind.
pub fn decode_emails(table: &Table) -> Result<Vec<String>> {
    if table.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    let email_anon = table.require_column("email_anon")?;

    let mut recovered = Vec::with_capacity(table.height());
    for (index, row) in table.rows().enumerate() {
        let text = match &row[email_anon] {
            Value::String(text) => text,
            _ => {
                return Err(CleanError::NonTextCell {
                    column: "email_anon".to_string(),
                    row: index,
                })
            }
        };
        let bytes = general_purpose::STANDARD.decode(text)?;
        recovered.push(String::from_utf8(bytes)?);
    }
    Ok(recovered)
}

/// Recover the email(s) behind one previously encoded tag.
///
/// Decodes the entire column, then selects the rows whose `email_anon`
/// equals the tag. Zero or several matches are both ordinary outcomes:
/// the result is simply empty or multi-element.
pub fn decode_one(tag: &str, table: &Table) -> Result<Vec<String>> {
    if table.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    if tag.is_empty() {
        return Err(CleanError::EmptyArgument("tag"));
    }
    let email_anon = table.require_column("email_anon")?;

    let recovered = decode_emails(table)?;
    Ok(table
        .rows()
        .zip(recovered)
        .filter(|(row, _)| row[email_anon].as_str() == Some(tag))
        .map(|(_, email)| email)
        .collect())
}
