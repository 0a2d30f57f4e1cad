//! INSERT, UPDATE, and DELETE statement generation.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::{TranslateError, TranslateResult};

use super::{format_value, NULL_LITERAL};

/// `INSERT` with the column list drawn from the catalog's known set.
///
/// Columns the row has no value for become `NULL`, so every insert into a
/// table lists the same columns regardless of which fields the document
/// happened to carry.
pub fn insert(
    schema: &str,
    table: &str,
    data: &Map<String, Value>,
    columns: &BTreeSet<String>,
) -> TranslateResult<String> {
    if data.is_empty() {
        return Err(TranslateError::MissingData);
    }
    let values: Vec<String> = columns
        .iter()
        .map(|column| match data.get(column) {
            Some(value) => format_value(value),
            None => NULL_LITERAL.to_owned(),
        })
        .collect();
    let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
    Ok(format!(
        "INSERT INTO {schema}.{table} ({}) VALUES ({});",
        columns.join(", "),
        values.join(", ")
    ))
}

/// `UPDATE` from pre-formatted, pre-ordered `SET` clauses.
pub fn update(schema: &str, table: &str, set_clauses: &[String], id: &str) -> String {
    format!(
        "UPDATE {schema}.{table} SET {} WHERE _id = '{id}';",
        set_clauses.join(", ")
    )
}

/// `DELETE` by formatted `_id` literal.
pub fn delete(schema: &str, table: &str, id_literal: &str) -> String {
    format!("DELETE FROM {schema}.{table} WHERE _id = {id_literal};")
}
