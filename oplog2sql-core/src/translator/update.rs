//! Update handling: diff to `SET` clauses.

use serde_json::Value;

use crate::error::{TranslateError, TranslateResult};
use crate::oplog::{Namespace, Oplog, FIELD_DIFF, FIELD_SET, FIELD_UNSET};
use crate::sqlgen::{dml, format_value, NULL_LITERAL};

use super::Translator;

impl Translator {
    /// Updates emit exactly one statement and never touch the catalog:
    /// fields set to new values come first, unset fields become `NULL`
    /// after them, each group sorted.
    pub(super) fn handle_update(&mut self, entry: &Oplog) -> TranslateResult<Vec<String>> {
        let id = match &entry.match_key {
            Some(match_key) if !match_key.id.is_empty() => match_key.id.clone(),
            _ => return Err(TranslateError::MissingId),
        };
        let diff = entry
            .data
            .get(FIELD_DIFF)
            .and_then(Value::as_object)
            .ok_or(TranslateError::MalformedUpdate)?;
        let ns = Namespace::parse(&entry.namespace)?;

        let mut set_clauses = Vec::new();
        if let Some(set_fields) = diff.get(FIELD_SET).and_then(Value::as_object) {
            let mut sets: Vec<String> = set_fields
                .iter()
                .map(|(field, value)| format!("{field} = {}", format_value(value)))
                .collect();
            sets.sort();
            set_clauses.extend(sets);
        }
        if let Some(unset_fields) = diff.get(FIELD_UNSET).and_then(Value::as_object) {
            let mut sets: Vec<String> = unset_fields
                .keys()
                .map(|field| format!("{field} = {NULL_LITERAL}"))
                .collect();
            sets.sort();
            set_clauses.extend(sets);
        }
        if set_clauses.is_empty() {
            return Err(TranslateError::MalformedUpdate);
        }

        Ok(vec![dml::update(&ns.schema, &ns.table, &set_clauses, &id)])
    }
}
