//! Per-table schema bookkeeping.

use std::collections::{BTreeMap, BTreeSet};

static NO_COLUMNS: BTreeSet<String> = BTreeSet::new();

/// Tracks, per schema-qualified table name, whether DDL has been emitted
/// and which columns are known.
///
/// Columns are only ever added; the first document observed for a table
/// defines the initial set and later documents extend it. The catalog is
/// owned by a single translator and lives for its lifetime.
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    ddl_emitted: BTreeSet<String>,
    columns: BTreeMap<String, BTreeSet<String>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Has `CREATE TABLE` been emitted for this table key?
    pub fn ddl_emitted(&self, table_key: &str) -> bool {
        self.ddl_emitted.contains(table_key)
    }

    pub fn mark_ddl_emitted(&mut self, table_key: &str) {
        self.ddl_emitted.insert(table_key.to_owned());
    }

    pub fn has_column(&self, table_key: &str, column: &str) -> bool {
        self.columns
            .get(table_key)
            .is_some_and(|columns| columns.contains(column))
    }

    /// Known columns for a table key, name-sorted. Empty for unknown keys.
    pub fn known_columns(&self, table_key: &str) -> &BTreeSet<String> {
        self.columns.get(table_key).unwrap_or(&NO_COLUMNS)
    }

    /// Record columns for a table key, creating the entry on first use.
    pub fn add_columns<I>(&mut self, table_key: &str, columns: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.columns
            .entry(table_key.to_owned())
            .or_default()
            .extend(columns);
    }
}
