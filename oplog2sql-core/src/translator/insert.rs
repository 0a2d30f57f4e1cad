//! Insert handling: DDL bootstrap, column drift, child tables.

use serde_json::{Map, Value};

use crate::error::{TranslateError, TranslateResult};
use crate::oplog::{Namespace, Oplog, FIELD_ID};
use crate::sqlgen::{ddl, dml};

use super::decompose::{split_document, SplitDocument};
use super::Translator;

impl Translator {
    pub(super) fn handle_insert(&mut self, entry: &Oplog) -> TranslateResult<Vec<String>> {
        let ns = Namespace::parse(&entry.namespace)?;
        if entry.data.is_empty() {
            return Err(TranslateError::MissingData);
        }

        let split = split_document(&entry.data);
        let parent_key = ns.table_key();
        let mut statements = Vec::new();

        if !self.catalog.ddl_emitted(&parent_key) {
            statements.push(ddl::create_schema(&ns.schema));
            statements.push(ddl::create_table(&ns.schema, &ns.table, &split.main)?);
            self.emit_children(&ns, &split, &mut statements)?;
            self.catalog.mark_ddl_emitted(&parent_key);
            self.catalog
                .add_columns(&parent_key, split.main.keys().cloned());
        } else {
            let mut new_fields = Map::new();
            for (field, value) in &split.main {
                if !self.catalog.has_column(&parent_key, field) {
                    new_fields.insert(field.clone(), value.clone());
                }
            }
            if !new_fields.is_empty() {
                statements.push(ddl::alter_table_add(&ns.schema, &ns.table, &new_fields)?);
                self.catalog
                    .add_columns(&parent_key, new_fields.keys().cloned());
            }
            self.emit_children(&ns, &split, &mut statements)?;
        }

        // The parent row is always the last statement of the batch, after
        // all DDL and child rows it depends on.
        statements.push(dml::insert(
            &ns.schema,
            &ns.table,
            &split.main,
            self.catalog.known_columns(&parent_key),
        )?);
        Ok(statements)
    }

    /// Emit child-table DDL and rows for every nested document and every
    /// element of every document array.
    fn emit_children(
        &mut self,
        ns: &Namespace,
        split: &SplitDocument,
        statements: &mut Vec<String>,
    ) -> TranslateResult<()> {
        if split.nested.is_empty() && split.arrays.is_empty() {
            return Ok(());
        }
        let parent_id = match split.main.get(FIELD_ID) {
            Some(Value::String(id)) => id.clone(),
            _ => return Err(TranslateError::MissingId),
        };

        for (field, value) in &split.nested {
            if let Value::Object(child) = value {
                self.child_row(ns, field, &parent_id, child, statements)?;
            }
        }
        for (field, items) in &split.arrays {
            for item in items {
                let child = item.as_object().ok_or_else(|| TranslateError::UnsupportedType {
                    field: field.clone(),
                    value: item.clone(),
                })?;
                self.child_row(ns, field, &parent_id, child, statements)?;
            }
        }
        Ok(())
    }

    /// Emit one row for the child table `<table>_<field>`.
    ///
    /// The row is a copy of the nested document augmented with a fresh
    /// `_id` and a `<table>__id` back-reference to the parent row.
    fn child_row(
        &mut self,
        ns: &Namespace,
        field: &str,
        parent_id: &str,
        data: &Map<String, Value>,
        statements: &mut Vec<String>,
    ) -> TranslateResult<()> {
        let child_table = format!("{}_{}", ns.table, field);
        let child_key = format!("{}.{}", ns.schema, child_table);

        let mut row = data.clone();
        row.insert(
            FIELD_ID.to_owned(),
            Value::String((self.id_generator)()),
        );
        row.insert(
            format!("{}_{}", ns.table, FIELD_ID),
            Value::String(parent_id.to_owned()),
        );

        if !self.catalog.ddl_emitted(&child_key) {
            // The parent's CREATE SCHEMA covers the child; only the table
            // itself is created here.
            statements.push(ddl::create_table(&ns.schema, &child_table, &row)?);
            self.catalog.mark_ddl_emitted(&child_key);
            self.catalog.add_columns(&child_key, row.keys().cloned());
        }
        statements.push(dml::insert(
            &ns.schema,
            &child_table,
            &row,
            self.catalog.known_columns(&child_key),
        )?);
        Ok(())
    }
}
