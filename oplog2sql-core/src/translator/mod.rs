//! The oplog-to-SQL translation engine.
//!
//! [`Translator`] consumes decoded oplog entries and emits, per entry, an
//! ordered batch of SQL statements. It owns the schema catalog and is the
//! only writer to it, so a translator must not be shared across tasks.

mod decompose;
mod delete;
mod insert;
mod update;


use crate::catalog::SchemaCatalog;
use crate::error::{TranslateError, TranslateResult};
use crate::oplog::{Oplog, OP_DELETE, OP_INSERT, OP_UPDATE};

/// Produces fresh identifiers for synthetic child-table rows.
///
/// Injected rather than global so tests can seed a fixed value.
pub type IdGenerator = Box<dyn Fn() -> String + Send + Sync>;

/// Stateful translator from oplog entries to SQL statement batches.
pub struct Translator {
    catalog: SchemaCatalog,
    id_generator: IdGenerator,
}

impl Translator {
    pub fn new(id_generator: IdGenerator) -> Self {
        Self {
            catalog: SchemaCatalog::new(),
            id_generator,
        }
    }

    /// Translate one oplog entry into an ordered SQL batch.
    ///
    /// On error nothing is emitted for the entry; the catalog may have
    /// recorded tables whose DDL was already produced before the failure.
    pub fn process(&mut self, entry: &Oplog) -> TranslateResult<Vec<String>> {
        match entry.operation.as_str() {
            OP_INSERT => self.handle_insert(entry),
            OP_UPDATE => self.handle_update(entry),
            OP_DELETE => self.handle_delete(entry),
            other => Err(TranslateError::UnsupportedOperation(other.to_owned())),
        }
    }

    /// Decode a JSON array of oplog entries and translate them in order.
    ///
    /// Stops at the first failing entry; nothing from the failing entry or
    /// any later one is returned.
    pub fn process_batch(&mut self, payload: &str) -> TranslateResult<Vec<String>> {
        let entries: Vec<Oplog> = serde_json::from_str(payload)?;
        let mut statements = Vec::new();
        for entry in &entries {
            statements.extend(self.process(entry)?);
        }
        Ok(statements)
    }
}
