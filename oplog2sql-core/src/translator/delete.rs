//! Delete handling.

use crate::error::{TranslateError, TranslateResult};
use crate::oplog::{Namespace, Oplog, FIELD_ID};
use crate::sqlgen::{dml, format_value};

use super::Translator;

impl Translator {
    pub(super) fn handle_delete(&mut self, entry: &Oplog) -> TranslateResult<Vec<String>> {
        let id = entry.data.get(FIELD_ID).ok_or(TranslateError::MissingId)?;
        let ns = Namespace::parse(&entry.namespace)?;
        Ok(vec![dml::delete(&ns.schema, &ns.table, &format_value(id))])
    }
}
