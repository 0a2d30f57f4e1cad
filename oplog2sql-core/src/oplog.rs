//! Oplog wire model.
//!
//! Field names follow the MongoDB oplog encoding: `op` carries the
//! operation tag, `ns` the namespace, `o` the change document, and `o2`
//! the row-identity document on updates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{TranslateError, TranslateResult};

/// Operation tags as carried on the wire.
pub const OP_INSERT: &str = "i";
pub const OP_UPDATE: &str = "u";
pub const OP_DELETE: &str = "d";

/// Field names with special meaning inside change documents.
pub const FIELD_ID: &str = "_id";
pub const FIELD_DIFF: &str = "diff";
pub const FIELD_SET: &str = "u";
pub const FIELD_UNSET: &str = "d";

/// A single decoded oplog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Oplog {
    /// Operation tag: `i`, `u`, or `d`.
    #[serde(rename = "op")]
    pub operation: String,

    /// `<schema>.<table>` qualifier of the affected collection.
    #[serde(rename = "ns")]
    pub namespace: String,

    /// The change document: the inserted row, the update diff, or the
    /// deleted row's identity.
    #[serde(rename = "o", default)]
    pub data: Map<String, Value>,

    /// Row identity carried by updates.
    #[serde(rename = "o2", default, skip_serializing_if = "Option::is_none")]
    pub match_key: Option<MatchKey>,
}

/// The `o2` sub-document locating the row targeted by an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchKey {
    #[serde(rename = "_id", default)]
    pub id: String,
}

/// A validated `<schema>.<table>` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub schema: String,
    pub table: String,
}

impl Namespace {
    /// Split a namespace into its schema and table parts, both non-empty.
    pub fn parse(raw: &str) -> TranslateResult<Self> {
        match raw.split('.').collect::<Vec<_>>().as_slice() {
            [schema, table] if !schema.is_empty() && !table.is_empty() => Ok(Self {
                schema: (*schema).to_owned(),
                table: (*table).to_owned(),
            }),
            _ => Err(TranslateError::InvalidNamespace(raw.to_owned())),
        }
    }

    /// Catalog key for the main table of this namespace.
    pub fn table_key(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespace() {
        let ns = Namespace::parse("test.student").unwrap();
        assert_eq!(ns.schema, "test");
        assert_eq!(ns.table, "student");
        assert_eq!(ns.table_key(), "test.student");
    }

    #[test]
    fn test_parse_namespace_rejects_bad_shapes() {
        for raw in ["teststudent", ".student", "test.", "a.b.c", ""] {
            assert!(matches!(
                Namespace::parse(raw),
                Err(TranslateError::InvalidNamespace(_))
            ));
        }
    }

    #[test]
    fn test_decode_oplog_entry() {
        let entry: Oplog = serde_json::from_str(
            r#"{"op":"u","ns":"test.student","o":{"diff":{"u":{"name":"x"}}},"o2":{"_id":"id123"}}"#,
        )
        .unwrap();
        assert_eq!(entry.operation, "u");
        assert_eq!(entry.namespace, "test.student");
        assert_eq!(entry.match_key.unwrap().id, "id123");
    }

    #[test]
    fn test_decode_defaults() {
        // A missing `o` decodes to an empty document, a missing `o2._id`
        // to an empty id.
        let entry: Oplog =
            serde_json::from_str(r#"{"op":"i","ns":"test.student","o2":{}}"#).unwrap();
        assert!(entry.data.is_empty());
        assert_eq!(entry.match_key.unwrap().id, "");
    }
}
