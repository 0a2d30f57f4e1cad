//! Insert document partitioning.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// An insert document split by value shape.
#[derive(Debug, Default)]
pub(super) struct SplitDocument {
    /// Scalar fields. Sequences of scalars land here too and fail later
    /// at type resolution.
    pub main: Map<String, Value>,
    /// Fields holding a nested document.
    pub nested: Map<String, Value>,
    /// Fields holding a non-empty sequence whose first element is a
    /// document.
    pub arrays: BTreeMap<String, Vec<Value>>,
}

/// Partition `data` into scalar, nested-document, and document-array
/// fields. Empty sequences are dropped entirely.
pub(super) fn split_document(data: &Map<String, Value>) -> SplitDocument {
    let mut split = SplitDocument::default();
    for (field, value) in data {
        match value {
            Value::Object(_) => {
                split.nested.insert(field.clone(), value.clone());
            }
            Value::Array(items) => {
                if items.is_empty() {
                    continue;
                }
                if items[0].is_object() {
                    split.arrays.insert(field.clone(), items.clone());
                } else {
                    split.main.insert(field.clone(), value.clone());
                }
            }
            _ => {
                split.main.insert(field.clone(), value.clone());
            }
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_by_value_shape() {
        let data = json!({
            "_id": "635b79e231d82a8ab1de863b",
            "name": "Selena Miller",
            "phone": {"personal": "7678456640"},
            "address": [{"zip": "89799"}],
            "tags": ["a", "b"],
            "empty": []
        });
        let split = split_document(data.as_object().unwrap());

        let main: Vec<&str> = split.main.keys().map(String::as_str).collect();
        assert_eq!(main, ["_id", "name", "tags"]);
        let nested: Vec<&str> = split.nested.keys().map(String::as_str).collect();
        assert_eq!(nested, ["phone"]);
        let arrays: Vec<&str> = split.arrays.keys().map(String::as_str).collect();
        assert_eq!(arrays, ["address"]);
    }

    #[test]
    fn test_empty_sequences_are_dropped() {
        let data = json!({"_id": "1", "empty": []});
        let split = split_document(data.as_object().unwrap());
        assert_eq!(split.main.len(), 1);
        assert!(split.arrays.is_empty());
    }
}
