//! Column type inference.

use serde_json::Value;

use crate::error::{TranslateError, TranslateResult};
use crate::oplog::FIELD_ID;

/// Infer the SQL column type for a field.
///
/// `_id` is always the primary key. Strings map to `VARCHAR(255)`,
/// booleans to `BOOLEAN`, and all numbers to `FLOAT`; anything else has
/// no column type.
pub fn sql_type(field: &str, value: &Value) -> TranslateResult<&'static str> {
    if field == FIELD_ID {
        return Ok("VARCHAR(255) PRIMARY KEY");
    }
    match value {
        Value::String(_) => Ok("VARCHAR(255)"),
        Value::Bool(_) => Ok("BOOLEAN"),
        Value::Number(_) => Ok("FLOAT"),
        other => Err(TranslateError::UnsupportedType {
            field: field.to_owned(),
            value: other.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_is_primary_key() {
        assert_eq!(
            sql_type("_id", &json!("635b79e231d82a8ab1de863b")).unwrap(),
            "VARCHAR(255) PRIMARY KEY"
        );
        // The rule keys on the field name, not the value kind.
        assert_eq!(sql_type("_id", &json!(7)).unwrap(), "VARCHAR(255) PRIMARY KEY");
    }

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(sql_type("name", &json!("Selena")).unwrap(), "VARCHAR(255)");
        assert_eq!(sql_type("is_graduated", &json!(false)).unwrap(), "BOOLEAN");
        assert_eq!(sql_type("roll_no", &json!(51)).unwrap(), "FLOAT");
        assert_eq!(sql_type("score", &json!(95.5)).unwrap(), "FLOAT");
    }

    #[test]
    fn test_unsupported_kinds() {
        for value in [json!(null), json!(["a"]), json!({"k": 1})] {
            assert!(matches!(
                sql_type("field", &value),
                Err(TranslateError::UnsupportedType { .. })
            ));
        }
    }
}
