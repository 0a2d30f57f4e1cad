//! CREATE and ALTER statement generation.

use serde_json::{Map, Value};

use crate::error::TranslateResult;

use super::sql_type;

pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA {schema};")
}

/// `CREATE TABLE` with column definitions sorted by name.
pub fn create_table(
    schema: &str,
    table: &str,
    data: &Map<String, Value>,
) -> TranslateResult<String> {
    Ok(format!(
        "CREATE TABLE {schema}.{table} ({});",
        column_definitions(data)?.join(", ")
    ))
}

/// `ALTER TABLE .. ADD` for columns not seen before, sorted by name.
pub fn alter_table_add(
    schema: &str,
    table: &str,
    new_fields: &Map<String, Value>,
) -> TranslateResult<String> {
    Ok(format!(
        "ALTER TABLE {schema}.{table} ADD {};",
        column_definitions(new_fields)?.join(", ")
    ))
}

fn column_definitions(data: &Map<String, Value>) -> TranslateResult<Vec<String>> {
    // The map is BTree-backed, so iteration is already name-sorted.
    data.iter()
        .map(|(field, value)| Ok(format!("{field} {}", sql_type(field, value)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().expect("fixture document").clone()
    }

    #[test]
    fn test_create_schema() {
        assert_eq!(create_schema("test"), "CREATE SCHEMA test;");
    }

    #[test]
    fn test_create_table_sorts_columns() {
        let data = document(json!({
            "roll_no": 51,
            "_id": "635b79e231d82a8ab1de863b",
            "name": "Selena Miller",
            "is_graduated": false
        }));
        assert_eq!(
            create_table("test", "student", &data).unwrap(),
            "CREATE TABLE test.student (_id VARCHAR(255) PRIMARY KEY, \
             is_graduated BOOLEAN, name VARCHAR(255), roll_no FLOAT);"
        );
    }

    #[test]
    fn test_alter_table_add() {
        let data = document(json!({"weight": 90, "height": 6.1}));
        assert_eq!(
            alter_table_add("test", "student", &data).unwrap(),
            "ALTER TABLE test.student ADD height FLOAT, weight FLOAT;"
        );
    }

    #[test]
    fn test_create_table_rejects_unsupported_values() {
        let data = document(json!({"_id": "1", "tags": ["a", "b"]}));
        assert!(matches!(
            create_table("test", "student", &data),
            Err(TranslateError::UnsupportedType { .. })
        ));
    }
}
