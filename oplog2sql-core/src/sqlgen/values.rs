//! SQL literal formatting.

use serde_json::{Number, Value};

/// Format a document value as a SQL literal.
///
/// Strings are single-quoted; embedded quotes are not escaped.
/// Integer-valued floats print without a decimal point (`23.0` becomes
/// `23`); fractional floats print with six fractional digits. Any other
/// value falls back to its quoted JSON rendering.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        other => format!("'{other}'"),
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let f = n.as_f64().unwrap_or_default();
    if f == f.trunc() {
        (f as i64).to_string()
    } else {
        format!("{f:.6}")
    }
}
