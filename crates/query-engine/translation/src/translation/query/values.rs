//! Handle the translation of literal values.

use query_engine_sql::sql;

use crate::translation::error::Error;

/// Convert a JSON scalar from a comparison into a SQL value. Strings and numbers end up
/// as bound parameters when rendered.
pub fn translate_json_value(
    column: &str,
    value: &serde_json::Value,
) -> Result<sql::ast::Value, Error> {
    match value {
        serde_json::Value::Null => Ok(sql::ast::Value::Null),
        serde_json::Value::Bool(b) => Ok(sql::ast::Value::Bool(*b)),
        serde_json::Value::String(s) => Ok(sql::ast::Value::String(s.clone())),
        serde_json::Value::Number(num) => num
            .as_i64()
            .map(sql::ast::Value::Int8)
            .or_else(|| num.as_f64().map(sql::ast::Value::Float8))
            .ok_or_else(|| unsupported(column, value)),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(unsupported(column, value))
        }
    }
}

fn unsupported(column: &str, value: &serde_json::Value) -> Error {
    Error::UnsupportedValue {
        column: column.to_string(),
        value: value.clone(),
    }
}
