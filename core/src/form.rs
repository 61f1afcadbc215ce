//! Form-encoded request bodies.
//!
//! Form fields are given as a JSON object so callers can pass numbers and
//! booleans alongside strings. Each value is coerced to its form string by
//! `form_value`.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Field name to value mapping for `application/x-www-form-urlencoded` bodies.
pub type FormData = Map<String, Value>;

/// The string a JSON value takes in a form body.
///
/// | value            | form string          |
/// |------------------|----------------------|
/// | string           | itself               |
/// | number           | decimal (`1`, `2.5`) |
/// | bool             | `true` / `false`     |
/// | null             | empty                |
/// | array, object    | empty                |
pub fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// URL-escaped `key=value` pairs joined by `&`.
pub fn encode_form(data: &FormData) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in data {
        serializer.append_pair(key, &form_value(value));
    }
    serializer.finish()
}
