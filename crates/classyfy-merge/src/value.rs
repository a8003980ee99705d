//! Dynamic document values.
//!
//! Component and node documents carry arbitrary nested data under `classes`,
//! `data` and `parameters`. They are held as `serde_json` values; YAML scalar
//! mapping keys arrive stringified.

pub use serde_json::{Number, Value};

/// Key-ordered mapping. Ordering keeps serialized output stable.
pub type Mapping = serde_json::Map<String, Value>;

/// Short name of a value's variant, used in conflict reports.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
