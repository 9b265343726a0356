use serde_json::{Map, Value};

/// Ordered configuration mapping handed to plugin blocks.
///
/// Key order follows the source document, so overlays and parameter
/// assignments serialize back in the order the user wrote them.
pub type ConfigMap = Map<String, Value>;

/// Concrete parameter assignment for a single case.
pub type Params = Map<String, Value>;

/// Shallow merge of `overlay` over `defaults`.
///
/// Keys present in both take the overlay value in the position the default
/// declared them; keys only present in the overlay are appended in overlay
/// order.
pub fn merge_shallow(defaults: &ConfigMap, overlay: &ConfigMap) -> ConfigMap {
    let mut merged = defaults.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Compact single-line rendering of a value for diagnostics.
pub fn describe(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

/// Short name of the value kind, used in type errors.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
