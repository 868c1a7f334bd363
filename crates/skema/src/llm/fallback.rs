//! Schema-shaped fallback output for when no LLM credential is configured.

use serde_json::{Map, Value};

/// Synthesizes a default object from a schema's top-level properties: one key
/// per declared property, typed by the property's declared `type`. Unknown or
/// absent types default to the empty string.
///
/// This keeps the pipeline functional without an LLM credential — the result
/// is schema-shaped but content-free, and it is not an error.
pub fn fallback_from_schema(schema: &Value) -> Map<String, Value> {
    let mut result = Map::new();

    let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) else {
        return result;
    };

    for (key, spec) in properties {
        let declared_type = spec.get("type").and_then(|t| t.as_str());
        result.insert(key.clone(), default_for_type(declared_type));
    }

    result
}

/// Maps the closed set of declared schema `type` strings to default values.
fn default_for_type(declared_type: Option<&str>) -> Value {
    match declared_type {
        Some("number") | Some("integer") => Value::from(0),
        Some("boolean") => Value::Bool(false),
        Some("array") => Value::Array(Vec::new()),
        Some("object") => Value::Object(Map::new()),
        _ => Value::String(String::new()),
    }
}
