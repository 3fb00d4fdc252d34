//! Span-free JSON views of nodes for structural comparison.

use serde::Serialize;
use serde_json::Value;

const SPAN_FIELD: &str = "span";

/// Serializes `node` to JSON with every `span` field removed.
///
/// Two trees parsed from differently formatted sources compare equal under
/// this view when they differ only in positions.
///
/// # Errors
///
/// Returns the serializer error when `node` cannot be represented as JSON.
///
/// # Example
///
/// ```
/// use peggy_ast::{Name, Span, span_free_json};
///
/// let name = Name { value: "start".to_owned(), span: Span::default() };
/// let json = span_free_json(&name).expect("serializable");
/// assert_eq!(json, serde_json::json!({ "value": "start" }));
/// ```
pub fn span_free_json<N: Serialize + ?Sized>(node: &N) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(node)?;
    strip_spans(&mut value);
    Ok(value)
}

/// Removes every `span` member from `value`, recursively.
pub fn strip_spans(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove(SPAN_FIELD);
            map.values_mut().for_each(strip_spans);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_spans),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}
