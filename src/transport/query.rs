use serde::Serialize;
use serde_json::Value;

use crate::Result;

/// Flatten a typed options struct into query pairs.
///
/// Strings pass through, booleans and numbers are stringified, lists join
/// their scalar elements with commas. Values of any other shape (objects,
/// null, empty lists) are silently dropped. The same rules feed REST URLs and
/// live WebSocket URLs.
///
/// # Errors
/// Returns an error only if `options` fails to serialize.
pub fn pairs<T: Serialize>(options: &T) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(options)?;
    let Value::Object(map) = value else {
        return Ok(Vec::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| scalar(&value).map(|rendered| (key, rendered)))
        .collect())
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().filter_map(scalar).collect();
            if rendered.is_empty() {
                None
            } else {
                Some(rendered.join(","))
            }
        }
        Value::Null | Value::Object(_) => None,
    }
}
