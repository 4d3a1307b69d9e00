//! Display strings for raw record attributes.

use serde_json::Value;

use crate::record::RawRecord;

/// Fields holding EC2 tag lists.
const TAG_FIELDS: [&str; 2] = ["Tags", "TagSet"];

/// Copy every field of `record` into a display string, keyed by field name.
///
/// Scalars are rendered as-is, tag lists as `Key=Value` pairs, and any
/// other nested value as compact JSON.
pub fn flatten_attributes(record: &RawRecord) -> Vec<(String, String)> {
    record
        .iter()
        .map(|(key, value)| {
            let text = if TAG_FIELDS.contains(&key.as_str()) {
                render_tags(value).unwrap_or_else(|| display_value(value))
            } else {
                display_value(value)
            };
            (key.clone(), text)
        })
        .collect()
}

/// Render a single JSON value for display.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        nested => nested.to_string(),
    }
}

fn render_tags(value: &Value) -> Option<String> {
    let items = value.as_array()?;
    let mut pairs = Vec::with_capacity(items.len());
    for item in items {
        let key = item.get("Key")?.as_str()?;
        let value = item.get("Value").and_then(Value::as_str).unwrap_or("");
        pairs.push(format!("{key}={value}"));
    }
    Some(pairs.join(", "))
}
