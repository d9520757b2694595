//! Resolving dotted paths (`album.title`) against listing rows.

use serde_json::Value;

/// Descend into `row` one `.`-separated segment at a time.
///
/// Objects are indexed by key and arrays by position. Anything that can't be descended into
/// (a missing key, a scalar, a `null`) ends the walk with `None`; this never fails.
#[must_use]
pub fn resolve<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(row, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Render a value as cell text.
#[must_use]
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// The text of the cell at `path` in `row`, empty when the path doesn't resolve.
#[must_use]
pub fn cell(row: &Value, path: &str) -> String {
    resolve(row, path).map(display).unwrap_or_default()
}
