use serde_json::Value;
use crate::ir::{ArrayKind, ValueKind};

/// Type an array by its first string or number element.
///
/// Scanning stops at that element, so `["a", 2]` is a string array. A number
/// array is an integer array when every number in it fits `i64`. Arrays
/// with no string/number element (empty, nested arrays, objects, booleans,
/// nulls) are `Unsupported` and must not be declared.
pub fn resolve_array(items: &[Value]) -> ArrayKind {
    let first = items.iter().find_map(|item| match ValueKind::from(item) {
        ValueKind::String(_) => Some(ArrayKind::String),
        ValueKind::Number(_) => Some(ArrayKind::Number),
        _ => None,
    });
    match first {
        Some(ArrayKind::Number) if all_integers(items) => ArrayKind::Integer,
        Some(kind) => kind,
        None => ArrayKind::Unsupported,
    }
}

fn all_integers(items: &[Value]) -> bool {
    items.iter().all(|item| match item {
        Value::Number(n) => n.is_i64(),
        _ => true,
    })
}
