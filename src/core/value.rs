//! Deep access helpers over JSON records
//!
//! All helpers take the record by reference and hand back owned values, so
//! the caller's record is never modified. A path that does not resolve is
//! "no match", never an error.

use crate::core::field_path::FieldPath;
use serde_json::{Map, Value};

/// Resolve `path` against `record`, returning a deep copy of the value
pub fn get_value(record: &Value, path: &FieldPath) -> Option<Value> {
    lookup(record, path.segments()).cloned()
}

/// Borrowing variant of [`get_value`]
pub fn lookup<'a>(record: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = record;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Return a copy of `record` with `value` written at `path`
///
/// Missing intermediate keys become objects; a numeric segment under an
/// array pads the array with nulls up to the index.
pub fn set_value(record: &Value, path: &FieldPath, value: Value) -> Value {
    let mut copy = record.clone();
    insert_nested(&mut copy, path.segments(), value);
    copy
}

/// Return a copy of `record` without the leaf key of each path
pub fn omit(record: &Value, paths: &[FieldPath]) -> Value {
    let mut copy = record.clone();
    for path in paths {
        remove_nested(&mut copy, path.segments());
    }
    copy
}

/// Return a new object holding only the listed paths
///
/// Paths that do not resolve are skipped rather than inserted as null.
pub fn pick(record: &Value, paths: &[FieldPath]) -> Value {
    let mut picked = Value::Object(Map::new());
    for path in paths {
        if path.is_empty() {
            continue;
        }
        if let Some(value) = lookup(record, path.segments()) {
            insert_nested(&mut picked, path.segments(), value.clone());
        }
    }
    picked
}

fn insert_nested(target: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    if let Value::Array(items) = target {
        if let Ok(index) = head.parse::<usize>() {
            while items.len() <= index {
                items.push(Value::Null);
            }
            insert_nested(&mut items[index], rest, value);
            return;
        }
    }

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        let slot = map.entry(head.clone()).or_insert(Value::Null);
        if rest.is_empty() {
            *slot = value;
        } else {
            insert_nested(slot, rest, value);
        }
    }
}

fn remove_nested(target: &mut Value, segments: &[String]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    match target {
        Value::Object(map) => {
            if rest.is_empty() {
                map.shift_remove(head);
            } else if let Some(next) = map.get_mut(head) {
                remove_nested(next, rest);
            }
        }
        Value::Array(items) => {
            let Ok(index) = head.parse::<usize>() else {
                return;
            };
            if rest.is_empty() {
                if index < items.len() {
                    items.remove(index);
                }
            } else if let Some(next) = items.get_mut(index) {
                remove_nested(next, rest);
            }
        }
        _ => {}
    }
}
