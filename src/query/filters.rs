//! The filter engine
//!
//! Every operation takes its payload and the current entries and returns the
//! next entries. [`run`] dispatches a recorded [`QueryOperation`].

use crate::core::value::{get_value, lookup, omit, pick, set_value};
use crate::core::{order_by, Direction, FieldPath};
use crate::query::operation::{QueryOperation, TransformFn, Verdict, WindowOptions};
use crate::query::search::TextIndex;
use serde_json::Value;

/// A record slot; `None` is a placeholder left by a neighbour window
pub type Entry = Option<Value>;

/// Execute one operation
pub fn run(operation: &QueryOperation, entries: Vec<Entry>) -> Vec<Entry> {
    log::trace!("{} over {} entries", operation.name(), entries.len());
    match operation {
        QueryOperation::Skip(n) => skip(*n, entries),
        QueryOperation::Limit(n) => limit(*n, entries),
        QueryOperation::Project(fields) => project(fields, entries),
        QueryOperation::Exclude(fields) => exclude(fields, entries),
        QueryOperation::Search { field, query } => search(field, query, entries),
        QueryOperation::Sort { field, direction } => sort(field, *direction, entries),
        QueryOperation::Window { target, options } => window(target, *options, entries),
        QueryOperation::Transform { field, callback } => {
            transform(field.as_ref(), callback, entries)
        }
    }
}

pub fn skip(n: usize, entries: Vec<Entry>) -> Vec<Entry> {
    entries.into_iter().skip(n).collect()
}

pub fn limit(n: usize, mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.truncate(n);
    entries
}

/// Keep only the listed fields of each record
pub fn project(fields: &[FieldPath], entries: Vec<Entry>) -> Vec<Entry> {
    entries
        .into_iter()
        .map(|entry| entry.map(|record| pick(&record, fields)))
        .collect()
}

/// Drop the listed fields from each record
pub fn exclude(fields: &[FieldPath], entries: Vec<Entry>) -> Vec<Entry> {
    entries
        .into_iter()
        .map(|entry| entry.map(|record| omit(&record, fields)))
        .collect()
}

/// Keep records whose `field` matches `query`, in their current order
///
/// The index is built from scratch for every call.
pub fn search(field: &FieldPath, query: &str, entries: Vec<Entry>) -> Vec<Entry> {
    let mut index = TextIndex::new();
    for (position, entry) in entries.iter().enumerate() {
        if let Some(value) = entry
            .as_ref()
            .and_then(|record| lookup(record, field.segments()))
        {
            index.add(position, value);
        }
    }

    let hits = index.search(query.trim());
    entries
        .into_iter()
        .enumerate()
        .filter(|(position, _)| hits.contains(position))
        .map(|(_, entry)| entry)
        .collect()
}

pub fn sort(field: &FieldPath, direction: Direction, entries: Vec<Entry>) -> Vec<Entry> {
    order_by(entries, field, direction)
}

/// Neighbours of the record identified by `target`
///
/// A target starting with `/` is matched against `path`, anything else
/// against `slug`. The result holds `before` slots walking backwards from
/// the match followed by `after` slots walking forwards; slots outside the
/// collection, or every slot when nothing matches, are `None`.
pub fn window(target: &str, options: WindowOptions, entries: Vec<Entry>) -> Vec<Entry> {
    let WindowOptions { before, after } = options;
    let Some(main) = entries
        .iter()
        .position(|entry| entry.as_ref().is_some_and(|record| identifies(record, target)))
    else {
        return vec![None; before + after];
    };

    let previous = (1..=before).map(|distance| {
        main.checked_sub(distance)
            .and_then(|index| entries.get(index))
            .cloned()
            .flatten()
    });
    let next = (1..=after).map(|distance| entries.get(main + distance).cloned().flatten());

    previous.chain(next).collect()
}

fn identifies(record: &Value, target: &str) -> bool {
    if target.starts_with('/') {
        return record.get("path").and_then(Value::as_str) == Some(target);
    }

    match record.get("slug") {
        Some(Value::String(slug)) => slug == target,
        Some(Value::Array(segments)) => {
            let joined: Option<Vec<&str>> = segments.iter().map(Value::as_str).collect();
            joined.is_some_and(|parts| parts.join("/") == target)
        }
        _ => false,
    }
}

/// Filter, map or replace records through `callback`
///
/// The callback sees the value at `field`, or the whole record when no field
/// is given or the field does not resolve. Null slots are passed through.
pub fn transform(field: Option<&FieldPath>, callback: &TransformFn, entries: Vec<Entry>) -> Vec<Entry> {
    let mut out = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(record) = entry else {
            out.push(None);
            continue;
        };

        let original = field
            .and_then(|path| get_value(&record, path))
            .filter(|value| !value.is_null());

        match callback(original.as_ref().unwrap_or(&record)) {
            Verdict::Drop => {}
            Verdict::Keep => out.push(Some(record)),
            Verdict::Value(value) => match (field, original) {
                (Some(path), Some(original)) if value != original => {
                    out.push(Some(set_value(&record, path, value)));
                }
                (_, None) if value.is_object() => out.push(Some(value)),
                _ => out.push(Some(record)),
            },
        }
    }

    out
}
