//! Stable ordering of records by a field
//!
//! Strings use a collation that ignores case and compares embedded digit
//! runs by numeric value, so `"Chapter 2"` sorts before `"chapter 10"`.
//! Accents only break ties: `"éclair"` sorts between `"eclair"` and `"egg"`.

use crate::core::field_path::FieldPath;
use crate::core::value::lookup;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = crate::error::ContentError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(crate::error::ContentError::validation(format!(
                "unknown sort direction '{}'",
                other
            ))),
        }
    }
}

/// Sort entries by the value at `path`, keeping equal keys in input order
///
/// `None` entries and records missing the field sort as null.
pub fn order_by(mut entries: Vec<Option<Value>>, path: &FieldPath, direction: Direction) -> Vec<Option<Value>> {
    let key = |entry: &Option<Value>| -> Option<Value> {
        entry
            .as_ref()
            .and_then(|record| lookup(record, path.segments()))
            .cloned()
    };

    // Keys are extracted once; `sort_by` is a stable merge sort.
    let mut keyed: Vec<(Option<Value>, Option<Value>)> =
        entries.drain(..).map(|entry| (key(&entry), entry)).collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_values(a.as_ref(), b.as_ref());
        match direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, entry)| entry).collect()
}

/// Total order over optional JSON values used by [`order_by`]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);

    match (a, b) {
        (Value::String(x), Value::String(y)) => natural_cmp(x, y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Case-insensitive comparison treating digit runs as numbers
///
/// Letters are compared without their accents first; accented forms only
/// decide between otherwise equal strings.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    compare_chars(base_letters(a), base_letters(b))
        .then_with(|| compare_chars(accented_letters(a), accented_letters(b)))
}

/// Decomposed, lowercased, with combining marks removed
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn compare_chars<L, R>(left: L, right: R) -> Ordering
where
    L: Iterator<Item = char>,
    R: Iterator<Item = char>,
{
    let mut left = left.peekable();
    let mut right = right.peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let ordering = compare_digit_runs(&take_digits(&mut left), &take_digits(&mut right));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits<I: Iterator<Item = char>>(chars: &mut Peekable<I>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
