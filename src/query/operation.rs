//! Recorded query operations

use crate::core::{Direction, FieldPath};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// What a transform callback decided for one record
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Leave the record as it is
    Keep,
    /// Remove the record from the result
    Drop,
    /// A new value for the transformed field, or a replacement record
    Value(Value),
}

impl From<bool> for Verdict {
    fn from(keep: bool) -> Self {
        if keep {
            Self::Keep
        } else {
            Self::Drop
        }
    }
}

impl From<Value> for Verdict {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(keep) => Self::from(keep),
            other => Self::Value(other),
        }
    }
}

impl From<Option<Value>> for Verdict {
    fn from(value: Option<Value>) -> Self {
        value.map(Self::from).unwrap_or(Self::Keep)
    }
}

/// Transform callback: receives the field value, or the whole record
pub type TransformFn = Arc<dyn Fn(&Value) -> Verdict + Send + Sync>;

/// Neighbour window sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    pub before: usize,
    pub after: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            before: 1,
            after: 1,
        }
    }
}

/// One step of a query chain
#[derive(Clone)]
pub enum QueryOperation {
    Skip(usize),
    Limit(usize),
    Project(Vec<FieldPath>),
    Exclude(Vec<FieldPath>),
    Search {
        field: FieldPath,
        query: String,
    },
    Sort {
        field: FieldPath,
        direction: Direction,
    },
    Window {
        target: String,
        options: WindowOptions,
    },
    Transform {
        field: Option<FieldPath>,
        callback: TransformFn,
    },
}

impl QueryOperation {
    /// Operation name as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Skip(_) => "skip",
            Self::Limit(_) => "limit",
            Self::Project(_) => "project",
            Self::Exclude(_) => "exclude",
            Self::Search { .. } => "search",
            Self::Sort { .. } => "sort",
            Self::Window { .. } => "window",
            Self::Transform { .. } => "transform",
        }
    }
}

impl fmt::Debug for QueryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip(n) => f.debug_tuple("Skip").field(n).finish(),
            Self::Limit(n) => f.debug_tuple("Limit").field(n).finish(),
            Self::Project(fields) => f.debug_tuple("Project").field(fields).finish(),
            Self::Exclude(fields) => f.debug_tuple("Exclude").field(fields).finish(),
            Self::Search { field, query } => f
                .debug_struct("Search")
                .field("field", field)
                .field("query", query)
                .finish(),
            Self::Sort { field, direction } => f
                .debug_struct("Sort")
                .field("field", field)
                .field("direction", direction)
                .finish(),
            Self::Window { target, options } => f
                .debug_struct("Window")
                .field("target", target)
                .field("options", options)
                .finish(),
            Self::Transform { field, .. } => f
                .debug_struct("Transform")
                .field("field", field)
                .field("callback", &"<function>")
                .finish(),
        }
    }
}
