//! Core types and domain logic

pub mod document;
pub mod field_path;
pub mod order;
pub mod value;

pub use document::{Document, TocEntry};
pub use field_path::FieldPath;
pub use order::{compare_values, order_by, Direction};
pub use value::{get_value, omit, pick, set_value};
