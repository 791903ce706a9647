//! Query recording and evaluation

pub mod builder;
pub mod filters;
pub mod operation;
pub mod search;

pub use builder::{ContentParams, Query};
pub use filters::Entry;
pub use operation::{QueryOperation, TransformFn, Verdict, WindowOptions};
pub use search::TextIndex;
