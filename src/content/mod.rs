//! Compiling and materializing query results

pub mod compiler;
pub mod fetch;
pub mod manager;

pub use compiler::{CompileOptions, Compiler, LiteralCompiler};
pub use fetch::{CompileFailurePolicy, ContentQuery, FetchOptions, FetchResult};
pub use manager::{ContentManager, ContentOptions};
