//! Filesystem access: resolving targets, reading files, building documents

pub mod loader;
pub mod reader;
pub mod resolver;

pub use loader::{ContentLoader, LoaderConfig, ParseErrorPolicy};
pub use reader::{FrontMatterParser, ParsedContent};
pub use resolver::{FileResolver, Resolved, ResolverConfig};
