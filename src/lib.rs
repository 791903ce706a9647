//! frontquery: load markdown documents with front matter and query them
//!
//! Documents below a content root are parsed into records (front matter,
//! body, path and slug) and exposed through a fluent query builder. The
//! builder only records operations; evaluation happens in a terminal call,
//! which runs the log against a copy of the loaded records and optionally
//! compiles each surviving body.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use frontquery::{ContentManager, ContentOptions, Direction, LoaderConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let manager = ContentManager::new(LoaderConfig::with_root("content"));
//!
//!     let mut latest = manager
//!         .content(&["articles"], ContentOptions { deep: true, text: false })?
//!         .sort("data.date", Direction::Desc)
//!         .exclude(["toc"])
//!         .limit(5);
//!
//!     for article in latest.fetch(None).await?.into_iter().flatten() {
//!         println!("{:?} {:?}", article.path(), article.compiled_content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Neighbours of a document
//!
//! ```rust,no_run
//! use frontquery::{ContentManager, ContentOptions, LoaderConfig, WindowOptions, Result};
//!
//! fn main() -> Result<()> {
//!     let manager = ContentManager::new(LoaderConfig::default());
//!     let params = manager
//!         .content(&["articles"], ContentOptions::default())?
//!         .window("articles/lorem", WindowOptions { before: 1, after: 1 })
//!         .params()?;
//!     println!("{:?}", params);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: documents, field paths, value access and ordering
//! - [`io`]: target resolution, front matter parsing, document loading
//! - [`query`]: recorded operations, the filter engine and the builder
//! - [`content`]: the compiler seam, fetch results and the entry point
//! - [`error`]: the crate-wide error type

// Public API exports
pub use error::{ContentError, ErrorKind, Result};

// Core types
pub use core::{Direction, Document, FieldPath, TocEntry};

// IO types
pub use io::{ContentLoader, FrontMatterParser, LoaderConfig, ParseErrorPolicy};

// Query types
pub use query::{ContentParams, Query, QueryOperation, Verdict, WindowOptions};

// Content types
pub use content::{
    CompileFailurePolicy, CompileOptions, Compiler, ContentManager, ContentOptions, ContentQuery,
    FetchOptions, FetchResult, LiteralCompiler,
};

pub mod content;
pub mod core;
pub mod error;
pub mod io;
pub mod query;

/// Convenience functions for common operations
pub mod convenience {
    //! Shortcuts that use the default configuration

    use crate::{ContentLoader, Document, LoaderConfig, Query, Result};
    use serde_json::Value;
    use std::path::Path;

    /// Load every document below `root`, recursively
    pub fn load_all<P: AsRef<Path>>(root: P) -> Result<Vec<Document>> {
        let loader = ContentLoader::new(LoaderConfig::with_root(root.as_ref()));
        loader.load::<&str>(&[], true)
    }

    /// Records of every document below `root`, sorted by `path`
    pub fn records<P: AsRef<Path>>(root: P) -> Result<Vec<Value>> {
        let documents = load_all(root)?;
        Ok(Query::from_documents(&documents)
            .apply()
            .into_iter()
            .flatten()
            .collect())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::fs;
        use tempfile::TempDir;

        #[test]
        fn test_load_all_is_recursive() {
            let temp_dir = TempDir::new().unwrap();
            fs::create_dir_all(temp_dir.path().join("a/b")).unwrap();
            fs::write(temp_dir.path().join("top.md"), "# Top").unwrap();
            fs::write(temp_dir.path().join("a/b/deep.md"), "---\nx: 1\n---\nDeep").unwrap();

            let records = records(temp_dir.path()).unwrap();
            let paths: Vec<_> = records.iter().map(|r| r["path"].as_str().unwrap()).collect();
            assert_eq!(paths, vec!["/a/b/deep", "/top"]);
            assert_eq!(records[0]["data"]["x"], 1);
        }
    }
}
