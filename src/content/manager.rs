//! Entry point tying the loader, the query engine and the compiler together

use crate::content::compiler::{CompileOptions, Compiler, LiteralCompiler};
use crate::content::fetch::{ContentQuery, FetchOptions};
use crate::core::Document;
use crate::error::Result;
use crate::io::{ContentLoader, LoaderConfig};
use crate::query::Query;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Options for one [`ContentManager::content`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentOptions {
    /// Descend into subdirectories
    pub deep: bool,
    /// Keep raw text in fetched results by default
    pub text: bool,
}

/// Loads content below a root and hands out queries over it
pub struct ContentManager {
    loader: ContentLoader,
    compiler: Arc<dyn Compiler>,
    compile_options: CompileOptions,
}

impl ContentManager {
    /// Manager using the built-in [`LiteralCompiler`]
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_compiler(config, Arc::new(LiteralCompiler))
    }

    pub fn with_compiler(config: LoaderConfig, compiler: Arc<dyn Compiler>) -> Self {
        Self {
            loader: ContentLoader::new(config),
            compiler,
            compile_options: CompileOptions::default(),
        }
    }

    pub fn with_compile_options(mut self, options: CompileOptions) -> Self {
        self.compile_options = options;
        self
    }

    /// Load the target and start a query over it
    ///
    /// The filesystem is scanned on every call.
    pub fn content<S: AsRef<str>>(&self, segments: &[S], options: ContentOptions) -> Result<ContentQuery> {
        let documents = self.documents(segments, options.deep)?;
        let query = ContentQuery::new(Query::from_documents(&documents), self.compiler.clone())
            .with_compile_options(self.compile_options.clone())
            .with_defaults(FetchOptions {
                text: options.text,
                ..Default::default()
            });
        Ok(query)
    }

    /// The parsed documents of a target, without a query around them
    pub fn documents<S: AsRef<str>>(&self, segments: &[S], deep: bool) -> Result<Vec<Document>> {
        self.loader.load(segments, deep)
    }

    pub fn config(&self) -> &LoaderConfig {
        self.loader.config()
    }
}

impl fmt::Debug for ContentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentManager")
            .field("config", self.loader.config())
            .field("compiler", &self.compiler.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Direction;
    use crate::error::ContentError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let posts = temp_dir.path().join("posts");
        fs::create_dir_all(&posts).unwrap();
        for (name, date) in [("first", "2021-01-01"), ("second", "2021-02-01")] {
            fs::write(
                posts.join(format!("{}.md", name)),
                format!("---\ntitle: {}\ndate: {}\n---\n# {}\n", name, date, name),
            )
            .unwrap();
        }
        temp_dir
    }

    #[tokio::test]
    async fn test_content_round_trip() {
        let temp_dir = site();
        let manager = ContentManager::new(LoaderConfig::with_root(temp_dir.path()));

        let mut query = manager
            .content(&["posts"], ContentOptions { deep: false, text: true })
            .unwrap()
            .sort("data.date", Direction::Desc);
        let results = query.fetch(None).await.unwrap();

        let paths: Vec<_> = results
            .iter()
            .map(|r| r.as_ref().unwrap().path().unwrap().to_string())
            .collect();
        assert_eq!(paths, vec!["/posts/second", "/posts/first"]);
        assert_eq!(results[0].as_ref().unwrap().text().map(str::trim), Some("# second"));
    }

    #[test]
    fn test_missing_content() {
        let temp_dir = site();
        let manager = ContentManager::new(LoaderConfig::with_root(temp_dir.path()));
        let err = manager
            .content(&["drafts"], ContentOptions::default())
            .unwrap_err();
        assert!(matches!(err, ContentError::FileNotFound { .. }));
        assert!(err.to_string().starts_with("Cannot find directory or file"));
    }
}
