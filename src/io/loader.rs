//! Loading documents from the content root
//!
//! One [`ContentLoader::load`] call performs one filesystem scan and returns
//! freshly built [`Document`]s; nothing is cached between calls.

use crate::core::Document;
use crate::error::{ContentError, ErrorKind, Result};
use crate::io::reader::FrontMatterParser;
use crate::io::resolver::{FileResolver, ResolverConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// What to do when a document's front matter cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Fail the whole load, reporting every unparsable document
    #[default]
    Abort,
    /// Log a warning and leave the document out
    Skip,
}

/// Configuration for the content loader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory all content targets are resolved against
    pub root: PathBuf,
    /// File extensions treated as content, without the dot
    pub extensions: Vec<String>,
    /// Line that ends a document's excerpt, e.g. `<!-- more -->`
    pub excerpt_separator: Option<String>,
    /// Include hidden files and directories
    pub include_hidden: bool,
    /// Follow symbolic links while walking directories
    pub follow_links: bool,
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<u64>,
    pub on_parse_error: ParseErrorPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content"),
            extensions: ResolverConfig::default().include_extensions,
            excerpt_separator: None,
            include_hidden: false,
            follow_links: false,
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
            on_parse_error: ParseErrorPolicy::Abort,
        }
    }
}

impl LoaderConfig {
    /// Default configuration rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }
}

/// Reads documents below a configured root
pub struct ContentLoader {
    config: LoaderConfig,
    resolver: FileResolver,
    parser: FrontMatterParser,
}

impl ContentLoader {
    pub fn new(config: LoaderConfig) -> Self {
        let resolver = FileResolver::with_config(ResolverConfig {
            follow_links: config.follow_links,
            include_hidden: config.include_hidden,
            include_extensions: config.extensions.clone(),
        });
        let parser = FrontMatterParser::new()
            .with_excerpt_separator(config.excerpt_separator.clone())
            .with_max_file_size(config.max_file_size);

        Self {
            config,
            resolver,
            parser,
        }
    }

    /// Load the document(s) a target names
    ///
    /// Segments are joined below the root; each may itself contain `/`.
    /// Two files mapping to the same document path (`a.md` and `a.mdx`)
    /// fail the load.
    pub fn load<S: AsRef<str>>(&self, segments: &[S], deep: bool) -> Result<Vec<Document>> {
        let target = self.target_path(segments)?;
        let files = self.resolver.resolve(&target, deep)?.into_files();

        let mut documents = Vec::with_capacity(files.len());
        let mut parse_errors = Vec::new();
        let mut sources: HashMap<String, PathBuf> = HashMap::new();
        for file in files {
            match self.load_file(&file) {
                Ok(document) => {
                    if let Some(previous) = sources.insert(document.path.clone(), file.clone()) {
                        return Err(ContentError::path_resolution(format!(
                            "{} and {} both resolve to {}",
                            previous.display(),
                            file.display(),
                            document.path
                        )));
                    }
                    documents.push(document);
                }
                Err(err) if err.kind() == ErrorKind::Parse => match self.config.on_parse_error {
                    ParseErrorPolicy::Skip => {
                        log::warn!("skipping {}: {}", file.display(), err);
                    }
                    ParseErrorPolicy::Abort => parse_errors.push(err),
                },
                Err(err) => return Err(err),
            }
        }

        if parse_errors.len() > 1 {
            return Err(ContentError::multiple(parse_errors));
        }
        if let Some(err) = parse_errors.pop() {
            return Err(err);
        }

        log::debug!(
            "loaded {} documents from {}",
            documents.len(),
            target.display()
        );
        Ok(documents)
    }

    /// Load a single file that lives below the root
    pub fn load_file(&self, file: &Path) -> Result<Document> {
        let parsed = self.parser.read_file(file)?;
        let relative = file.strip_prefix(&self.config.root).map_err(|_| {
            ContentError::path_resolution(format!(
                "{} is outside the content root {}",
                file.display(),
                self.config.root.display()
            ))
        })?;

        let extension = relative
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_string();
        let stem = relative.with_extension("");
        let path = stem
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        Ok(Document::new(
            &path,
            extension,
            parsed.data,
            parsed.content,
            parsed.excerpt,
        ))
    }

    fn target_path<S: AsRef<str>>(&self, segments: &[S]) -> Result<PathBuf> {
        let mut target = self.config.root.clone();
        for segment in segments {
            for part in segment.as_ref().split(['/', '\\']) {
                match part {
                    "" | "." => continue,
                    ".." => {
                        return Err(ContentError::path_resolution(format!(
                            "'{}' escapes the content root",
                            segment.as_ref()
                        )))
                    }
                    part => target.push(part),
                }
            }
        }
        Ok(target)
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}
