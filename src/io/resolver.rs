//! Resolution of content targets to files
//!
//! A target is a sequence of path segments below the content root. It may
//! name a directory, a file, or a file without its extension.

use crate::error::{ContentError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for file resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Follow symbolic links
    pub follow_links: bool,
    /// Include hidden files (starting with .)
    pub include_hidden: bool,
    /// File extensions to include, without the dot
    pub include_extensions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            include_hidden: false,
            include_extensions: vec!["md".to_string(), "mdx".to_string(), "markdown".to_string()],
        }
    }
}

/// What a target resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A single file, named directly or by its extension-less stem
    File(PathBuf),
    /// The matching files of a directory, sorted by path
    Directory(Vec<PathBuf>),
}

impl Resolved {
    /// All files regardless of how the target resolved
    pub fn into_files(self) -> Vec<PathBuf> {
        match self {
            Self::File(file) => vec![file],
            Self::Directory(files) => files,
        }
    }
}

/// File resolver for content targets
pub struct FileResolver {
    config: ResolverConfig,
}

impl FileResolver {
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolve `target` (already joined onto the root)
    ///
    /// Directories are listed one level deep unless `deep` is set.
    pub fn resolve(&self, target: &Path, deep: bool) -> Result<Resolved> {
        if target.is_dir() {
            return Ok(Resolved::Directory(self.traverse_directory(target, deep)?));
        }

        if target.is_file() {
            return Ok(Resolved::File(target.to_path_buf()));
        }

        if target.extension().is_none() || !self.has_allowed_extension(target) {
            for ext in &self.config.include_extensions {
                let candidate = append_extension(target, ext);
                if candidate.is_file() {
                    log::debug!("resolved {} to {}", target.display(), candidate.display());
                    return Ok(Resolved::File(candidate));
                }
            }
        }

        Err(ContentError::file_not_found(target))
    }

    fn traverse_directory(&self, dir_path: &Path, deep: bool) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(dir_path)
            .follow_links(self.config.follow_links)
            .max_depth(if deep { usize::MAX } else { 1 })
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || self.config.include_hidden || !is_hidden(entry.path())
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                ContentError::path_resolution(format!("Error traversing directory: {}", e))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            if self.has_allowed_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        log::debug!("found {} files under {}", files.len(), dir_path.display());
        Ok(files)
    }

    /// Check a file's extension against the allow-list (case-insensitive)
    pub fn has_allowed_extension(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        self.config
            .include_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
