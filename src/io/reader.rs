//! Front matter parsing
//!
//! gray_matter splits the front matter block from the body; the block itself
//! is decoded with serde_yaml so malformed YAML surfaces as an error instead
//! of silently becoming empty data.

use crate::error::{ContentError, Result};
use gray_matter::{engine::YAML, Matter};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Output of [`FrontMatterParser::parse`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedContent {
    /// Decoded front matter, empty when the file has none
    pub data: Map<String, Value>,
    /// Body without the front matter block
    pub content: String,
    /// Text before the excerpt separator, if one is configured and present
    pub excerpt: Option<String>,
}

/// Front matter parser
pub struct FrontMatterParser {
    matter: Matter<YAML>,
    excerpt_separator: Option<String>,
    max_file_size: Option<u64>,
}

impl FrontMatterParser {
    pub fn new() -> Self {
        Self {
            matter: Matter::<YAML>::new(),
            excerpt_separator: None,
            max_file_size: None,
        }
    }

    /// Split excerpts at lines equal to `separator`
    pub fn with_excerpt_separator(mut self, separator: Option<String>) -> Self {
        self.excerpt_separator = separator;
        self
    }

    /// Refuse files larger than `limit` bytes
    pub fn with_max_file_size(mut self, limit: Option<u64>) -> Self {
        self.max_file_size = limit;
        self
    }

    /// Read and parse a file
    pub fn read_file(&self, path: &Path) -> Result<ParsedContent> {
        if !path.is_file() {
            return Err(ContentError::file_not_found(path));
        }

        if let Some(max_size) = self.max_file_size {
            let size = fs::metadata(path)?.len();
            if size > max_size {
                return Err(ContentError::validation(format!(
                    "File too large: {} ({} bytes, limit {} bytes)",
                    path.display(),
                    size,
                    max_size
                )));
            }
        }

        let raw = fs::read_to_string(path)?;
        self.parse_with_origin(&raw, path)
    }

    /// Parse in-memory content
    pub fn parse(&self, raw: &str) -> Result<ParsedContent> {
        self.parse_with_origin(raw, Path::new("<memory>"))
    }

    fn parse_with_origin(&self, raw: &str, origin: &Path) -> Result<ParsedContent> {
        let (data, content) = if raw.trim_start().starts_with("---") {
            let parsed = self.matter.parse(raw);
            (decode_front_matter(&parsed.matter, origin)?, parsed.content)
        } else {
            (Map::new(), raw.to_string())
        };

        let excerpt = self
            .excerpt_separator
            .as_deref()
            .and_then(|separator| extract_excerpt(&content, separator));

        Ok(ParsedContent {
            data,
            content,
            excerpt,
        })
    }
}

impl Default for FrontMatterParser {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_front_matter(block: &str, origin: &Path) -> Result<Map<String, Value>> {
    if block.trim().is_empty() {
        return Ok(Map::new());
    }

    let value: Value = serde_yaml::from_str(block)
        .map_err(|e| ContentError::invalid_front_matter(origin, e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(ContentError::invalid_front_matter(
            origin,
            format!("expected a mapping, found {}", other),
        )),
    }
}

fn extract_excerpt(content: &str, separator: &str) -> Option<String> {
    let mut excerpt = Vec::new();
    for line in content.lines() {
        if line.trim() == separator {
            return Some(excerpt.join("\n").trim().to_string());
        }
        excerpt.push(line);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".md").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_with_front_matter() {
        let content = r#"---
title: Lorem ipsum dolor sit amet?
author:
  name: Jane
tags: [rust, cli]
---
# Hello World

This is the body content."#;

        let parsed = FrontMatterParser::new().parse(content).unwrap();
        assert_eq!(parsed.data["title"], json!("Lorem ipsum dolor sit amet?"));
        assert_eq!(parsed.data["author"]["name"], json!("Jane"));
        assert_eq!(parsed.data["tags"], json!(["rust", "cli"]));
        assert_eq!(
            parsed.content.trim(),
            "# Hello World\n\nThis is the body content."
        );
        assert_eq!(parsed.excerpt, None);
    }

    #[test]
    fn test_parse_without_front_matter() {
        let content = "# Hello World\n\nJust markdown.";
        let parsed = FrontMatterParser::new().parse(content).unwrap();
        assert!(parsed.data.is_empty());
        assert_eq!(parsed.content, content);
    }

    #[test]
    fn test_malformed_front_matter_is_an_error() {
        let content = "---\ntitle: \"Test\nauthor: { name: \"John\", missing_closing_brace\n---\nBody";
        let result = FrontMatterParser::new().parse(content);
        assert!(matches!(
            result.unwrap_err(),
            ContentError::InvalidFrontMatter { .. }
        ));
    }

    #[test]
    fn test_scalar_front_matter_is_an_error() {
        let result = FrontMatterParser::new().parse("---\njust a string\n---\nBody");
        assert!(matches!(
            result.unwrap_err(),
            ContentError::InvalidFrontMatter { .. }
        ));
    }

    #[test]
    fn test_excerpt_requires_configured_separator() {
        let content = "---\ntitle: T\n---\nIntro paragraph.\n<!-- more -->\nRest of the post.";

        let plain = FrontMatterParser::new().parse(content).unwrap();
        assert_eq!(plain.excerpt, None);

        let parser = FrontMatterParser::new().with_excerpt_separator(Some("<!-- more -->".into()));
        let parsed = parser.parse(content).unwrap();
        assert_eq!(parsed.excerpt.as_deref(), Some("Intro paragraph."));

        let missing = parser.parse("---\ntitle: T\n---\nNo separator here.").unwrap();
        assert_eq!(missing.excerpt, None);
    }

    #[test]
    fn test_read_file_limits() {
        let file = create_test_file("---\ntitle: Big\n---\nBody body body body");
        let parser = FrontMatterParser::new().with_max_file_size(Some(8));
        assert!(matches!(
            parser.read_file(file.path()).unwrap_err(),
            ContentError::Validation { .. }
        ));

        let missing = FrontMatterParser::new().read_file(Path::new("/nonexistent/file.md"));
        assert!(matches!(
            missing.unwrap_err(),
            ContentError::FileNotFound { .. }
        ));
    }
}
