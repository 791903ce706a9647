//! The document record produced by the loader
//!
//! A [`Document`] is one parsed content file: its front matter, its body
//! text, and identifiers derived from its location under the content root.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// One heading in a document's table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub depth: u8,
    pub text: String,
    pub id: String,
}

/// A parsed content file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Front matter fields
    pub data: Map<String, Value>,
    /// Body without the front matter block
    pub text: String,
    /// Leading part of the body, when an excerpt separator was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Root-relative location without extension, e.g. `/articles/lorem`
    pub path: String,
    /// `path` split into segments, e.g. `["articles", "lorem"]`
    pub slug: Vec<String>,
    /// Parent of `path`, `/` for top-level documents
    pub dir: String,
    /// File extension without the dot
    pub extension: String,
    pub toc: Vec<TocEntry>,
}

impl Document {
    /// Build a document from its parts, deriving slug, dir and toc
    ///
    /// `path` is normalized to start with `/` and use `/` separators.
    pub fn new(
        path: &str,
        extension: impl Into<String>,
        data: Map<String, Value>,
        text: String,
        excerpt: Option<String>,
    ) -> Self {
        let path = normalize_path(path);
        let slug = slug_of(&path);
        let dir = match path.rfind('/') {
            Some(0) | None => "/".to_string(),
            Some(index) => path[..index].to_string(),
        };
        let toc = parse_toc(&text);

        Self {
            data,
            text,
            excerpt,
            path,
            slug,
            dir,
            extension: extension.into(),
            toc,
        }
    }

    /// The slug joined back with `/`, e.g. `articles/lorem`
    pub fn slug_str(&self) -> String {
        self.slug.join("/")
    }

    /// Convert into the JSON record the query engine operates on
    pub fn to_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("data".into(), Value::Object(self.data.clone()));
        record.insert("text".into(), Value::String(self.text.clone()));
        if let Some(excerpt) = &self.excerpt {
            record.insert("excerpt".into(), Value::String(excerpt.clone()));
        }
        record.insert("path".into(), Value::String(self.path.clone()));
        record.insert(
            "slug".into(),
            Value::Array(self.slug.iter().cloned().map(Value::String).collect()),
        );
        record.insert("dir".into(), Value::String(self.dir.clone()));
        record.insert("extension".into(), Value::String(self.extension.clone()));
        record.insert(
            "toc".into(),
            Value::Array(
                self.toc
                    .iter()
                    .map(|entry| {
                        let mut map = Map::new();
                        map.insert("depth".into(), Value::from(entry.depth));
                        map.insert("text".into(), Value::String(entry.text.clone()));
                        map.insert("id".into(), Value::String(entry.id.clone()));
                        Value::Object(map)
                    })
                    .collect(),
            ),
        );
        Value::Object(record)
    }
}

fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

fn slug_of(path: &str) -> Vec<String> {
    path.split('/')
        .skip(1)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn heading_pattern() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(r"^\s{0,3}(#{1,6})\s+(.+?)(?:\s+#+)?\s*$").expect("heading pattern is valid")
    })
}

/// Collect ATX headings in document order, skipping fenced code blocks
pub fn parse_toc(text: &str) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    let mut fence: Option<&str> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        if let Some(captures) = heading_pattern().captures(line) {
            let text = captures[2].trim().to_string();
            toc.push(TocEntry {
                depth: captures[1].len() as u8,
                id: heading_id(&text),
                text,
            });
        }
    }

    toc
}

/// Lowercase the heading, turn whitespace into dashes and drop symbols
pub fn heading_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            id.extend(c.to_lowercase());
        } else if c.is_whitespace() && !id.ends_with('-') {
            id.push('-');
        }
    }
    id
}
