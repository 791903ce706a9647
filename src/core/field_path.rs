//! Dotted field paths addressing values inside a record
//!
//! A [`FieldPath`] names a location such as `data.author.name` or
//! `data.tags.0`. Dot notation, bracket notation (`data['title']`) and quoted
//! keys (`data."key.with.dots"`) are accepted; numeric segments index arrays
//! when resolved against one.

use crate::error::{ContentError, Result};
use std::fmt;

/// A parsed field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Create an empty path, which addresses the whole record
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a path from a single literal key
    pub fn single(key: impl Into<String>) -> Self {
        Self {
            segments: vec![key.into()],
        }
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Parse a path, reporting malformed brackets or quotes
    pub fn parse(input: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut parser = PathParser::new(input);

        while !parser.is_at_end() {
            let segment = parser.parse_segment()?;
            if !segment.is_empty() {
                segments.push(segment);
            }
        }

        Ok(Self::from_segments(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render in dot notation, quoting keys that contain dots
    pub fn to_dot_notation(&self) -> String {
        self.segments
            .iter()
            .map(|s| {
                if s.contains('.') || s.contains('"') {
                    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
                } else {
                    s.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dot_notation())
    }
}

// Query methods take plain strings; a malformed path degrades to a literal
// key that resolves to nothing instead of failing the chain.
impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|_| Self::single(s))
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&String> for FieldPath {
    fn from(s: &String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Vec<String>> for FieldPath {
    fn from(segments: Vec<String>) -> Self {
        Self::from_segments(segments)
    }
}

struct PathParser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> PathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
        }
    }

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn parse_segment(&mut self) -> Result<String> {
        self.skip_whitespace();

        match self.chars.peek().copied() {
            None => Ok(String::new()),
            Some('.') => {
                self.chars.next();
                Ok(String::new())
            }
            Some('[') => self.parse_bracket_segment(),
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                self.parse_quoted(quote)
            }
            Some(_) => Ok(self.parse_bare()),
        }
    }

    fn parse_bracket_segment(&mut self) -> Result<String> {
        self.chars.next();
        self.skip_whitespace();

        let segment = match self.chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                self.parse_quoted(quote)?
            }
            _ => {
                let mut content = String::new();
                while let Some(&ch) = self.chars.peek() {
                    if ch == ']' {
                        break;
                    }
                    content.push(ch);
                    self.chars.next();
                }
                content.trim().to_string()
            }
        };

        self.skip_whitespace();
        match self.chars.next() {
            Some(']') => Ok(segment),
            _ => Err(ContentError::invalid_field_path(
                self.input,
                "missing closing bracket",
            )),
        }
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String> {
        let mut result = String::new();

        while let Some(ch) = self.chars.next() {
            match ch {
                '\\' => match self.chars.next() {
                    Some(escaped) => result.push(escaped),
                    None => break,
                },
                c if c == quote => return Ok(result),
                c => result.push(c),
            }
        }

        Err(ContentError::invalid_field_path(
            self.input,
            "unterminated quoted key",
        ))
    }

    fn parse_bare(&mut self) -> String {
        let mut result = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch == '.' || ch == '[' {
                break;
            }
            result.push(ch);
            self.chars.next();
        }

        result.trim().to_string()
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }
}
