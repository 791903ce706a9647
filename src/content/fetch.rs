//! Materializing query results
//!
//! [`ContentQuery`] wraps a [`Query`] with a [`Compiler`]. Its terminals run
//! the query and turn every surviving record into a [`FetchResult`] carrying
//! the compiled body.

use crate::content::compiler::{CompileOptions, Compiler};
use crate::core::{Direction, FieldPath};
use crate::error::{ContentError, Result};
use crate::query::{ContentParams, Query, Verdict, WindowOptions};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Top-level fields the compiler reads
const SOURCE_FIELDS: [&str; 2] = ["text", "excerpt"];

/// What to do when the compiler fails on a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileFailurePolicy {
    /// Record the failure on the document and carry on
    #[default]
    Isolate,
    /// Fail the whole fetch
    Abort,
}

/// Options for [`ContentQuery::fetch`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Keep the raw `text` and `excerpt` in the results
    pub text: bool,
    /// Return records without compiling them
    pub skip_compile: bool,
    /// Pass every result through a JSON encode/decode round trip
    pub json_safe: bool,
    pub on_compile_error: CompileFailurePolicy,
}

/// One fetched document
///
/// The record's own fields are flattened next to the compiled output, so a
/// result serializes as `{ "data": .., "path": .., "compiledContent": .. }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(
        rename = "compiledContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub compiled_content: Option<String>,
    #[serde(
        rename = "compiledExcerpt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub compiled_excerpt: Option<String>,
    #[serde(
        rename = "compileError",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub compile_error: Option<String>,
}

impl FetchResult {
    pub fn path(&self) -> Option<&str> {
        self.fields.get("path").and_then(Value::as_str)
    }

    /// Slug segments; a string slug is split on `/`
    pub fn slug(&self) -> Vec<String> {
        match self.fields.get("slug") {
            Some(Value::Array(segments)) => segments
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            Some(Value::String(slug)) => slug
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Front matter, if the record still carries it
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.fields.get("data").and_then(Value::as_object)
    }

    pub fn text(&self) -> Option<&str> {
        self.fields.get("text").and_then(Value::as_str)
    }

    /// Deserialize the front matter into a typed struct
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self
            .fields
            .get("data")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        Ok(serde_json::from_value(data)?)
    }

    /// Back to a plain record, compiled fields included
    pub fn to_record(&self) -> Value {
        let mut record = self.fields.clone();
        let compiled = [
            ("compiledContent", &self.compiled_content),
            ("compiledExcerpt", &self.compiled_excerpt),
            ("compileError", &self.compile_error),
        ];
        for (key, value) in compiled {
            if let Some(value) = value {
                record.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        Value::Object(record)
    }
}

/// A query whose terminals compile the surviving documents
#[derive(Clone)]
pub struct ContentQuery {
    query: Query,
    compiler: Arc<dyn Compiler>,
    compile_options: CompileOptions,
    defaults: FetchOptions,
}

impl ContentQuery {
    pub fn new(query: Query, compiler: Arc<dyn Compiler>) -> Self {
        Self {
            query,
            compiler,
            compile_options: CompileOptions::default(),
            defaults: FetchOptions::default(),
        }
    }

    pub fn with_compile_options(mut self, options: CompileOptions) -> Self {
        self.compile_options = options;
        self
    }

    /// Options used by terminals called with `None`
    pub fn with_defaults(mut self, defaults: FetchOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn skip(mut self, n: usize) -> Self {
        self.query = self.query.skip(n);
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.query = self.query.limit(n);
        self
    }

    pub fn project<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldPath>,
    {
        self.query = self.query.project(fields);
        self
    }

    pub fn exclude<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldPath>,
    {
        self.query = self.query.exclude(fields);
        self
    }

    pub fn search(mut self, field: impl Into<FieldPath>, query: impl Into<String>) -> Self {
        self.query = self.query.search(field, query);
        self
    }

    pub fn sort(mut self, field: impl Into<FieldPath>, direction: Direction) -> Self {
        self.query = self.query.sort(field, direction);
        self
    }

    pub fn window(mut self, target: impl Into<String>, options: WindowOptions) -> Self {
        self.query = self.query.window(target, options);
        self
    }

    pub fn transform<F, V>(mut self, callback: F) -> Self
    where
        F: Fn(&Value) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.query = self.query.transform(callback);
        self
    }

    pub fn transform_field<F, V>(mut self, field: impl Into<FieldPath>, callback: F) -> Self
    where
        F: Fn(&Value) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.query = self.query.transform_field(field, callback);
        self
    }

    /// Run the query and compile every surviving document, in order
    ///
    /// Placeholder slots left by a window come back as `None`.
    pub async fn fetch(&mut self, options: Option<FetchOptions>) -> Result<Vec<Option<FetchResult>>> {
        let options = options.unwrap_or(self.defaults);
        let hidden = self.reveal_sources(&options);
        let entries = self.query.apply();

        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                Some(record) => results.push(Some(self.materialize(record, &options, &hidden).await?)),
                None => results.push(None),
            }
        }

        log::debug!(
            "fetched {} documents with {}",
            results.len(),
            self.compiler.name()
        );
        Ok(results)
    }

    /// Like [`fetch`](Self::fetch) for the first entry only
    pub async fn first(&mut self, options: Option<FetchOptions>) -> Result<Option<FetchResult>> {
        let options = options.unwrap_or(self.defaults);
        let hidden = self.reveal_sources(&options);
        match self.query.first() {
            Some(record) => Ok(Some(self.materialize(record, &options, &hidden).await?)),
            None => Ok(None),
        }
    }

    /// `path` and `slug` of every surviving document, without compiling
    pub fn params(&mut self) -> Result<Vec<ContentParams>> {
        self.query.params()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Keep the compiler's sources in the records until they are compiled
    fn reveal_sources(&mut self, options: &FetchOptions) -> Vec<String> {
        if options.skip_compile {
            return Vec::new();
        }
        self.query.reveal(&SOURCE_FIELDS)
    }

    async fn materialize(
        &self,
        record: Value,
        options: &FetchOptions,
        hidden: &[String],
    ) -> Result<FetchResult> {
        let mut fields = match record {
            Value::Object(fields) => fields,
            other => {
                return Err(ContentError::validation(format!(
                    "cannot fetch a non-object record: {}",
                    other
                )))
            }
        };

        let path = fields
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();
        let mut result = FetchResult::default();

        if !options.skip_compile {
            if !fields.contains_key("text") {
                log::debug!("{} has no text to compile", path);
            }
            let sources = [
                (fields.get("text").and_then(Value::as_str), &mut result.compiled_content),
                (fields.get("excerpt").and_then(Value::as_str), &mut result.compiled_excerpt),
            ];
            for (source, slot) in sources {
                let Some(source) = source else { continue };
                match self.compiler.compile(source, &self.compile_options).await {
                    Ok(output) => *slot = Some(output),
                    Err(err)
                        if options.on_compile_error == CompileFailurePolicy::Isolate
                            && err.is_recoverable() =>
                    {
                        log::warn!("compile of {} failed: {}", path, err);
                        result.compile_error = Some(err.to_string());
                        break;
                    }
                    Err(err @ ContentError::CompileFailed { .. }) => return Err(err),
                    Err(other) => return Err(ContentError::compile_failed(&path, other.to_string())),
                }
            }
        }

        for key in SOURCE_FIELDS {
            if !options.text || hidden.iter().any(|hidden| hidden == key) {
                fields.shift_remove(key);
            }
        }
        result.fields = fields;

        if options.json_safe {
            let encoded = serde_json::to_string(&result)?;
            result = serde_json::from_str(&encoded)?;
        }
        Ok(result)
    }
}

impl fmt::Debug for ContentQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentQuery")
            .field("query", &self.query)
            .field("compiler", &self.compiler.name())
            .field("compile_options", &self.compile_options)
            .field("defaults", &self.defaults)
            .finish()
    }
}
