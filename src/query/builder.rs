//! Fluent query builder
//!
//! A [`Query`] records operations without running them. [`Query::apply`]
//! executes the log against a copy of the backing collection and then clears
//! it, so the same builder can start a new chain.

use crate::content::FetchResult;
use crate::core::{Direction, Document, FieldPath};
use crate::error::{ContentError, Result};
use crate::query::filters::{self, Entry};
use crate::query::operation::{QueryOperation, TransformFn, Verdict, WindowOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Identifiers of a document, as returned by [`Query::params`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentParams {
    pub path: String,
    pub slug: Vec<String>,
}

const IDENTITY_FIELDS: [&str; 2] = ["slug", "path"];

/// Query over a shared, immutable collection of records
#[derive(Debug, Clone)]
pub struct Query {
    source: Arc<[Value]>,
    operations: Vec<QueryOperation>,
    windowed: bool,
}

impl Query {
    /// Query over raw JSON records
    pub fn from_values(records: impl IntoIterator<Item = Value>) -> Self {
        Self {
            source: records.into_iter().collect(),
            operations: Vec::new(),
            windowed: false,
        }
    }

    pub fn from_documents(documents: &[Document]) -> Self {
        Self::from_values(documents.iter().map(Document::to_record))
    }

    /// Query over previously fetched results, without compiling again
    pub fn from_results(results: &[FetchResult]) -> Self {
        Self::from_values(results.iter().map(FetchResult::to_record))
    }

    /// Skip the first `n` records
    pub fn skip(mut self, n: usize) -> Self {
        self.operations.push(QueryOperation::Skip(n));
        self
    }

    /// Keep at most `n` records
    pub fn limit(mut self, n: usize) -> Self {
        self.operations.push(QueryOperation::Limit(n));
        self
    }

    /// Keep only the given fields
    pub fn project<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldPath>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.operations.push(QueryOperation::Project(fields));
        self
    }

    /// Remove the given fields
    pub fn exclude<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldPath>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.operations.push(QueryOperation::Exclude(fields));
        self
    }

    /// Keep records whose `field` contains every term of `query`
    pub fn search(mut self, field: impl Into<FieldPath>, query: impl Into<String>) -> Self {
        self.operations.push(QueryOperation::Search {
            field: field.into(),
            query: query.into(),
        });
        self
    }

    pub fn sort(mut self, field: impl Into<FieldPath>, direction: Direction) -> Self {
        self.operations.push(QueryOperation::Sort {
            field: field.into(),
            direction,
        });
        self
    }

    /// Replace the result by the neighbours of the record `target`
    ///
    /// Queuing a window discards every `skip`, `limit` and `search` of the
    /// chain and keeps `slug` and `path` visible through `project`/`exclude`.
    pub fn window(mut self, target: impl Into<String>, options: WindowOptions) -> Self {
        self.operations.push(QueryOperation::Window {
            target: target.into(),
            options,
        });
        self.windowed = true;
        self
    }

    /// Filter or replace whole records
    pub fn transform<F, V>(self, callback: F) -> Self
    where
        F: Fn(&Value) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.push_transform(None, callback)
    }

    /// Filter records or rewrite the value at `field`
    pub fn transform_field<F, V>(self, field: impl Into<FieldPath>, callback: F) -> Self
    where
        F: Fn(&Value) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.push_transform(Some(field.into()), callback)
    }

    fn push_transform<F, V>(mut self, field: Option<FieldPath>, callback: F) -> Self
    where
        F: Fn(&Value) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        let callback: TransformFn = Arc::new(move |value| callback(value).into());
        self.operations
            .push(QueryOperation::Transform { field, callback });
        self
    }

    /// Execute the recorded operations and clear them
    pub fn apply(&mut self) -> Vec<Entry> {
        let operations = self.take_operations();
        let mut entries: Vec<Entry> = self.source.iter().cloned().map(Some).collect();

        for operation in &operations {
            entries = filters::run(operation, entries);
        }

        log::debug!(
            "applied {} operations to {} records, {} left",
            operations.len(),
            self.source.len(),
            entries.len()
        );
        entries
    }

    /// First entry of the result, `None` when it is empty or a placeholder
    pub fn first(&mut self) -> Option<Value> {
        self.apply().into_iter().next().flatten()
    }

    /// `path` and `slug` of every record in the result
    pub fn params(&mut self) -> Result<Vec<ContentParams>> {
        self.operations.push(QueryOperation::Project(
            IDENTITY_FIELDS.iter().map(|key| FieldPath::single(*key)).collect(),
        ));

        self.apply()
            .into_iter()
            .flatten()
            .map(|record| serde_json::from_value(record).map_err(ContentError::from))
            .collect()
    }

    /// Operations recorded since the last evaluation
    pub fn operations(&self) -> &[QueryOperation] {
        &self.operations
    }

    /// Rewrite the recorded `project`/`exclude` so the top-level `keys` survive
    ///
    /// Returns the keys the chain would otherwise have removed.
    pub(crate) fn reveal(&mut self, keys: &[&str]) -> Vec<String> {
        let mut hidden: Vec<String> = Vec::new();
        let operations = std::mem::take(&mut self.operations);
        self.operations = operations
            .into_iter()
            .map(|operation| {
                let (operation, removed) = keep_visible(operation, keys);
                for key in removed {
                    if !hidden.contains(&key) {
                        hidden.push(key);
                    }
                }
                operation
            })
            .collect();
        hidden
    }

    /// Drain the log, applying the rewrites a queued window requires
    fn take_operations(&mut self) -> Vec<QueryOperation> {
        let operations = std::mem::take(&mut self.operations);
        if !std::mem::take(&mut self.windowed) {
            return operations;
        }

        operations
            .into_iter()
            .filter_map(|operation| match operation {
                QueryOperation::Skip(_)
                | QueryOperation::Limit(_)
                | QueryOperation::Search { .. } => {
                    log::debug!("window queued, dropping {}", operation.name());
                    None
                }
                other => Some(keep_visible(other, &IDENTITY_FIELDS).0),
            })
            .collect()
    }
}

/// Widen a `project` or narrow an `exclude` so `keys` stay in the record
fn keep_visible(operation: QueryOperation, keys: &[&str]) -> (QueryOperation, Vec<String>) {
    match operation {
        QueryOperation::Project(mut fields) => {
            let mut hidden = Vec::new();
            for key in keys {
                let field = FieldPath::single(*key);
                if !fields.contains(&field) {
                    fields.push(field);
                    hidden.push(key.to_string());
                }
            }
            (QueryOperation::Project(fields), hidden)
        }
        QueryOperation::Exclude(fields) => {
            let (removed, kept): (Vec<FieldPath>, Vec<FieldPath>) = fields
                .into_iter()
                .partition(|field| keys.iter().any(|key| field.segments() == [*key]));
            let hidden = removed
                .into_iter()
                .filter_map(|field| field.segments().first().cloned())
                .collect();
            (QueryOperation::Exclude(kept), hidden)
        }
        other => (other, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn collection() -> Query {
        Query::from_values(["A", "B", "C", "D", "E"].iter().enumerate().map(|(i, slug)| {
            json!({
                "slug": [slug],
                "path": format!("/{}", slug),
                "data": { "order": i, "draft": i % 2 == 1 },
                "text": format!("body of {}", slug),
            })
        }))
    }

    fn slugs(entries: &[Entry]) -> Vec<Option<&str>> {
        entries
            .iter()
            .map(|e| e.as_ref().and_then(|r| r["slug"][0].as_str()))
            .collect()
    }

    #[test]
    fn test_apply_twice_without_operations() {
        let mut query = collection();
        let first = query.apply();
        let second = query.apply();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_apply_clears_log() {
        let mut query = collection().skip(1).limit(2);
        assert_eq!(query.operations().len(), 2);
        assert_eq!(slugs(&query.apply()), vec![Some("B"), Some("C")]);
        assert!(query.operations().is_empty());
        assert_eq!(query.apply().len(), 5);
    }

    #[test]
    fn test_skip_limit_clamped() {
        assert_eq!(
            slugs(&collection().skip(3).limit(10).apply()),
            vec![Some("D"), Some("E")]
        );
        assert!(collection().skip(9).apply().is_empty());
    }

    #[test]
    fn test_project_then_exclude_is_empty() {
        let result = collection().project(["data"]).exclude(["data"]).apply();
        assert!(result.iter().all(|e| e == &Some(json!({}))));

        let result = collection().exclude(["text"]).project(["text"]).apply();
        assert!(result.iter().all(|e| e == &Some(json!({}))));
    }

    #[test]
    fn test_window_ignores_limit_and_keeps_identity() {
        let result = collection()
            .limit(1)
            .project(["data.order"])
            .exclude(["slug", "text"])
            .window("C", WindowOptions { before: 2, after: 1 })
            .apply();

        assert_eq!(slugs(&result), vec![Some("B"), Some("A"), Some("D")]);
        assert_eq!(
            result[0],
            Some(json!({ "data": { "order": 1 }, "slug": ["B"], "path": "/B" }))
        );
    }

    #[test]
    fn test_reveal_reports_removed_keys() {
        let mut query = collection().project(["data.order"]).exclude(["text", "data"]);
        let hidden = query.reveal(&["text", "excerpt"]);
        assert_eq!(hidden, vec!["text", "excerpt"]);

        let result = query.apply();
        assert_eq!(result[0], Some(json!({ "text": "body of A" })));

        let mut untouched = collection().project(["text", "path"]);
        assert!(untouched.reveal(&["text"]).is_empty());
    }

    #[test]
    fn test_window_missing_target() {
        let result = collection().window("Z", WindowOptions::default()).apply();
        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_transform_drops_drafts() {
        let result = collection()
            .transform(|doc| {
                if doc["data"]["draft"] == json!(true) {
                    Verdict::Drop
                } else {
                    Verdict::Keep
                }
            })
            .apply();
        assert_eq!(slugs(&result), vec![Some("A"), Some("C"), Some("E")]);
    }

    #[test]
    fn test_transform_field_with_bool_and_value() {
        let result = collection()
            .transform_field("data.order", |order| json!(order.as_u64().unwrap_or(0) < 2))
            .transform_field("path", |path| json!(format!("/posts{}", path.as_str().unwrap())))
            .project(["path"])
            .apply();
        assert_eq!(
            result,
            vec![
                Some(json!({ "path": "/posts/A" })),
                Some(json!({ "path": "/posts/B" }))
            ]
        );
    }

    #[test]
    fn test_sort_and_search() {
        let result = collection()
            .search("text", "body")
            .sort("data.order", Direction::Desc)
            .limit(2)
            .apply();
        assert_eq!(slugs(&result), vec![Some("E"), Some("D")]);
    }

    #[test]
    fn test_first_and_params() {
        let mut query = collection();
        assert_eq!(query.first().unwrap()["path"], json!("/A"));

        let params = query.clone().skip(4).params().unwrap();
        assert_eq!(
            params,
            vec![ContentParams {
                path: "/E".into(),
                slug: vec!["E".into()]
            }]
        );

        let mut empty = Query::from_values(Vec::new());
        assert_eq!(empty.first(), None);
    }

    #[test]
    fn test_clones_do_not_share_logs() {
        let base = collection();
        let mut limited = base.clone().limit(1);
        let mut full = base;
        assert_eq!(limited.apply().len(), 1);
        assert_eq!(full.apply().len(), 5);
    }
}
