//! Integration tests for the frontquery library
//!
//! These tests load a small content tree from disk and run it through the
//! whole pipeline: resolution, parsing, querying and compilation.

use frontquery::*;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[derive(Debug, Deserialize)]
struct ArticleFrontMatter {
    title: String,
    description: String,
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn content_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(
        root,
        "articles/lorem.mdx",
        r#"---
title: Lorem ipsum dolor sit amet?
description: Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nam aliquam.
date: 2021-03-01
---
# Lorem ipsum

Lorem ipsum dolor sit amet.

<!-- more -->

## Details

More lorem.
"#,
    );
    write(
        root,
        "articles/react/what-is-react.mdx",
        r#"---
title: What is React?
description: A JavaScript library for building user interfaces.
date: 2021-01-15
---
# What is React

React is a library.

```js
# not a heading
```
"#,
    );
    write(root, "articles/.draft.mdx", "---\ntitle: Hidden\n---\nSecret");
    write(root, "articles/notes.txt", "not content");

    temp_dir
}

fn manager(root: &Path) -> ContentManager {
    ContentManager::new(LoaderConfig::with_root(root))
}

#[tokio::test]
async fn test_fetch_single_article_with_text() {
    let temp_dir = content_tree();
    let mut query = manager(temp_dir.path())
        .content(&["articles", "lorem"], ContentOptions { deep: false, text: true })
        .unwrap();

    let results = query.fetch(None).await.unwrap();
    assert_eq!(results.len(), 1);
    let lorem = results[0].as_ref().unwrap();

    let front: ArticleFrontMatter = lorem.data_as().unwrap();
    assert_eq!(front.title.trim(), "Lorem ipsum dolor sit amet?");
    assert_eq!(
        front.description.trim(),
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nam aliquam."
    );

    let text = lorem.text().unwrap();
    let expected = LiteralCompiler
        .compile(text, &CompileOptions::default())
        .await
        .unwrap();
    assert_eq!(lorem.compiled_content.as_deref(), Some(expected.as_str()));
}

#[tokio::test]
async fn test_deep_fetch_with_queries() {
    let temp_dir = content_tree();
    let mut query = manager(temp_dir.path())
        .content(&["articles"], ContentOptions { deep: true, text: true })
        .unwrap()
        .sort("text", Direction::Asc)
        .project(["data", "text"])
        .exclude(["data.description"])
        .limit(2);

    let articles = query.fetch(None).await.unwrap();
    assert_eq!(articles.len(), 2);

    let first = articles[0].as_ref().unwrap();
    assert!(first.text().is_some());
    let data = first.data().unwrap();
    assert!(data.contains_key("title"));
    assert!(!data.contains_key("description"));
    assert_eq!(first.path(), None);
}

#[test]
fn test_params_deep() {
    let temp_dir = content_tree();
    let params = manager(temp_dir.path())
        .content(&["articles"], ContentOptions { deep: true, text: false })
        .unwrap()
        .params()
        .unwrap();

    let paths: Vec<_> = params.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["/articles/lorem", "/articles/react/what-is-react"]);
    assert_eq!(params[1].slug, vec!["articles", "react", "what-is-react"]);
}

#[test]
fn test_shallow_load_skips_subdirectories() {
    let temp_dir = content_tree();
    let params = manager(temp_dir.path())
        .content(&["articles"], ContentOptions::default())
        .unwrap()
        .params()
        .unwrap();

    assert_eq!(
        params,
        vec![ContentParams {
            path: "/articles/lorem".to_string(),
            slug: vec!["articles".to_string(), "lorem".to_string()],
        }]
    );
}

#[tokio::test]
async fn test_window_returns_neighbours() {
    let temp_dir = content_tree();
    let mut query = manager(temp_dir.path())
        .content(&["articles"], ContentOptions { deep: true, text: false })
        .unwrap()
        .sort("data.date", Direction::Asc)
        .limit(1)
        .project(["data.title"])
        .window("articles/react/what-is-react", WindowOptions { before: 1, after: 1 });

    let results = query.fetch(Some(FetchOptions { skip_compile: true, ..Default::default() })).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_none());

    let next = results[1].as_ref().unwrap();
    assert_eq!(next.path(), Some("/articles/lorem"));
    assert_eq!(next.data().unwrap()["title"], "Lorem ipsum dolor sit amet?");
}

#[test]
fn test_toc_and_excerpt() {
    let temp_dir = content_tree();
    let loader = ContentLoader::new(LoaderConfig {
        excerpt_separator: Some("<!-- more -->".to_string()),
        ..LoaderConfig::with_root(temp_dir.path())
    });

    let documents = loader.load(&["articles"], true).unwrap();
    let lorem = &documents[0];
    assert_eq!(
        lorem.excerpt.as_deref(),
        Some("# Lorem ipsum\n\nLorem ipsum dolor sit amet.")
    );
    let ids: Vec<_> = lorem.toc.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["lorem-ipsum", "details"]);

    let react = &documents[1];
    assert_eq!(react.excerpt, None);
    assert_eq!(react.toc.len(), 1);
    assert_eq!(react.toc[0].text, "What is React");
}

#[tokio::test]
async fn test_requery_serialized_results() {
    let temp_dir = content_tree();
    let mut query = manager(temp_dir.path())
        .content(&["articles"], ContentOptions { deep: true, text: false })
        .unwrap();
    let fetched: Vec<FetchResult> = query
        .fetch(Some(FetchOptions { json_safe: true, ..Default::default() }))
        .await
        .unwrap()
        .into_iter()
        .flatten()
        .collect();

    let serialized = serde_json::to_string(&fetched).unwrap();
    let restored: Vec<FetchResult> = serde_json::from_str(&serialized).unwrap();
    assert_eq!(restored, fetched);

    let mut requery = Query::from_results(&restored)
        .search("data.description", "javascript")
        .project(["path"]);
    assert_eq!(
        requery.first(),
        Some(serde_json::json!({ "path": "/articles/react/what-is-react" }))
    );
}

#[test]
fn test_error_handling() {
    let temp_dir = content_tree();
    write(temp_dir.path(), "broken/bad.md", "---\ntitle: [oops\n---\nBody");
    write(temp_dir.path(), "broken/good.md", "---\ntitle: Fine\n---\nBody");

    let strict = manager(temp_dir.path());
    let err = strict
        .content(&["broken"], ContentOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let lenient = ContentManager::new(LoaderConfig {
        on_parse_error: ParseErrorPolicy::Skip,
        ..LoaderConfig::with_root(temp_dir.path())
    });
    let params = lenient
        .content(&["broken"], ContentOptions::default())
        .unwrap()
        .params()
        .unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].path, "/broken/good");

    let missing = strict
        .content(&["articles", "nope"], ContentOptions::default())
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Load);
}
