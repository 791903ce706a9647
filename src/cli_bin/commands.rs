//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::*;
use anyhow::{Context, Result};
use frontquery::content::{
    CompileFailurePolicy, CompileOptions, ContentManager, ContentOptions, ContentQuery,
    FetchOptions,
};
use frontquery::core::{Direction, FieldPath};
use frontquery::io::{LoaderConfig, ParseErrorPolicy};
use frontquery::query::WindowOptions;
use log::{debug, warn};
use serde::Serialize;

/// Execute the fetch command
pub async fn fetch_command(args: FetchArgs) -> Result<()> {
    debug!("Executing fetch command with args: {:?}", args);

    let manager = create_manager(&args.content).with_compile_options(CompileOptions {
        minify: args.minify,
        ..Default::default()
    });
    let query = open_content(&manager, &args.content, args.text)?;
    let mut query = apply_query_args(query, &args.query)?;

    let options = FetchOptions {
        text: args.text,
        skip_compile: args.skip_compile,
        json_safe: false,
        on_compile_error: if args.strict {
            CompileFailurePolicy::Abort
        } else {
            CompileFailurePolicy::Isolate
        },
    };

    if args.first {
        let result = query.first(Some(options)).await?;
        return print_json(&result, args.compact);
    }

    let results = query.fetch(Some(options)).await?;
    let failed = results
        .iter()
        .flatten()
        .filter(|result| result.compile_error.is_some())
        .count();
    if failed > 0 {
        warn!("{} documents failed to compile", failed);
    }

    print_json(&results, args.compact)
}

/// Execute the params command
pub fn params_command(args: ParamsArgs) -> Result<()> {
    debug!("Executing params command with args: {:?}", args);

    let manager = create_manager(&args.content);
    let query = open_content(&manager, &args.content, false)?;
    let params = apply_query_args(query, &args.query)?.params()?;

    print_json(&params, args.compact)
}

/// Execute the toc command
pub fn toc_command(args: TocArgs) -> Result<()> {
    debug!("Executing toc command with args: {:?}", args);

    let manager = create_manager(&args.content);
    let documents = manager
        .documents(&args.content.segments, args.content.deep)
        .with_context(|| format!("failed to load {}", args.content.segments.join("/")))?;

    if args.json {
        let tocs: Vec<_> = documents
            .iter()
            .map(|doc| serde_json::json!({ "path": doc.path, "toc": doc.toc }))
            .collect();
        return print_json(&tocs, false);
    }

    for doc in &documents {
        println!("{}", doc.path);
        for entry in &doc.toc {
            let indent = "  ".repeat(usize::from(entry.depth));
            println!("{}{} (#{})", indent, entry.text, entry.id);
        }
    }
    Ok(())
}

fn create_manager(content: &ContentArgs) -> ContentManager {
    let mut config = LoaderConfig::with_root(&content.root);
    if !content.extensions.is_empty() {
        config.extensions = content
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
    }
    config.include_hidden = content.include_hidden;
    config.excerpt_separator = content.excerpt_separator.clone();
    if content.skip_invalid {
        config.on_parse_error = ParseErrorPolicy::Skip;
    }

    ContentManager::new(config)
}

fn open_content(manager: &ContentManager, content: &ContentArgs, text: bool) -> Result<ContentQuery> {
    let options = ContentOptions {
        deep: content.deep,
        text,
    };
    manager
        .content(&content.segments, options)
        .with_context(|| {
            format!(
                "failed to load {} under {}",
                content.segments.join("/"),
                content.root.display()
            )
        })
}

fn apply_query_args(mut query: ContentQuery, args: &QueryArgs) -> Result<ContentQuery> {
    if let Some(terms) = &args.search {
        query = query.search(parse_field(&args.search_field)?, terms.as_str());
    }
    if let Some(field) = &args.sort {
        let direction = if args.desc {
            Direction::Desc
        } else {
            Direction::Asc
        };
        query = query.sort(parse_field(field)?, direction);
    }
    if let Some(n) = args.skip {
        query = query.skip(n);
    }
    if let Some(n) = args.limit {
        query = query.limit(n);
    }
    if !args.only.is_empty() {
        query = query.project(parse_fields(&args.only)?);
    }
    if !args.without.is_empty() {
        query = query.exclude(parse_fields(&args.without)?);
    }
    if let Some(target) = &args.window {
        query = query.window(
            target.as_str(),
            WindowOptions {
                before: args.before,
                after: args.after,
            },
        );
    }
    Ok(query)
}

fn parse_field(field: &str) -> Result<FieldPath> {
    FieldPath::parse(field).with_context(|| format!("invalid field '{}'", field))
}

fn parse_fields(fields: &[String]) -> Result<Vec<FieldPath>> {
    fields.iter().map(|field| parse_field(field)).collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<()> {
    let output = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", output);
    Ok(())
}
