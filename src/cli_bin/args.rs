//! Command-line argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "frontquery",
    version,
    about = "Query a tree of markdown documents with front matter",
    long_about = "frontquery loads the markdown documents below a content root, \
                  filters, sorts and projects them, and prints the result as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch documents with their compiled content
    Fetch(FetchArgs),
    /// List the path and slug of matching documents
    Params(ParamsArgs),
    /// Print the table of contents of documents
    Toc(TocArgs),
}

/// Where to load documents from
#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    /// Path segments below the root, e.g. `articles` or `articles lorem`
    #[arg(required = true)]
    pub segments: Vec<String>,

    /// Content root directory
    #[arg(long, default_value = "content")]
    pub root: PathBuf,

    /// Descend into subdirectories
    #[arg(long)]
    pub deep: bool,

    /// Only load files with these extensions
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Include hidden files (starting with .)
    #[arg(long)]
    pub include_hidden: bool,

    /// Line marking the end of a document's excerpt
    #[arg(long, value_name = "LINE")]
    pub excerpt_separator: Option<String>,

    /// Skip documents with invalid front matter instead of failing
    #[arg(long)]
    pub skip_invalid: bool,
}

/// Operations applied to the loaded documents, in this order
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Keep documents whose search field contains every term
    #[arg(long)]
    pub search: Option<String>,

    /// Field the search runs against
    #[arg(long, default_value = "text")]
    pub search_field: String,

    /// Sort by this field, e.g. `data.date`
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,

    /// Number of documents to skip
    #[arg(long)]
    pub skip: Option<usize>,

    /// Maximum number of documents
    #[arg(long)]
    pub limit: Option<usize>,

    /// Keep only these fields
    #[arg(long, value_delimiter = ',', value_name = "FIELD")]
    pub only: Vec<String>,

    /// Remove these fields
    #[arg(long, value_delimiter = ',', value_name = "FIELD")]
    pub without: Vec<String>,

    /// Return the neighbours of this slug (or `/path`) instead
    #[arg(long, value_name = "ID")]
    pub window: Option<String>,

    /// Neighbours before the window target
    #[arg(long, default_value_t = 1)]
    pub before: usize,

    /// Neighbours after the window target
    #[arg(long, default_value_t = 1)]
    pub after: usize,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Include the raw text in the output
    #[arg(long)]
    pub text: bool,

    /// Do not compile document bodies
    #[arg(long)]
    pub skip_compile: bool,

    /// Produce compact compiled output
    #[arg(long)]
    pub minify: bool,

    /// Fail on the first compile error instead of reporting it per document
    #[arg(long)]
    pub strict: bool,

    /// Only print the first result
    #[arg(long)]
    pub first: bool,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct ParamsArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct TocArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    /// Print JSON instead of an indented outline
    #[arg(long)]
    pub json: bool,
}
