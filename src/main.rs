use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Result, bail};
use bodystrip::{Config, DEFAULT_EXTS, run_with_config};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

/// bodystrip - strip comments from request bodies.
///
/// Cleans JSON, XML, GraphQL and plain-text bodies before they are sent,
/// leaving anything inside string literals alone.
#[derive(Parser, Debug)]
#[command(
    name = "bodystrip",
    author,
    version,
    about = "Strip comments from HTTP/GraphQL request bodies",
    long_about = r##"Strip comments from HTTP/GraphQL request bodies without touching
string literals (so "https://..." and "#hashtag" survive).

Format is chosen from the MIME type:
  • json / text/plain   → // comments
  • xml                 → <!-- --> comments
  • graphql             → # comments
  • yaml, shell, js/ts  → left untouched
  • anything else       → treated as JSON

Typical usage:
  bodystrip --mime application/json < body.json
  bodystrip requests/
  bodystrip --graphql query.txt
"##
)]
struct Args {
    /// Files or directories holding bodies. Reads stdin when omitted.
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Declared MIME type of the body, e.g. `application/json; charset=utf-8`.
    ///
    /// Applies to stdin and overrides the per-file guess made from extensions.
    #[arg(long = "mime", short = 'm', value_name = "TYPE")]
    mime_type: Option<String>,

    /// Treat every body as a GraphQL document, regardless of MIME type.
    #[arg(long = "graphql")]
    graphql: bool,

    /// File extensions to pick up when walking directories.
    ///
    /// Can be repeated or comma-separated. Defaults to json,xml,graphql,gql,txt.
    #[arg(
        short = 't',
        long = "type",
        alias = "ext",
        value_name = "EXT",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    exts: Vec<String>,

    /// Follow symbolic links during traversal.
    #[arg(long = "follow-symlinks")]
    follow_symlinks: bool,

    /// Disable reading .gitignore / .ignore / git exclude files.
    #[arg(long = "no-gitignore")]
    no_gitignore: bool,

    /// Additional glob patterns to exclude (files or directories).
    ///
    /// Patterns are evaluated relative to each PATH root, e.g.:
    ///
    ///   bodystrip requests --exclude 'fixtures/**'
    #[arg(
        long = "exclude",
        short = 'E',
        value_name = "GLOB",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    excludes: Vec<String>,

    /// Skip bodies larger than N bytes.
    #[arg(long = "max-bytes", value_name = "N")]
    max_bytes: Option<u64>,

    /// Output as JSON: { "path", "mime_type", "content" } per body.
    #[arg(long = "json")]
    json: bool,

    /// Print an explicit END marker after each file.
    #[arg(long = "end-marker")]
    end_marker: bool,

    /// Log classification decisions to stderr.
    #[arg(long = "verbose", short = 'v')]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

/// RUST_LOG wins; otherwise `--verbose` enables debug output and the default is warn.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("bodystrip=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    // Normalise extensions to lowercase, no leading dot.
    let mut ext_set = HashSet::new();
    if args.exts.is_empty() {
        ext_set.extend(DEFAULT_EXTS.iter().map(|e| e.to_string()));
    }
    for e in &args.exts {
        let norm = e.trim().trim_start_matches('.').to_ascii_lowercase();
        if !norm.is_empty() {
            ext_set.insert(norm);
        }
    }

    if ext_set.is_empty() {
        bail!("No valid extensions provided (after normalisation).");
    }

    let cfg = Config {
        exts: ext_set,
        paths: args.paths,
        mime_type: args.mime_type,
        graphql: args.graphql,
        follow_symlinks: args.follow_symlinks,
        no_gitignore: args.no_gitignore,
        json: args.json,
        excludes: args.excludes,
        max_bytes: args.max_bytes,
        end_marker: args.end_marker,
    };

    run_with_config(cfg)
}
