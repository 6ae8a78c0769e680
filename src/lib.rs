use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, Walk, WalkBuilder};

pub mod comments;
pub mod lexer;
pub mod mime;

pub use crate::comments::{
    collapse_blank_lines, strip_block_comments, strip_comments_from_body, strip_graphql_comments,
    strip_line_comments, strip_with_strategy,
};
pub use crate::lexer::{
    CommentSyntax, HASH_SYNTAX, LineOutcome, SLASH_SYNTAX, find_comment_start, strip_line,
};
pub use crate::mime::{Strategy, mime_for_extension, normalize_mime_type};

/// Extensions processed when the caller does not pass `--type`.
pub const DEFAULT_EXTS: &[&str] = &["json", "xml", "graphql", "gql", "txt"];

/// Configuration passed from the CLI layer (main.rs) into the core logic.
#[derive(Debug)]
pub struct Config {
    pub exts: HashSet<String>,
    /// Empty means: read a single body from stdin.
    pub paths: Vec<PathBuf>,
    pub mime_type: Option<String>,
    pub graphql: bool,
    pub follow_symlinks: bool,
    pub no_gitignore: bool,
    pub json: bool,
    pub excludes: Vec<String>,
    pub max_bytes: Option<u64>,
    pub end_marker: bool,
}

#[derive(serde::Serialize)]
struct BodyEntry<'a> {
    path: &'a str,
    mime_type: Option<&'a str>,
    content: String,
}

pub fn run_with_config(cfg: Config) -> Result<()> {
    if cfg.paths.is_empty() {
        return run_stdin(&cfg);
    }

    let exclude_globset = build_exclude_globset(&cfg.excludes)?;

    let mut had_error = false;
    let mut first_file = true;

    if cfg.json {
        println!("[");
    }

    for raw_root in &cfg.paths {
        // Canonicalise roots so running from arbitrary working dirs is reliable.
        let canon_root = match raw_root.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Skipping root {:?}: {}", raw_root, e);
                had_error = true;
                continue;
            }
        };

        for result in build_walker(&canon_root, &cfg, exclude_globset.clone()) {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    eprintln!("Walk error: {err}");
                    had_error = true;
                    continue;
                }
            };

            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            // Roots named explicitly are always processed.
            if entry.depth() > 0 && !is_body_file(path, &cfg.exts) {
                continue;
            }

            let display_path = make_display_path(&canon_root, path);

            if let Some(limit) = cfg.max_bytes
                && let Ok(meta) = fs::metadata(path)
                && meta.len() > limit
            {
                tracing::debug!(path = %display_path, size = meta.len(), limit, "over size limit");
                eprintln!(
                    "Skipping {} (size {} bytes > max {} bytes)",
                    display_path,
                    meta.len(),
                    limit
                );
                continue;
            }

            let outcome = read_body(path, &display_path).map(|text| {
                let mime = resolve_mime(&cfg, path);
                let cleaned = clean_body(&text, mime, cfg.graphql);
                (mime, cleaned)
            });

            let (mime, cleaned) = match outcome {
                Ok(v) => v,
                Err(err) => {
                    eprintln!("Error reading {}: {:#}", display_path, err);
                    had_error = true;
                    continue;
                }
            };

            if cfg.json {
                if !first_file {
                    println!(",");
                }
                print_body_json(&display_path, mime, cleaned)?;
                first_file = false;
            } else {
                print_body(&display_path, &cleaned, cfg.end_marker);
            }
        }
    }

    if cfg.json {
        println!("\n]");
    }

    if had_error {
        anyhow::bail!("One or more bodies could not be read. See stderr for details.");
    }

    Ok(())
}

/// Clean a single body read from stdin and write it back unadorned.
fn run_stdin(cfg: &Config) -> Result<()> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read body from stdin")?;

    let mime = cfg.mime_type.as_deref();
    let cleaned = clean_body(&text, mime, cfg.graphql);

    if cfg.json {
        print_body_json("-", mime, cleaned)?;
        println!();
    } else {
        print!("{cleaned}");
    }

    Ok(())
}

/// Dispatch to the GraphQL path when forced, otherwise classify by MIME type.
pub fn clean_body(text: &str, mime_type: Option<&str>, force_graphql: bool) -> String {
    if force_graphql {
        strip_graphql_comments(text)
    } else {
        strip_comments_from_body(text, mime_type)
    }
}

/// An explicit `--mime` wins; otherwise guess from the file extension.
fn resolve_mime<'a>(cfg: &'a Config, path: &Path) -> Option<&'a str> {
    if let Some(ref mime) = cfg.mime_type {
        return Some(mime.as_str());
    }
    path.extension()
        .and_then(|s| s.to_str())
        .and_then(mime_for_extension)
}

fn read_body(path: &Path, display_path: &str) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", display_path))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Walker over one root. Ignore files are honoured unless `--no-gitignore`;
/// exclude globs are matched against root-relative, slash-separated paths.
fn build_walker(root: &Path, cfg: &Config, excludes: Option<GlobSet>) -> Walk {
    let use_ignores = !cfg.no_gitignore;

    let mut builder = WalkBuilder::new(root);
    builder
        .follow_links(cfg.follow_symlinks)
        .current_dir(root.to_path_buf())
        .git_ignore(use_ignores)
        .git_exclude(use_ignores)
        .git_global(use_ignores)
        .ignore(use_ignores)
        .require_git(false);

    if let Some(excludes) = excludes {
        let root = root.to_path_buf();
        builder.filter_entry(move |entry| {
            entry.depth() == 0 || !is_excluded(&excludes, &root, entry)
        });
    }

    builder.build()
}

fn is_excluded(excludes: &GlobSet, root: &Path, entry: &DirEntry) -> bool {
    let rel = slash_path(entry.path().strip_prefix(root).unwrap_or(entry.path()));
    let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());

    // `fixtures/**` only prunes the directory itself when tried with a trailing slash.
    excludes.is_match(&rel)
        || (is_dir && !rel.ends_with('/') && excludes.is_match(format!("{rel}/")))
}

/// Compile `--exclude` patterns; blank patterns are skipped, no patterns gives `None`.
fn build_exclude_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    let globs = patterns
        .iter()
        .map(|pat| pat.trim())
        .filter(|pat| !pat.is_empty())
        .map(|pat| Glob::new(pat).with_context(|| format!("Invalid --exclude glob pattern: {pat}")))
        .collect::<Result<Vec<_>>>()?;

    if globs.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        builder.add(glob);
    }
    let set = builder.build().context("Failed to build exclude glob set")?;
    Ok(Some(set))
}

/// Whether `path` carries one of the body extensions (compared lowercase).
pub fn is_body_file(path: &Path, exts: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| exts.contains(&ext.to_ascii_lowercase()))
}

/// Path shown in headers and JSON output: relative to `root`, or the bare
/// file name when the root is the file itself.
pub fn make_display_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => slash_path(rel),
        _ => path
            .file_name()
            .unwrap_or(path.as_os_str())
            .to_string_lossy()
            .into_owned(),
    }
}

fn print_body(display_path: &str, cleaned: &str, end_marker: bool) {
    println!("========== FILE: {} ==========", display_path);
    print!("{cleaned}");

    // Bodies may arrive without a final newline; close them before the separator.
    if !cleaned.ends_with('\n') {
        println!();
    }

    if end_marker {
        println!("========== END FILE: {} ==========\n", display_path);
    } else {
        println!();
    }
}

fn print_body_json(display_path: &str, mime_type: Option<&str>, content: String) -> Result<()> {
    let entry = BodyEntry {
        path: display_path,
        mime_type,
        content,
    };

    let json = serde_json::to_string(&entry)
        .with_context(|| format!("Failed to serialise {}", display_path))?;
    print!("{}", json);

    Ok(())
}

fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    #[test]
    fn body_file_match_is_case_insensitive_and_requires_extension() {
        let mut exts = HashSet::new();
        exts.insert("json".to_string());

        assert!(is_body_file(Path::new("body.JSON"), &exts));
        assert!(is_body_file(Path::new("requests/create.json"), &exts));
        assert!(!is_body_file(Path::new("README"), &exts));
        assert!(!is_body_file(Path::new("query.graphql"), &exts));
    }

    #[test]
    fn display_path_is_relative_and_slash_separated() {
        let root = Path::new("/work/bodies");
        assert_eq!(
            make_display_path(root, Path::new("/work/bodies/users/create.json")),
            "users/create.json"
        );
        assert_eq!(
            make_display_path(Path::new("/work/body.json"), Path::new("/work/body.json")),
            "body.json"
        );
    }

    #[test]
    fn explicit_mime_overrides_extension() {
        let cfg = Config {
            exts: HashSet::new(),
            paths: Vec::new(),
            mime_type: Some("application/graphql".to_string()),
            graphql: false,
            follow_symlinks: false,
            no_gitignore: false,
            json: false,
            excludes: Vec::new(),
            max_bytes: None,
            end_marker: false,
        };
        assert_eq!(
            resolve_mime(&cfg, Path::new("q.json")),
            Some("application/graphql")
        );

        let cfg = Config {
            mime_type: None,
            ..cfg
        };
        assert_eq!(resolve_mime(&cfg, Path::new("q.xml")), Some("application/xml"));
        assert_eq!(resolve_mime(&cfg, Path::new("q.bin")), None);
    }

    #[test]
    fn forced_graphql_ignores_mime() {
        let body = "# c\n{ a }";
        assert_eq!(clean_body(body, Some("application/json"), true), "{ a }");
        assert_eq!(clean_body(body, Some("application/json"), false), body);
    }

    #[test]
    fn invalid_exclude_glob_is_reported() {
        let err = build_exclude_globset(&["a[".to_string()]).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid --exclude glob pattern"));
    }
}
