/// How a request body should be cleaned, decided from its declared MIME type.
///
/// Matching is deliberately loose: the normalised type is checked for
/// keywords (`json`, `xml`, ...) rather than compared against registered
/// media types, so `application/vnd.api+json` and `application/ld+json` are
/// treated like plain JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The format has its own comment syntax (YAML, shell, JS/TS); leave it alone.
    PreserveNative,
    /// `//` line comments, strings quoted with `"` or `'`.
    Json,
    /// `<!-- ... -->` block comments.
    Xml,
    /// `#` line comments, strings quoted with `"`.
    GraphQl,
    /// Same lexing rules as [`Strategy::Json`].
    PlainText,
}

impl Strategy {
    /// Classify an optional MIME type. Never fails: missing or unknown types
    /// fall back to [`Strategy::Json`].
    pub fn classify(mime_type: Option<&str>) -> Strategy {
        let normalized = mime_type.map(normalize_mime_type).unwrap_or_default();
        let strategy = classify_normalized(&normalized);
        tracing::debug!(mime_type = ?mime_type, ?strategy, "classified body format");
        strategy
    }

    pub fn preserves_text(self) -> bool {
        self == Strategy::PreserveNative
    }
}

fn classify_normalized(mime: &str) -> Strategy {
    if mime.is_empty() {
        return Strategy::Json;
    }

    // Native-comment formats win over every keyword below.
    if ["yaml", "yml"].iter().any(|k| mime.contains(k))
        || ["shell", "bash", "sh"].iter().any(|k| mime.contains(k))
        || ["javascript", "typescript"].iter().any(|k| mime.contains(k))
    {
        return Strategy::PreserveNative;
    }

    if mime.contains("json") {
        Strategy::Json
    } else if mime.contains("xml") {
        Strategy::Xml
    } else if mime.contains("graphql") {
        Strategy::GraphQl
    } else if mime == "text" || mime.contains("text/plain") {
        Strategy::PlainText
    } else {
        Strategy::Json
    }
}

/// Lowercase, drop any `; param=value` suffix and trim.
///
/// ```
/// use bodystrip::normalize_mime_type;
///
/// assert_eq!(normalize_mime_type(" Application/JSON; charset=utf-8"), "application/json");
/// ```
pub fn normalize_mime_type(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Best-guess MIME type for a file extension, used when a body is read from disk
/// without an explicit `--mime`.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext.to_ascii_lowercase().as_str() {
        "json" | "jsonc" | "json5" => "application/json",
        "xml" | "svg" | "xsd" => "application/xml",
        "graphql" | "gql" => "application/graphql",
        "txt" | "text" => "text/plain",
        "yaml" | "yml" => "application/yaml",
        "sh" | "bash" | "zsh" => "application/x-sh",
        "js" | "mjs" | "cjs" => "application/javascript",
        "ts" | "mts" | "cts" => "application/typescript",
        _ => return None,
    };
    Some(mime)
}
