//! Metadata normalization and the text views derived from a chunk.
//!
//! A stored chunk has two text renderings:
//! - the **embedding input**, fed to the embedding model at index time
//! - the **LLM context**, fed to the synthesis model at query time
//!
//! Both are `key: value` metadata lines, a blank line, then the content.
//! Keys in [`EXCLUDED_KEYS`] are left out of both, yet remain in stored
//! metadata so they can still be filtered on.

use serde_json::{Map, Value};
use tracing::debug;

/// Metadata keys hidden from the embedding model and the LLM.
pub const EXCLUDED_KEYS: [&str; 2] = ["git_commit_hash", "author_id"];

/// Separator between rendered chunks in the LLM context.
const CHUNK_SEPARATOR: &str = "\n\n";

/// Drops `null` entries, keeping the order of the rest.
pub fn strip_nulls(metadata: Map<String, Value>) -> Map<String, Value> {
    let before = metadata.len();
    let out: Map<String, Value> = metadata.into_iter().filter(|(_, v)| !v.is_null()).collect();
    if out.len() != before {
        debug!(dropped = before - out.len(), "normalize::strip_nulls");
    }
    out
}

pub fn is_excluded(key: &str) -> bool {
    EXCLUDED_KEYS.contains(&key)
}

/// Renders one chunk as `key: value` lines + blank line + content.
pub fn render_chunk(metadata: &Map<String, Value>, content: &str) -> String {
    let mut out = String::with_capacity(content.len() + 32 * metadata.len());
    for (k, v) in metadata.iter().filter(|(k, _)| !is_excluded(k)) {
        if v.is_null() {
            continue;
        }
        out.push_str(k);
        out.push_str(": ");
        match v {
            Value::String(s) => out.push_str(s),
            other => out.push_str(&other.to_string()),
        }
        out.push('\n');
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(content);
    out
}

/// Text handed to the embedding model for a document.
pub fn embedding_text(metadata: &Map<String, Value>, content: &str) -> String {
    render_chunk(metadata, content)
}

/// Joins rendered chunks into the `{context}` block of the prompt.
pub fn llm_context<'a, I>(chunks: I) -> String
where
    I: IntoIterator<Item = (&'a Map<String, Value>, &'a str)>,
{
    chunks
        .into_iter()
        .map(|(meta, content)| render_chunk(meta, content))
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}
