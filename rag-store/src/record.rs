//! Core data models used by the library.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of developer artifact a document was captured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Journal,
    CodeFile,
    CommitMessage,
}

impl DocumentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentSource::Journal => "journal",
            DocumentSource::CodeFile => "code_file",
            DocumentSource::CommitMessage => "commit_message",
        }
    }
}

/// One artifact to index. `id` doubles as the vector-store key, so indexing
/// the same `id` twice replaces the first copy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexableDocument {
    pub id: String,
    pub content: String,
    pub project_id: String,
    pub source: DocumentSource,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
    pub git_commit_hash: String,
    pub git_branch: String,
    #[serde(default)]
    pub file_path: Option<String>,
    pub repo_url: String,
    #[serde(default)]
    pub linked_jira_issue: Option<String>,
}

impl IndexableDocument {
    /// Flat metadata map for storage and filtering. Absent optionals are
    /// left out entirely.
    pub fn metadata(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("id".into(), Value::String(self.id.clone()));
        m.insert("source".into(), Value::String(self.source.as_str().into()));
        m.insert("project_id".into(), Value::String(self.project_id.clone()));
        m.insert(
            "created_at".into(),
            Value::String(self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        m.insert("author_id".into(), Value::String(self.author_id.clone()));
        m.insert(
            "git_commit_hash".into(),
            Value::String(self.git_commit_hash.clone()),
        );
        m.insert("git_branch".into(), Value::String(self.git_branch.clone()));
        if let Some(path) = &self.file_path {
            m.insert("file_path".into(), Value::String(path.clone()));
        }
        m.insert("repo_url".into(), Value::String(self.repo_url.clone()));
        if let Some(issue) = &self.linked_jira_issue {
            m.insert("linked_jira_issue".into(), Value::String(issue.clone()));
        }
        m
    }
}

/// What a [`crate::VectorStore`] persists: vector + content + metadata,
/// keyed by `(project_id, id)`.
#[derive(Clone, Debug)]
pub struct VectorPoint {
    pub id: String,
    pub project_id: String,
    pub vector: Vec<f32>,
    pub content: String,
    pub metadata: Map<String, Value>,
}

impl VectorPoint {
    /// Storage key: the external id inside its project's namespace.
    pub fn point_key(&self) -> String {
        format!("{}/{}", self.project_id, self.id)
    }
}

/// A single retrieval hit. `score` is `None` when the backend reports none.
#[derive(Clone, Debug)]
pub struct SearchHit {
    pub id: String,
    pub content: String,
    pub score: Option<f32>,
    pub metadata: Map<String, Value>,
}
