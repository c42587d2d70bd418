use chrono::{DateTime, Utc};
use rag_store::{DocumentSource, IndexableDocument};
use serde::{Deserialize, Serialize};

/// Request payload for /index: content plus its metadata block.
#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub content: String,
    pub metadata: IndexMetadata,
}

#[derive(Debug, Deserialize)]
pub struct IndexMetadata {
    pub id: String,
    pub source: DocumentSource,
    pub project_id: String,
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

impl From<IndexRequest> for IndexableDocument {
    fn from(r: IndexRequest) -> Self {
        let m = r.metadata;
        IndexableDocument {
            id: m.id,
            content: r.content,
            project_id: m.project_id,
            source: m.source,
            created_at: m.created_at,
            author_id: m.author_id,
            git_commit_hash: m.git_commit_hash,
            git_branch: m.git_branch,
            file_path: m.file_path,
            repo_url: m.repo_url,
            linked_jira_issue: m.linked_jira_issue,
        }
    }
}

/// Response payload for /index.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub success: bool,
    pub vector_id: String,
}
