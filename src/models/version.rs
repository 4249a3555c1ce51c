use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

// One immutable content snapshot in a document's history
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub id: String,
    pub document_id: String,
    pub sequence: u64,
    pub content: String,
    pub content_hash: String,
    pub edited_by: String,
    pub timestamp: DateTime<Utc>,
}

impl DocumentVersion {
    pub fn new(document_id: String, content: String, edited_by: String, sequence: u64) -> Self {
        let content_hash = calculate_content_hash(&content);

        Self {
            id: Uuid::new_v4().to_string(),
            document_id,
            sequence,
            content,
            content_hash,
            edited_by,
            timestamp: Utc::now(),
        }
    }
}

// Helper to calculate a hash for content
pub fn calculate_content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

// Request for manually recording a snapshot
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SaveVersionRequest {
    pub document_id: String,
    pub content: String,
}
