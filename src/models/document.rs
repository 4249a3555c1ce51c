use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(title: String, content: String, owner: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            owner,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner == username
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateDocumentRequest {
    pub content: String,
}
