use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_public() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub category: String,
    pub created_by: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentTemplate {
    pub fn new(
        name: String,
        description: String,
        content: String,
        category: String,
        created_by: String,
        is_public: bool,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            content,
            category,
            created_by,
            is_public,
            created_at: now,
            updated_at: now,
        }
    }

    // Public templates are visible to everyone, private ones only to their creator
    pub fn is_visible_to(&self, username: &str) -> bool {
        self.is_public || self.created_by == username
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub category: String,
    pub is_public: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub category: String,
    pub is_public: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateDocumentFromTemplateRequest {
    pub title: String,
}
