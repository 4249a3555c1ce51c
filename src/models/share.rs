use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Permission level granted on a document.
///
/// Levels are totally ordered, `Read < Write < Admin`, and a grant implies every
/// capability of the levels below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Permission {
    Read = 0,
    Write = 1,
    Admin = 2,
}

impl Permission {
    /// Whether a holder of `self` may perform an action that needs `required`.
    pub fn satisfies(self, required: Permission) -> bool {
        self >= required
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Permission::Read => write!(f, "READ"),
            Permission::Write => write!(f, "WRITE"),
            Permission::Admin => write!(f, "ADMIN"),
        }
    }
}

// A grant of `permission` on one document to one user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentShare {
    pub id: String,
    pub document_id: String,
    pub shared_with_user: String,
    pub permission: Permission,
    pub shared_by_user: String,
    pub shared_at: DateTime<Utc>,
}

impl DocumentShare {
    pub fn new(
        document_id: String,
        shared_with_user: String,
        permission: Permission,
        shared_by_user: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            document_id,
            shared_with_user,
            permission,
            shared_by_user,
            shared_at: Utc::now(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShareDocumentRequest {
    pub shared_with_user: String,
    pub permission: Permission,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateShareRequest {
    pub permission: Permission,
}
