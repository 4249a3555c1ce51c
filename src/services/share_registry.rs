// collabdoc-service/src/services/share_registry.rs
use crate::models::{Document, DocumentShare, Permission, ServiceError};
use crate::services::document_store::{is_valid_id, DocumentStore};
use crate::utils::document_lock::DocumentLocks;
use crate::utils::record_store::{Record, RecordStore};
use log::{debug, error, info, warn};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// Grants are keyed by the grantee so one (document, user) pair maps to one file
pub fn share_key(shared_with_user: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(shared_with_user.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl Record for DocumentShare {
    fn record_key(&self) -> String {
        share_key(&self.shared_with_user)
    }
}

/// Owner-managed grants, stored under `shares/<document_id>/`.
#[derive(Clone)]
pub struct ShareRegistry {
    root: PathBuf,
    documents: DocumentStore,
    locks: DocumentLocks,
}

impl ShareRegistry {
    pub fn new(storage_root: &Path, documents: DocumentStore, locks: DocumentLocks) -> Self {
        Self {
            root: storage_root.join("shares"),
            documents,
            locks,
        }
    }

    fn grants(&self, document_id: &str) -> RecordStore<DocumentShare> {
        RecordStore::new(self.root.join(document_id))
    }

    // Loads the document and checks the acting user owns it
    fn owned_document(&self, document_id: &str, acting_user: &str) -> Result<Document, ServiceError> {
        let document = self.documents.get(document_id)?;

        if !document.is_owned_by(acting_user) {
            warn!(
                "❌ User {} is not the owner of document {}",
                acting_user, document_id
            );
            return Err(ServiceError::Forbidden(
                "Only the document owner can manage sharing".to_string(),
            ));
        }

        Ok(document)
    }

    pub fn create_share(
        &self,
        document_id: &str,
        shared_with_user: &str,
        permission: Permission,
        acting_user: &str,
    ) -> Result<DocumentShare, ServiceError> {
        self.locks.with_lock(document_id, || {
            let document = self.owned_document(document_id, acting_user)?;

            if shared_with_user.trim().is_empty() {
                return Err(ServiceError::BadRequest("sharedWithUser is required".to_string()));
            }
            if document.is_owned_by(shared_with_user) {
                return Err(ServiceError::BadRequest(
                    "A document cannot be shared with its owner".to_string(),
                ));
            }

            let share = DocumentShare::new(
                document.id.clone(),
                shared_with_user.to_string(),
                permission,
                acting_user.to_string(),
            );

            if !self.grants(&document.id).insert_new(&share)? {
                warn!(
                    "⚠️ Document {} is already shared with {}",
                    document_id, shared_with_user
                );
                return Err(ServiceError::Conflict(
                    "Document already shared with this user".to_string(),
                ));
            }

            info!(
                "✅ Shared document {} with {} ({})",
                document_id, shared_with_user, permission
            );
            Ok(share)
        })
    }

    /// Removes the grant if present. Revoking a missing grant is not an error.
    pub fn revoke_share(
        &self,
        document_id: &str,
        shared_with_user: &str,
        acting_user: &str,
    ) -> Result<(), ServiceError> {
        self.locks.with_lock(document_id, || {
            self.owned_document(document_id, acting_user)?;

            let removed = self.grants(document_id).delete(&share_key(shared_with_user))?;
            debug!(
                "Revoke share document_id={}, user={}, removed={}",
                document_id, shared_with_user, removed
            );
            Ok(())
        })
    }

    pub fn update_share_permission(
        &self,
        document_id: &str,
        shared_with_user: &str,
        permission: Permission,
        acting_user: &str,
    ) -> Result<DocumentShare, ServiceError> {
        self.locks.with_lock(document_id, || {
            self.owned_document(document_id, acting_user)?;

            let grants = self.grants(document_id);
            let mut share = grants.find(&share_key(shared_with_user))?.ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Document {} is not shared with {}",
                    document_id, shared_with_user
                ))
            })?;

            share.permission = permission;
            grants.save(&share)?;

            info!(
                "✅ Changed permission of {} on document {} to {}",
                shared_with_user, document_id, permission
            );
            Ok(share)
        })
    }

    /// Grants on a document, oldest first. Only the owner may enumerate them.
    pub fn list_shares(
        &self,
        document_id: &str,
        acting_user: &str,
    ) -> Result<Vec<DocumentShare>, ServiceError> {
        self.owned_document(document_id, acting_user)?;

        let mut shares = self.grants(document_id).list()?;
        shares.sort_by(|a, b| a.shared_at.cmp(&b.shared_at));
        Ok(shares)
    }

    pub fn find_grant(
        &self,
        document_id: &str,
        username: &str,
    ) -> Result<Option<DocumentShare>, ServiceError> {
        if !is_valid_id(document_id) {
            return Ok(None);
        }
        self.grants(document_id).find(&share_key(username))
    }

    /// Every grant held by `username`, across all documents.
    pub fn shares_for_user(&self, username: &str) -> Result<Vec<DocumentShare>, ServiceError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                error!("Failed to read share directory {:?}: {:?}", self.root, e);
                return Err(ServiceError::InternalServerError);
            }
        };

        let key = share_key(username);
        let mut shares = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| {
                error!("Failed to read share directory entry: {:?}", e);
                ServiceError::InternalServerError
            })?;
            if !entry.path().is_dir() {
                continue;
            }
            let grants: RecordStore<DocumentShare> = RecordStore::new(entry.path());
            if let Some(share) = grants.find(&key)? {
                shares.push(share);
            }
        }

        Ok(shares)
    }

    // Cascade for a deleted document; callers hold the document lock
    pub(crate) fn remove_all_for_document(&self, document_id: &str) -> Result<(), ServiceError> {
        self.grants(document_id).clear()?;
        info!("🗑️ Removed all shares of document {}", document_id);
        Ok(())
    }
}
