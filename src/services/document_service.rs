// collabdoc-service/src/services/document_service.rs
use crate::models::{Document, DocumentShare, DocumentVersion, Permission, ServiceError};
use crate::services::access_control::AccessControl;
use crate::services::document_store::DocumentStore;
use crate::services::share_registry::ShareRegistry;
use crate::services::version_ledger::VersionLedger;
use crate::utils::document_lock::DocumentLocks;
use chrono::Utc;
use log::{error, info, warn};
use std::collections::HashSet;

/// Document lifecycle: create, read, edit, delete.
///
/// Every content write is paired with a ledger append while the document lock
/// is held. Concurrent edits are last-write-wins.
#[derive(Clone)]
pub struct DocumentService {
    documents: DocumentStore,
    shares: ShareRegistry,
    access: AccessControl,
    ledger: VersionLedger,
    locks: DocumentLocks,
}

impl DocumentService {
    pub fn new(
        documents: DocumentStore,
        shares: ShareRegistry,
        access: AccessControl,
        ledger: VersionLedger,
        locks: DocumentLocks,
    ) -> Self {
        Self {
            documents,
            shares,
            access,
            ledger,
            locks,
        }
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn shares(&self) -> &ShareRegistry {
        &self.shares
    }

    pub fn create_document(
        &self,
        title: &str,
        content: &str,
        owner: &str,
    ) -> Result<Document, ServiceError> {
        if title.trim().is_empty() {
            return Err(ServiceError::BadRequest("Document title is required".to_string()));
        }

        let document = Document::new(title.to_string(), content.to_string(), owner.to_string());

        self.locks.with_lock(&document.id, || {
            self.documents.save(&document)?;
            if let Err(e) = self.ledger.record_version(&document.id, content, owner) {
                error!("Failed to record initial version of {}: {}", document.id, e);
                self.documents.delete(&document.id)?;
                return Err(e);
            }
            Ok(())
        })?;

        info!("✅ Created document {} for {}", document.id, owner);
        Ok(document)
    }

    pub fn get_document(&self, document_id: &str, username: &str) -> Result<Document, ServiceError> {
        self.access.authorize(document_id, username, Permission::Read)
    }

    pub fn find_document(&self, document_id: &str) -> Result<Option<Document>, ServiceError> {
        self.documents.find(document_id)
    }

    pub fn documents_by_owner(&self, owner: &str) -> Result<Vec<Document>, ServiceError> {
        self.documents.find_by_owner(owner)
    }

    /// Documents some grant gives `username` access to.
    pub fn shared_with(&self, username: &str) -> Result<Vec<Document>, ServiceError> {
        let mut documents = Vec::new();

        for share in self.shares.shares_for_user(username)? {
            match self.documents.find(&share.document_id)? {
                Some(document) => documents.push(document),
                None => warn!(
                    "⚠️ Share {} points at missing document {}",
                    share.id, share.document_id
                ),
            }
        }

        Ok(documents)
    }

    /// Owned plus shared documents, without duplicates, most recently updated first.
    pub fn list_accessible(&self, username: &str) -> Result<Vec<Document>, ServiceError> {
        let mut seen = HashSet::new();
        let mut documents: Vec<Document> = self
            .documents_by_owner(username)?
            .into_iter()
            .chain(self.shared_with(username)?)
            .filter(|document| seen.insert(document.id.clone()))
            .collect();

        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(documents)
    }

    /// Replaces the content and appends the new content to the ledger.
    pub fn update_document(
        &self,
        document_id: &str,
        content: &str,
        username: &str,
    ) -> Result<Document, ServiceError> {
        self.locks.with_lock(document_id, || {
            let previous = self.access.authorize(document_id, username, Permission::Write)?;

            let mut document = previous.clone();
            document.content = content.to_string();
            document.updated_at = Utc::now();
            self.documents.save(&document)?;

            if let Err(e) = self.ledger.record_version(document_id, content, username) {
                error!("Failed to record version of {}, rolling back: {}", document_id, e);
                self.documents.save(&previous)?;
                return Err(e);
            }

            info!("✅ Document {} updated by {}", document_id, username);
            Ok(document)
        })
    }

    /// Deletes the document and its grants. History is kept.
    pub fn delete_document(&self, document_id: &str, username: &str) -> Result<(), ServiceError> {
        self.locks.with_lock(document_id, || {
            self.access.authorize(document_id, username, Permission::Admin)?;

            // Grants go first so a failed cascade leaves the document in place
            self.shares.remove_all_for_document(document_id)?;
            self.documents.delete(document_id)?;

            info!("🗑️ Document {} deleted by {}", document_id, username);
            Ok(())
        })
    }

    /// Applies a historical snapshot to the live document.
    ///
    /// The snapshot is looked up through the ledger's read-only revert and then
    /// written like any other edit, so the restore itself becomes a new version.
    pub fn restore_document(
        &self,
        document_id: &str,
        version_id: &str,
        username: &str,
    ) -> Result<(Document, DocumentVersion), ServiceError> {
        // Check access first so a caller without WRITE learns nothing about versions
        self.access.authorize(document_id, username, Permission::Write)?;

        let version = self.ledger.revert(version_id)?;
        if version.document_id != document_id {
            warn!(
                "Version {} does not belong to document {}",
                version_id, document_id
            );
            return Err(ServiceError::NotFound(format!("Version {} not found", version_id)));
        }

        let document = self.update_document(document_id, &version.content, username)?;
        info!(
            "⏪ Document {} restored to version {} by {}",
            document_id, version_id, username
        );
        Ok((document, version))
    }

    pub fn create_share(
        &self,
        document_id: &str,
        shared_with_user: &str,
        permission: Permission,
        acting_user: &str,
    ) -> Result<DocumentShare, ServiceError> {
        self.shares
            .create_share(document_id, shared_with_user, permission, acting_user)
    }
}
