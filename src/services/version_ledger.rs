// collabdoc-service/src/services/version_ledger.rs
use crate::models::{DocumentVersion, ServiceError};
use crate::services::document_store::is_valid_id;
use crate::utils::record_store::{Record, RecordStore};
use log::{debug, info};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

impl Record for DocumentVersion {
    fn record_key(&self) -> String {
        self.id.clone()
    }
}

/// Append-only log of content snapshots.
///
/// Versions reference documents by id only and outlive them. Nothing here
/// checks permissions; callers authorize before appending.
#[derive(Clone)]
pub struct VersionLedger {
    versions: RecordStore<DocumentVersion>,
    next_sequence: Arc<AtomicU64>,
}

impl VersionLedger {
    pub fn open(storage_root: &Path) -> Result<Self, ServiceError> {
        let versions: RecordStore<DocumentVersion> =
            RecordStore::new(storage_root.join("versions"));

        let next_sequence = versions
            .list()?
            .iter()
            .map(|version| version.sequence + 1)
            .max()
            .unwrap_or(1);
        info!("📚 Version ledger opened, next sequence {}", next_sequence);

        Ok(Self {
            versions,
            next_sequence: Arc::new(AtomicU64::new(next_sequence)),
        })
    }

    pub fn record_version(
        &self,
        document_id: &str,
        content: &str,
        edited_by: &str,
    ) -> Result<DocumentVersion, ServiceError> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let version = DocumentVersion::new(
            document_id.to_string(),
            content.to_string(),
            edited_by.to_string(),
            sequence,
        );

        if !self.versions.insert_new(&version)? {
            // Fresh v4 ids do not collide in practice
            return Err(ServiceError::InternalServerError);
        }

        debug!(
            "Recorded version {} (seq {}) of document {} by {}",
            version.id, sequence, document_id, edited_by
        );
        Ok(version)
    }

    /// All snapshots of a document, newest first. Empty if there are none.
    pub fn history(&self, document_id: &str) -> Result<Vec<DocumentVersion>, ServiceError> {
        let mut versions = self
            .versions
            .list_where(|version| version.document_id == document_id)?;
        sort_newest_first(&mut versions);
        Ok(versions)
    }

    /// Looks a snapshot up. The live document is left untouched.
    pub fn revert(&self, version_id: &str) -> Result<DocumentVersion, ServiceError> {
        let found = if is_valid_id(version_id) {
            self.versions.find(version_id)?
        } else {
            None
        };

        found.ok_or_else(|| ServiceError::NotFound(format!("Version {} not found", version_id)))
    }

    pub fn contributions_by_user(&self, username: &str) -> Result<Vec<DocumentVersion>, ServiceError> {
        let mut versions = self
            .versions
            .list_where(|version| version.edited_by == username)?;
        sort_newest_first(&mut versions);
        Ok(versions)
    }
}

// Timestamp descending, equal timestamps by append order descending
fn sort_newest_first(versions: &mut [DocumentVersion]) {
    versions.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.sequence.cmp(&a.sequence))
    });
}
