use crate::models::{Document, ServiceError};
use crate::utils::record_store::{Record, RecordStore};
use std::path::Path;

impl Record for Document {
    fn record_key(&self) -> String {
        self.id.clone()
    }
}

// Lookup-by-id and owner-scoped listing over the document collection
#[derive(Clone)]
pub struct DocumentStore {
    records: RecordStore<Document>,
}

impl DocumentStore {
    pub fn new(storage_root: &Path) -> Self {
        Self {
            records: RecordStore::new(storage_root.join("documents")),
        }
    }

    pub fn find(&self, document_id: &str) -> Result<Option<Document>, ServiceError> {
        if !is_valid_id(document_id) {
            return Ok(None);
        }
        self.records.find(document_id)
    }

    pub fn get(&self, document_id: &str) -> Result<Document, ServiceError> {
        self.find(document_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("Document {} not found", document_id)))
    }

    pub fn save(&self, document: &Document) -> Result<(), ServiceError> {
        self.records.save(document)
    }

    pub fn delete(&self, document_id: &str) -> Result<bool, ServiceError> {
        if !is_valid_id(document_id) {
            return Ok(false);
        }
        self.records.delete(document_id)
    }

    pub fn find_by_owner(&self, owner: &str) -> Result<Vec<Document>, ServiceError> {
        self.records.list_where(|document| document.owner == owner)
    }
}

// Ids come from path segments; never let one escape the collection directory
pub(crate) fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
