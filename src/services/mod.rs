// collabdoc-service/src/services/mod.rs
use crate::models::ServiceError;
use crate::utils::document_lock::DocumentLocks;
use std::path::Path;

pub mod access_control;
pub mod document_service;
pub mod document_store;
pub mod share_registry;
pub mod template_service;
pub mod version_ledger;

pub use access_control::AccessControl;
pub use document_service::DocumentService;
pub use document_store::DocumentStore;
pub use share_registry::ShareRegistry;
pub use template_service::TemplateService;
pub use version_ledger::VersionLedger;

/// Everything the HTTP handlers need, wired over one storage root.
pub struct AppServices {
    pub documents: DocumentService,
    pub templates: TemplateService,
    pub ledger: VersionLedger,
}

impl AppServices {
    pub fn open(storage_root: &Path) -> Result<Self, ServiceError> {
        let locks = DocumentLocks::new();
        let store = DocumentStore::new(storage_root);
        let shares = ShareRegistry::new(storage_root, store.clone(), locks.clone());
        let access = AccessControl::new(store.clone(), shares.clone());
        let ledger = VersionLedger::open(storage_root)?;

        let documents = DocumentService::new(store, shares, access, ledger.clone(), locks);
        let templates = TemplateService::new(storage_root, documents.clone());

        Ok(Self {
            documents,
            templates,
            ledger,
        })
    }
}
