use crate::models::{Document, Permission, ServiceError};
use crate::services::document_store::DocumentStore;
use crate::services::share_registry::ShareRegistry;
use log::warn;

/// Computes what a user may do with a document from ownership and grants.
#[derive(Clone)]
pub struct AccessControl {
    documents: DocumentStore,
    shares: ShareRegistry,
}

impl AccessControl {
    pub fn new(documents: DocumentStore, shares: ShareRegistry) -> Self {
        Self { documents, shares }
    }

    /// Effective permission of `username` on an already loaded document.
    ///
    /// The owner is always `Admin` without consulting grants. Anyone else gets
    /// the level of their grant, or `None` when there is no grant.
    pub fn permission_on(
        &self,
        document: &Document,
        username: &str,
    ) -> Result<Option<Permission>, ServiceError> {
        if document.is_owned_by(username) {
            return Ok(Some(Permission::Admin));
        }

        Ok(self
            .shares
            .find_grant(&document.id, username)?
            .map(|share| share.permission))
    }

    /// Fails with `NotFound` for a missing document before any authorization.
    pub fn effective_permission(
        &self,
        document_id: &str,
        username: &str,
    ) -> Result<Option<Permission>, ServiceError> {
        let document = self.documents.get(document_id)?;
        self.permission_on(&document, username)
    }

    pub fn has_permission(
        &self,
        document_id: &str,
        username: &str,
        required: Permission,
    ) -> Result<bool, ServiceError> {
        Ok(self
            .effective_permission(document_id, username)?
            .map_or(false, |granted| granted.satisfies(required)))
    }

    /// Loads the document if `username` holds at least `required` on it.
    pub fn authorize(
        &self,
        document_id: &str,
        username: &str,
        required: Permission,
    ) -> Result<Document, ServiceError> {
        let document = self.documents.get(document_id)?;

        match self.permission_on(&document, username)? {
            Some(granted) if granted.satisfies(required) => Ok(document),
            granted => {
                warn!(
                    "❌ User {} needs {} on document {} but holds {:?}",
                    username, required, document_id, granted
                );
                Err(ServiceError::Forbidden(format!(
                    "{} permission required on document {}",
                    required, document_id
                )))
            }
        }
    }
}
