use crate::models::{
    CreateTemplateRequest, Document, DocumentTemplate, ServiceError, UpdateTemplateRequest,
};
use crate::services::document_service::DocumentService;
use crate::services::document_store::is_valid_id;
use crate::utils::record_store::{Record, RecordStore};
use chrono::Utc;
use log::{info, warn};
use std::path::Path;

impl Record for DocumentTemplate {
    fn record_key(&self) -> String {
        self.id.clone()
    }
}

// Reusable content seeds for new documents
#[derive(Clone)]
pub struct TemplateService {
    templates: RecordStore<DocumentTemplate>,
    documents: DocumentService,
}

fn validate_fields(name: &str, category: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::BadRequest("Template name is required".to_string()));
    }
    if category.trim().is_empty() {
        return Err(ServiceError::BadRequest("Template category is required".to_string()));
    }
    Ok(())
}

impl TemplateService {
    pub fn new(storage_root: &Path, documents: DocumentService) -> Self {
        Self {
            templates: RecordStore::new(storage_root.join("templates")),
            documents,
        }
    }

    fn find(&self, template_id: &str) -> Result<DocumentTemplate, ServiceError> {
        let found = if is_valid_id(template_id) {
            self.templates.find(template_id)?
        } else {
            None
        };

        found.ok_or_else(|| ServiceError::NotFound(format!("Template {} not found", template_id)))
    }

    // Creator-only operations
    fn find_owned(&self, template_id: &str, username: &str) -> Result<DocumentTemplate, ServiceError> {
        let template = self.find(template_id)?;

        if template.created_by != username {
            warn!("❌ User {} does not own template {}", username, template_id);
            return Err(ServiceError::Forbidden(
                "Only the template creator can modify it".to_string(),
            ));
        }

        Ok(template)
    }

    pub fn create_template(
        &self,
        request: CreateTemplateRequest,
        created_by: &str,
    ) -> Result<DocumentTemplate, ServiceError> {
        validate_fields(&request.name, &request.category)?;

        let template = DocumentTemplate::new(
            request.name,
            request.description,
            request.content,
            request.category,
            created_by.to_string(),
            request.is_public.unwrap_or(true),
        );
        self.templates.save(&template)?;

        info!("✅ Created template {} for {}", template.id, created_by);
        Ok(template)
    }

    /// Public templates plus the caller's own, by name.
    pub fn list_templates(&self, username: &str) -> Result<Vec<DocumentTemplate>, ServiceError> {
        let mut templates = self
            .templates
            .list_where(|template| template.is_visible_to(username))?;
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    pub fn templates_by_category(
        &self,
        category: &str,
        username: &str,
    ) -> Result<Vec<DocumentTemplate>, ServiceError> {
        let mut templates = self.templates.list_where(|template| {
            template.category == category && template.is_visible_to(username)
        })?;
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    pub fn get_template(&self, template_id: &str, username: &str) -> Result<DocumentTemplate, ServiceError> {
        let template = self.find(template_id)?;

        if !template.is_visible_to(username) {
            return Err(ServiceError::Forbidden(format!(
                "Template {} is private",
                template_id
            )));
        }

        Ok(template)
    }

    pub fn update_template(
        &self,
        template_id: &str,
        request: UpdateTemplateRequest,
        username: &str,
    ) -> Result<DocumentTemplate, ServiceError> {
        let mut template = self.find_owned(template_id, username)?;
        validate_fields(&request.name, &request.category)?;

        template.name = request.name;
        template.description = request.description;
        template.content = request.content;
        template.category = request.category;
        if let Some(is_public) = request.is_public {
            template.is_public = is_public;
        }
        template.updated_at = Utc::now();
        self.templates.save(&template)?;

        info!("✅ Updated template {}", template_id);
        Ok(template)
    }

    pub fn delete_template(&self, template_id: &str, username: &str) -> Result<(), ServiceError> {
        self.find_owned(template_id, username)?;
        self.templates.delete(template_id)?;

        info!("🗑️ Deleted template {}", template_id);
        Ok(())
    }

    /// New document owned by `owner`, seeded with the template content.
    pub fn instantiate(
        &self,
        template_id: &str,
        title: &str,
        owner: &str,
    ) -> Result<Document, ServiceError> {
        let template = self.get_template(template_id, owner)?;
        self.documents.create_document(title, &template.content, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AppServices;
    use tempfile::TempDir;

    fn request(name: &str, category: &str, is_public: Option<bool>) -> CreateTemplateRequest {
        CreateTemplateRequest {
            name: name.to_string(),
            description: String::new(),
            content: format!("# {}", name),
            category: category.to_string(),
            is_public,
        }
    }

    fn setup() -> (TempDir, AppServices) {
        let dir = TempDir::new().unwrap();
        let services = AppServices::open(dir.path()).unwrap();
        (dir, services)
    }

    #[test]
    fn templates_are_public_by_default() {
        let (_dir, services) = setup();
        let template = services
            .templates
            .create_template(request("Memo", "work", None), "alice")
            .unwrap();

        assert!(template.is_public);
        assert_eq!(services.templates.get_template(&template.id, "bob").unwrap(), template);
    }

    #[test]
    fn private_templates_are_only_visible_to_creator() {
        let (_dir, services) = setup();
        let templates = &services.templates;
        let private = templates
            .create_template(request("Diary", "personal", Some(false)), "alice")
            .unwrap();
        templates
            .create_template(request("Memo", "work", None), "carol")
            .unwrap();

        assert_eq!(templates.list_templates("alice").unwrap().len(), 2);
        assert_eq!(templates.list_templates("bob").unwrap().len(), 1);
        assert!(templates.templates_by_category("personal", "bob").unwrap().is_empty());
        assert_eq!(templates.templates_by_category("personal", "alice").unwrap().len(), 1);
        assert!(matches!(
            templates.get_template(&private.id, "bob"),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            templates.instantiate(&private.id, "Copy", "bob"),
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn only_creator_updates_or_deletes_public_template() {
        let (_dir, services) = setup();
        let templates = &services.templates;
        let template = templates
            .create_template(request("Memo", "work", None), "alice")
            .unwrap();
        let update = || UpdateTemplateRequest {
            name: "Memo v2".to_string(),
            description: "new".to_string(),
            content: "## Memo".to_string(),
            category: "work".to_string(),
            is_public: None,
        };

        assert!(matches!(
            templates.update_template(&template.id, update(), "bob"),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            templates.delete_template(&template.id, "bob"),
            Err(ServiceError::Forbidden(_))
        ));

        let updated = templates.update_template(&template.id, update(), "alice").unwrap();
        assert_eq!(updated.name, "Memo v2");
        assert!(updated.is_public);

        templates.delete_template(&template.id, "alice").unwrap();
        assert!(matches!(
            templates.get_template(&template.id, "alice"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn instantiate_creates_owned_document_with_history() {
        let (_dir, services) = setup();
        let template = services
            .templates
            .create_template(request("Memo", "work", None), "alice")
            .unwrap();

        let document = services.templates.instantiate(&template.id, "My memo", "bob").unwrap();
        assert_eq!(document.owner, "bob");
        assert_eq!(document.content, "# Memo");
        assert_eq!(services.ledger.history(&document.id).unwrap().len(), 1);
    }

    #[test]
    fn name_and_category_are_required() {
        let (_dir, services) = setup();

        assert!(matches!(
            services.templates.create_template(request("", "work", None), "alice"),
            Err(ServiceError::BadRequest(_))
        ));
        assert!(matches!(
            services.templates.create_template(request("Memo", " ", None), "alice"),
            Err(ServiceError::BadRequest(_))
        ));
    }
}
