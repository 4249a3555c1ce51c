// collabdoc-service/src/routes/document_routes.rs
use crate::models::{
    CreateDocumentRequest, ServiceError, ShareDocumentRequest, UpdateDocumentRequest,
    UpdateShareRequest,
};
use crate::services::AppServices;
use crate::utils::get_username_from_request;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use log::info;
use serde_json::json;

// Create a new document owned by the caller
#[post("/api/documents")]
async fn create_document(
    req: HttpRequest,
    state: web::Data<AppServices>,
    data: web::Json<CreateDocumentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;

    info!("📝 Create document: title={}, user={}", data.title, username);

    let document = state
        .documents
        .create_document(&data.title, &data.content, &username)?;

    Ok(HttpResponse::Ok().json(document))
}

// Owned and shared documents
#[get("/api/documents")]
async fn list_documents(
    req: HttpRequest,
    state: web::Data<AppServices>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;

    info!("📋 List documents for user={}", username);

    let documents = state.documents.list_accessible(&username)?;

    Ok(HttpResponse::Ok().json(documents))
}

#[get("/api/documents/{id}")]
async fn get_document(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let document_id = path.into_inner();

    info!("📥 Get document: document_id={}, user={}", document_id, username);

    let document = state.documents.get_document(&document_id, &username)?;

    Ok(HttpResponse::Ok().json(document))
}

#[put("/api/documents/{id}")]
async fn update_document(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
    data: web::Json<UpdateDocumentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let document_id = path.into_inner();

    info!("📤 Update document: document_id={}, user={}", document_id, username);

    let document = state
        .documents
        .update_document(&document_id, &data.content, &username)?;

    Ok(HttpResponse::Ok().json(document))
}

#[delete("/api/documents/{id}")]
async fn delete_document(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let document_id = path.into_inner();

    info!("🗑️ Delete document: document_id={}, user={}", document_id, username);

    state.documents.delete_document(&document_id, &username)?;

    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/documents/{id}/share")]
async fn share_document(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
    data: web::Json<ShareDocumentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let document_id = path.into_inner();

    info!(
        "👥 Share document: document_id={}, with={}, permission={}, by={}",
        document_id, data.shared_with_user, data.permission, username
    );

    let share = state.documents.create_share(
        &document_id,
        &data.shared_with_user,
        data.permission,
        &username,
    )?;

    Ok(HttpResponse::Ok().json(share))
}

#[put("/api/documents/{id}/share/{shared_with_user}")]
async fn update_share(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<(String, String)>,
    data: web::Json<UpdateShareRequest>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let (document_id, shared_with_user) = path.into_inner();

    info!(
        "🔄 Change share permission: document_id={}, with={}, permission={}, by={}",
        document_id, shared_with_user, data.permission, username
    );

    let share = state.documents.shares().update_share_permission(
        &document_id,
        &shared_with_user,
        data.permission,
        &username,
    )?;

    Ok(HttpResponse::Ok().json(share))
}

#[delete("/api/documents/{id}/share/{shared_with_user}")]
async fn revoke_share(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let (document_id, shared_with_user) = path.into_inner();

    info!(
        "🚫 Revoke share: document_id={}, with={}, by={}",
        document_id, shared_with_user, username
    );

    state
        .documents
        .shares()
        .revoke_share(&document_id, &shared_with_user, &username)?;

    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/documents/{id}/shares")]
async fn list_shares(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let document_id = path.into_inner();

    info!("📋 List shares: document_id={}, user={}", document_id, username);

    let shares = state.documents.shares().list_shares(&document_id, &username)?;

    Ok(HttpResponse::Ok().json(shares))
}

// Caller's effective permission, or null without access
#[get("/api/documents/{id}/permission")]
async fn get_permission(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let document_id = path.into_inner();

    let permission = state
        .documents
        .access()
        .effective_permission(&document_id, &username)?;

    Ok(HttpResponse::Ok().json(permission))
}

// Apply a historical snapshot to the live document
#[post("/api/documents/{id}/restore/{version_id}")]
async fn restore_document(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let (document_id, version_id) = path.into_inner();

    info!(
        "⏪ Restore document: document_id={}, version_id={}, user={}",
        document_id, version_id, username
    );

    let (document, version) =
        state
            .documents
            .restore_document(&document_id, &version_id, &username)?;

    Ok(HttpResponse::Ok().json(json!({
        "document": document,
        "restoredFrom": version.id,
    })))
}

// Register all document routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_document)
        .service(list_documents)
        .service(get_document)
        .service(update_document)
        .service(delete_document)
        .service(share_document)
        .service(update_share)
        .service(revoke_share)
        .service(list_shares)
        .service(get_permission)
        .service(restore_document);
}
