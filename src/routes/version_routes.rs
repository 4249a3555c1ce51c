// collabdoc-service/src/routes/version_routes.rs
use crate::models::{DocumentVersion, Permission, SaveVersionRequest, ServiceError};
use crate::services::AppServices;
use crate::utils::get_username_from_request;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{debug, info, warn};

// Live documents need READ. Once a document is deleted its retained history
// is only served to users who edited it.
fn readable_history(
    state: &AppServices,
    document_id: &str,
    username: &str,
) -> Result<Vec<DocumentVersion>, ServiceError> {
    if state.documents.find_document(document_id)?.is_some() {
        state
            .documents
            .access()
            .authorize(document_id, username, Permission::Read)?;
        return state.ledger.history(document_id);
    }

    let history = state.ledger.history(document_id)?;
    if !history.is_empty() && !history.iter().any(|version| version.edited_by == username) {
        warn!(
            "❌ User {} denied history of deleted document {}",
            username, document_id
        );
        return Err(ServiceError::Forbidden(
            "Only former editors can read the history of a deleted document".to_string(),
        ));
    }

    debug!("Document {} no longer exists, serving retained history", document_id);
    Ok(history)
}

// Record a snapshot of a document
#[post("/api/versions/save")]
async fn save_version(
    req: HttpRequest,
    state: web::Data<AppServices>,
    data: web::Json<SaveVersionRequest>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;

    info!("💾 Save version: document_id={}, user={}", data.document_id, username);

    state
        .documents
        .access()
        .authorize(&data.document_id, &username, Permission::Write)?;

    let version = state
        .ledger
        .record_version(&data.document_id, &data.content, &username)?;

    Ok(HttpResponse::Ok().json(version))
}

// Get document version history, newest first
#[get("/api/versions/history/{document_id}")]
async fn get_history(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let document_id = path.into_inner();

    info!("📋 Get history: document_id={}, user={}", document_id, username);

    let history = readable_history(&state, &document_id, &username)?;

    Ok(HttpResponse::Ok().json(history))
}

// Fetch a snapshot; the live document is not modified
#[post("/api/versions/revert/{version_id}")]
async fn revert_to_version(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let version_id = path.into_inner();

    info!("⏪ Revert lookup: version_id={}, user={}", version_id, username);

    let version = state.ledger.revert(&version_id)?;
    readable_history(&state, &version.document_id, &username)?;

    Ok(HttpResponse::Ok().json(version))
}

#[get("/api/versions/contributions/{user}")]
async fn get_contributions(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let contributor = path.into_inner();

    info!("📊 Contributions of {} requested by {}", contributor, username);

    // Snapshots carry document content, so only the contributor may list them
    if contributor != username {
        warn!("❌ User {} asked for contributions of {}", username, contributor);
        return Err(ServiceError::Forbidden(
            "Contributions can only be listed by their author".to_string(),
        ));
    }

    let contributions = state.ledger.contributions_by_user(&contributor)?;

    Ok(HttpResponse::Ok().json(contributions))
}

// Register all version routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(save_version)
        .service(get_history)
        .service(revert_to_version)
        .service(get_contributions);
}
