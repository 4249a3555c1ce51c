use crate::models::{
    CreateDocumentFromTemplateRequest, CreateTemplateRequest, ServiceError, UpdateTemplateRequest,
};
use crate::services::AppServices;
use crate::utils::get_username_from_request;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use log::info;

#[post("/api/documents/templates")]
async fn create_template(
    req: HttpRequest,
    state: web::Data<AppServices>,
    data: web::Json<CreateTemplateRequest>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;

    info!("📝 Create template: name={}, user={}", data.name, username);

    let template = state.templates.create_template(data.into_inner(), &username)?;

    Ok(HttpResponse::Ok().json(template))
}

#[get("/api/documents/templates")]
async fn list_templates(
    req: HttpRequest,
    state: web::Data<AppServices>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;

    let templates = state.templates.list_templates(&username)?;

    Ok(HttpResponse::Ok().json(templates))
}

#[get("/api/documents/templates/category/{category}")]
async fn templates_by_category(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let category = path.into_inner();

    let templates = state.templates.templates_by_category(&category, &username)?;

    Ok(HttpResponse::Ok().json(templates))
}

#[get("/api/documents/templates/{id}")]
async fn get_template(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let template_id = path.into_inner();

    let template = state.templates.get_template(&template_id, &username)?;

    Ok(HttpResponse::Ok().json(template))
}

#[put("/api/documents/templates/{id}")]
async fn update_template(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
    data: web::Json<UpdateTemplateRequest>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let template_id = path.into_inner();

    info!("🔄 Update template: template_id={}, user={}", template_id, username);

    let template = state
        .templates
        .update_template(&template_id, data.into_inner(), &username)?;

    Ok(HttpResponse::Ok().json(template))
}

#[delete("/api/documents/templates/{id}")]
async fn delete_template(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let template_id = path.into_inner();

    info!("🗑️ Delete template: template_id={}, user={}", template_id, username);

    state.templates.delete_template(&template_id, &username)?;

    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/documents/templates/{id}/create-document")]
async fn create_document_from_template(
    req: HttpRequest,
    state: web::Data<AppServices>,
    path: web::Path<String>,
    data: web::Json<CreateDocumentFromTemplateRequest>,
) -> Result<HttpResponse, ServiceError> {
    let username = get_username_from_request(&req)?;
    let template_id = path.into_inner();

    info!(
        "📄 Create document from template: template_id={}, title={}, user={}",
        template_id, data.title, username
    );

    let document = state
        .templates
        .instantiate(&template_id, &data.title, &username)?;

    Ok(HttpResponse::Ok().json(document))
}

// Must be registered ahead of the document routes: `/api/documents/{id}`
// would otherwise capture `templates`
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_template)
        .service(list_templates)
        .service(templates_by_category)
        .service(get_template)
        .service(update_template)
        .service(delete_template)
        .service(create_document_from_template);
}
