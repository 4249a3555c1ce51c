// src/routes/mod.rs
use actix_web::web;

pub mod document_routes;
pub mod template_routes;
pub mod version_routes;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    template_routes::init_routes(cfg);
    document_routes::init_routes(cfg);
    version_routes::init_routes(cfg);
}
