//Third-party-dependencies
use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use collabdoc_service::config::Config;
use collabdoc_service::routes;
use collabdoc_service::services::AppServices;
use collabdoc_service::utils::auth::{Authentication, CredentialVerifier, JwtVerifier};
use log::{error, info, warn};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if config.uses_default_secret() {
        warn!("⚠️ JWT_SECRET not set, using the development secret");
    }

    std::fs::create_dir_all(&config.storage_path)?;
    let services = AppServices::open(&config.storage_path).map_err(|e| {
        error!("❌ Failed to open storage at {:?}: {}", config.storage_path, e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;
    let services = web::Data::new(services);
    let verifier: Arc<dyn CredentialVerifier> = Arc::new(JwtVerifier::new(&config.jwt_secret));

    let address = config.server_address.clone();
    info!("🚀 Server started at {}", address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config.cors_allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allow_any_header()
            .supports_credentials()
            .expose_headers(vec![header::AUTHORIZATION]);

        App::new()
            .app_data(services.clone())
            .wrap(Authentication::new(Arc::clone(&verifier)))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes::init_routes)
    })
    .bind(address)?
    .run()
    .await
}
