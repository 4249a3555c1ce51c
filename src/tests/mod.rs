// Shared helpers for the HTTP-level tests
use crate::models::Claims;
use crate::services::AppServices;
use crate::utils::auth::{CredentialVerifier, JwtVerifier};
use actix_web::web;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_SECRET: &str = "test-secret";

// Builds the full app over the given services, behind the authentication middleware
macro_rules! init_app {
    ($services:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($services.clone())
                .wrap(crate::utils::auth::Authentication::new(
                    crate::tests::verifier(),
                ))
                .configure(crate::routes::init_routes),
        )
        .await
    };
}

mod version_tests;

pub fn verifier() -> Arc<dyn CredentialVerifier> {
    Arc::new(JwtVerifier::new(TEST_SECRET))
}

pub fn test_services() -> (TempDir, web::Data<AppServices>) {
    let dir = TempDir::new().expect("temp dir");
    let services = AppServices::open(dir.path()).expect("open services");
    (dir, web::Data::new(services))
}

pub fn auth_header(username: &str) -> (&'static str, String) {
    let now = Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        exp: (now + Duration::hours(1)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("token");

    ("Authorization", format!("Bearer {}", token))
}
