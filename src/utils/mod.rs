use crate::models::ServiceError;
use actix_web::{HttpMessage, HttpRequest};

pub mod auth;
pub mod document_lock;
pub mod record_store;

pub use auth::AuthenticatedUser;

// Username placed in the request by the authentication middleware
pub fn get_username_from_request(req: &HttpRequest) -> Result<String, ServiceError> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .map(|user| user.0.clone())
        .ok_or(ServiceError::Unauthorized)
}
