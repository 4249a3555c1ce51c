// collabdoc-service/src/utils/auth.rs
use crate::models::{Claims, ServiceError};
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, ResponseError};
use futures::future::{ok, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{debug, warn};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Turns a bearer credential into the username it was issued for.
///
/// Issuing credentials belongs to the user management service; this side only
/// verifies them.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<String, ServiceError>;
}

/// HS256 JWT verifier; the `sub` claim carries the username.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl CredentialVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<String, ServiceError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {:?}", e);
                ServiceError::Unauthorized
            })?;

        if claims.sub.trim().is_empty() {
            return Err(ServiceError::Unauthorized);
        }

        Ok(claims.sub)
    }
}

/// Username of the verified caller, stored in request extensions.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser(pub String);

// Extract JWT from Authorization header
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, ServiceError> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ServiceError::Unauthorized)
}

fn authenticate(
    req: &ServiceRequest,
    verifier: &dyn CredentialVerifier,
) -> Result<AuthenticatedUser, ServiceError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(ServiceError::Unauthorized)?
        .to_str()
        .map_err(|_| ServiceError::Unauthorized)?;

    let token = extract_token_from_header(auth_header)?;
    verifier.verify(token).map(AuthenticatedUser)
}

// Middleware rejecting requests without a valid bearer credential
pub struct Authentication {
    verifier: Arc<dyn CredentialVerifier>,
}

impl Authentication {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthenticationMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware {
            service,
            verifier: Arc::clone(&self.verifier),
        })
    }
}

pub struct AuthenticationMiddleware<S> {
    service: S,
    verifier: Arc<dyn CredentialVerifier>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req, self.verifier.as_ref()) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                warn!("🔒 Rejected unauthenticated request: {} {}", req.method(), req.path());
                let response = req
                    .into_response(err.error_response())
                    .map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
