use std::env;
use std::path::PathBuf;

const DEFAULT_ADDRESS: &str = "127.0.0.1:8082";
const DEFAULT_STORAGE_PATH: &str = "./storage";
// Shared with the user management service that issues tokens
const DEFAULT_JWT_SECRET: &str = "mySecretKeyForJwtTokenGenerationWhichIsLongEnough";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub storage_path: PathBuf,
    pub jwt_secret: String,
    pub cors_allowed_origin: String,
}

impl Config {
    // Reads settings from the environment, falling back to development defaults
    pub fn from_env() -> Self {
        Self {
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_ADDRESS.to_string()),
            storage_path: env::var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH)),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string()),
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
