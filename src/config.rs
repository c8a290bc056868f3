use anyhow::Context;
use std::net::SocketAddr;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// S3-compatible bucket receiving plan exports.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn minutes(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: var_or("JWT_ISSUER", "nutriai"),
            audience: var_or("JWT_AUDIENCE", "nutriai-users"),
            ttl_minutes: minutes("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: minutes("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let gemini = GeminiConfig {
            api_key: required("GEMINI_API_KEY")?,
            model: var_or("GEMINI_MODEL", "gemini-2.5-flash"),
            base_url: var_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
        };
        let storage = StorageConfig {
            endpoint: required("MINIO_ENDPOINT")?,
            bucket: var_or("MINIO_BUCKET", "nutriai-exports"),
            access_key: required("MINIO_ACCESS_KEY")?,
            secret_key: required("MINIO_SECRET_KEY")?,
            region: var_or("MINIO_REGION", "us-east-1"),
        };
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt,
            gemini,
            storage,
        })
    }
}

/// `APP_HOST:APP_PORT`, defaulting to `0.0.0.0:8080`.
pub fn listen_addr() -> anyhow::Result<SocketAddr> {
    let raw = format!("{}:{}", var_or("APP_HOST", "0.0.0.0"), var_or("APP_PORT", "8080"));
    raw.parse()
        .with_context(|| format!("invalid listen address {raw}"))
}
