/// Configuration management for the API server
///
/// Loads configuration from environment variables into a typed struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `BLOB_BACKEND`: "s3" or "memory" (default: s3)
/// - `BLOB_BUCKET`: Bucket for attachment blobs (default: anexos)
/// - `BLOB_ENDPOINT`, `BLOB_REGION`, `BLOB_ACCESS_KEY`, `BLOB_SECRET_KEY`,
///   `BLOB_PUBLIC_BASE_URL`, `BLOB_USE_PATH_STYLE`: S3 backend settings
/// - `UPLOAD_MAX_BYTES`: Maximum attachment size (default: 10 MiB)
/// - `SESSION_TTL_SECONDS`: Session lifetime (default: 3600)
/// - `SESSION_COOKIE_NAME`: Cookie carrying the session token (default: sessao)
/// - `SESSION_COOKIE_SECURE`: Set Secure + SameSite=None on the cookie
///   (default: false — use true behind HTTPS in cross-site deployments)

use gestor_shared::storage::S3Config;
use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Blob storage configuration
    pub storage: StorageConfig,

    /// Session configuration
    pub session: SessionConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` mirrors the request origin (credentials
    /// require a concrete origin in the response)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Which blob store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    /// S3-compatible service (production)
    S3,

    /// In-process map (development only; blobs do not survive restarts)
    Memory,
}

/// Blob storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend selection
    pub backend: BlobBackend,

    /// Bucket holding attachment blobs
    pub bucket: String,

    /// Custom S3 endpoint (MinIO etc.)
    pub endpoint: Option<String>,

    /// S3 region
    pub region: Option<String>,

    /// Static S3 access key
    pub access_key: Option<String>,

    /// Static S3 secret key
    pub secret_key: Option<String>,

    /// Public URL prefix (including bucket) under which blobs are served
    pub public_base_url: Option<String>,

    /// Path-style addressing for S3 emulators
    pub use_path_style: bool,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds
    pub ttl_seconds: u64,

    /// Name of the cookie carrying the session token
    pub cookie_name: String,

    /// Whether to mark the cookie Secure (and SameSite=None for cross-site)
    pub cookie_secure: bool,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or values fail to
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let backend = match env::var("BLOB_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => BlobBackend::S3,
            "memory" => BlobBackend::Memory,
            other => anyhow::bail!("Unknown BLOB_BACKEND: {other} (expected \"s3\" or \"memory\")"),
        };

        let max_upload_bytes = env::var("UPLOAD_MAX_BYTES")
            .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
            .parse::<usize>()?;

        let ttl_seconds = env::var("SESSION_TTL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()?;
        let cookie_name = env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "sessao".to_string());
        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            storage: StorageConfig {
                backend,
                bucket: env::var("BLOB_BUCKET").unwrap_or_else(|_| "anexos".to_string()),
                endpoint: env::var("BLOB_ENDPOINT").ok(),
                region: env::var("BLOB_REGION").ok(),
                access_key: env::var("BLOB_ACCESS_KEY").ok(),
                secret_key: env::var("BLOB_SECRET_KEY").ok(),
                public_base_url: env::var("BLOB_PUBLIC_BASE_URL").ok(),
                use_path_style: env::var("BLOB_USE_PATH_STYLE")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(true),
                max_upload_bytes,
            },
            session: SessionConfig {
                ttl_seconds,
                cookie_name,
                cookie_secure,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

impl StorageConfig {
    /// Builds the S3 backend configuration from the storage settings
    pub fn s3_config(&self) -> S3Config {
        S3Config {
            endpoint: self.endpoint.clone(),
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            public_base_url: self.public_base_url.clone(),
            use_path_style: self.use_path_style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/gestor".to_string(),
                max_connections: 10,
            },
            storage: StorageConfig {
                backend: BlobBackend::Memory,
                bucket: "anexos".to_string(),
                endpoint: None,
                region: None,
                access_key: None,
                secret_key: None,
                public_base_url: None,
                use_path_style: true,
                max_upload_bytes: 10 * 1024 * 1024,
            },
            session: SessionConfig {
                ttl_seconds: 3600,
                cookie_name: "sessao".to_string(),
                cookie_secure: false,
            },
        }
    }

    #[test]
    fn test_bind_address() {
        let config = sample_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_s3_config_carries_bucket() {
        let config = sample_config();
        assert_eq!(config.storage.s3_config().bucket, "anexos");
    }
}
