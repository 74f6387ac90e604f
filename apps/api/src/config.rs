use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;

/// Largest CV batch one multipart request is expected to carry. Used to size
/// the request-body cap so a full batch of maximum-size files fits.
const UPLOAD_BATCH_FILES: u64 = 20;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub model_name: String,
    pub port: u16,
    pub rust_log: String,
    /// Maximum number of CV evaluations in flight at once.
    pub max_concurrency: usize,
    /// Upload size cap per file, in megabytes.
    pub max_file_size_mb: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            model_name: std::env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_concurrency: std::env::var("MAX_CONCURRENCY")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<usize>()
                .context("MAX_CONCURRENCY must be a positive integer")?,
            max_file_size_mb: std::env::var("MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<u64>()
                .context("MAX_FILE_SIZE_MB must be a positive integer")?,
        })
    }

    /// Request-body cap for uploads. The per-file limit is enforced during
    /// ingestion; this cap only has to admit a whole batch plus multipart
    /// framing overhead, so the body never gets rejected before the per-file
    /// check can run.
    pub fn body_limit_bytes(&self) -> usize {
        ((self.max_file_size_mb * UPLOAD_BATCH_FILES + 1) * 1024 * 1024) as usize
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
