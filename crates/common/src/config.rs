use crate::error::DocBriefError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// docbrief application configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat completion endpoint
    pub api_url: String,

    /// Bearer credential for the completion API
    pub api_key: String,

    /// Model name sent with every request
    pub model: String,

    /// Completion length cap per request
    pub max_tokens: u32,

    /// Maximum characters per segment
    pub max_chunk_chars: usize,

    /// Attempts per logical API call
    pub max_retries: u32,

    /// Fixed wait after a non-429 failure
    pub retry_delay_secs: u64,

    /// 429 backoff step; attempt i waits `multiplier * (i + 1)`
    pub backoff_multiplier_secs: u64,

    /// Wait between consecutive API calls in one pipeline run
    pub pacing_delay_secs: u64,

    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,

    /// Upload size ceiling in bytes
    pub max_upload_bytes: usize,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("max_chunk_chars", &self.max_chunk_chars)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("backoff_multiplier_secs", &self.backoff_multiplier_secs)
            .field("pacing_delay_secs", &self.pacing_delay_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("log_dir", &self.log_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.mistral.ai/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "mistral-tiny".to_string(),
            max_tokens: 1000,
            max_chunk_chars: 4000,
            max_retries: 3,
            retry_delay_secs: 2,
            backoff_multiplier_secs: 2,
            pacing_delay_secs: 2,
            request_timeout_secs: 120,
            max_upload_bytes: 500 * 1024,
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, DocBriefError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        Ok(Self::from_vars(|key| std::env::var(key).ok()))
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            api_url: lookup("MISTRAL_API_URL").unwrap_or(defaults.api_url),
            api_key: lookup("MISTRAL_API_KEY").unwrap_or(defaults.api_key),
            model: lookup("MISTRAL_MODEL").unwrap_or(defaults.model),
            max_tokens: parse_or(lookup("MAX_TOKENS"), defaults.max_tokens),
            max_chunk_chars: parse_or(lookup("MAX_CHUNK_CHARS"), defaults.max_chunk_chars),
            max_retries: parse_or(lookup("MAX_RETRIES"), defaults.max_retries),
            retry_delay_secs: parse_or(lookup("RETRY_DELAY_SECS"), defaults.retry_delay_secs),
            backoff_multiplier_secs: parse_or(lookup("BACKOFF_MULTIPLIER_SECS"), defaults.backoff_multiplier_secs),
            pacing_delay_secs: parse_or(lookup("PACING_DELAY_SECS"), defaults.pacing_delay_secs),
            request_timeout_secs: parse_or(lookup("REQUEST_TIMEOUT_SECS"), defaults.request_timeout_secs),
            max_upload_bytes: parse_or(lookup("MAX_FILE_SIZE"), defaults.max_upload_bytes),
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(lookup("SERVER_PORT"), defaults.server_port),
            log_dir: lookup("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn backoff_multiplier(&self) -> Duration {
        Duration::from_secs(self.backoff_multiplier_secs)
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_secs(self.pacing_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DocBriefError> {
        if self.api_key.trim().is_empty() {
            return Err(DocBriefError::config("MISTRAL_API_KEY must be set"));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(DocBriefError::config(
                "API URL must start with http:// or https://",
            ));
        }

        if self.max_chunk_chars == 0 {
            return Err(DocBriefError::config("Maximum chunk size must be greater than 0"));
        }

        if self.max_retries == 0 {
            return Err(DocBriefError::config("Maximum retry count must be at least 1"));
        }

        if self.server_port == 0 {
            return Err(DocBriefError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}
