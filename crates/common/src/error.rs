use std::fmt;

/// Underlying cause of a failed completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// Request never produced an HTTP response (connect, timeout, TLS, ...)
    Network(String),

    /// Non-2xx response other than 429
    Status { status: u16, body: String },

    /// 2xx response whose body lacks `choices[0].message.content`
    Malformed(String),
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network failure: {}", msg),
            Self::Status { status, body } if body.is_empty() => write!(f, "HTTP {}", status),
            Self::Status { status, body } => write!(f, "HTTP {}: {}", status, body),
            Self::Malformed(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

/// Completion API error, raised once the client's retry budget is spent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Every attempt was answered with HTTP 429
    #[error("maximum retries exceeded after {attempts} attempts (rate limited)")]
    RetriesExhausted { attempts: u32 },

    /// The final attempt failed for a reason other than rate limiting
    #[error("completion API error after {attempts} attempts: {cause}")]
    Failed { attempts: u32, cause: ApiFailure },
}

impl ApiError {
    /// True when the budget was consumed by rate limiting
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }

    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            Self::RetriesExhausted { attempts } | Self::Failed { attempts, .. } => *attempts,
        }
    }
}

/// docbrief error types
#[derive(Debug, thiserror::Error)]
pub enum DocBriefError {
    /// Source document could not be read
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Input rejected before any API call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Completion API failure
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DocBriefError {
    /// Create extraction error
    pub fn extraction<S: Into<String>>(msg: S) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

// HTTP response conversion
impl DocBriefError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Extraction(_) => 400,
            Self::Validation(_) => 400,
            Self::Json(_) => 400,
            Self::Api(e) if e.is_rate_limited() => 503,
            Self::Api(_) => 502,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_exhaustion_is_distinguishable() {
        let exhausted = ApiError::RetriesExhausted { attempts: 3 };
        assert!(exhausted.is_rate_limited());
        assert!(exhausted.to_string().contains("maximum retries exceeded"));

        let failed = ApiError::Failed {
            attempts: 3,
            cause: ApiFailure::Network("connection refused".to_string()),
        };
        assert!(!failed.is_rate_limited());
        assert!(failed.to_string().contains("connection refused"));
        assert_eq!(failed.attempts(), 3);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DocBriefError::validation("empty").status_code(), 400);
        assert_eq!(DocBriefError::extraction("bad pdf").status_code(), 400);
        assert_eq!(
            DocBriefError::from(ApiError::RetriesExhausted { attempts: 3 }).status_code(),
            503
        );
        let failed = ApiError::Failed {
            attempts: 1,
            cause: ApiFailure::Status {
                status: 500,
                body: "boom".to_string(),
            },
        };
        assert_eq!(DocBriefError::from(failed).status_code(), 502);
    }

    #[test]
    fn test_failure_display() {
        let status = ApiFailure::Status {
            status: 401,
            body: String::new(),
        };
        assert_eq!(status.to_string(), "HTTP 401");
        let malformed = ApiFailure::Malformed("missing choices".to_string());
        assert_eq!(malformed.to_string(), "malformed response: missing choices");
    }
}
