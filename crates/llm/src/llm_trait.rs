use crate::types::ChatMessage;
use async_trait::async_trait;
use docbrief_common::ApiError;

/// Common trait for completion clients
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one logical completion request and return the reply text
    ///
    /// Implementations own retry and backoff; callers never re-retry.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ApiError>;
}
