use async_trait::async_trait;
use docbrief_common::{ApiError, ApiFailure, AppConfig, Result};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, info};

use crate::llm_trait::CompletionClient;
use crate::retry::{run_with_retry, AttemptOutcome, RetryPolicy};
use crate::sleeper::{Sleeper, TokioSleeper};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

/// Error bodies longer than this are cut before they reach error messages
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Chat completion API client
#[derive(Clone)]
pub struct ChatClient {
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    client: Client,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Create new client from application configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Completion client initialized: {} ({})", config.api_url, config.model);
        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            policy: RetryPolicy::from_config(config),
            sleeper: Arc::new(TokioSleeper),
            client,
        })
    }

    /// Replace the sleeper used for backoff waits
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Single attempt, classified for the retry loop
    async fn try_complete(&self, request: &ChatRequest<'_>) -> AttemptOutcome {
        let response = match self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Failed(ApiFailure::Network(e.to_string())),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return AttemptOutcome::RateLimited;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return AttemptOutcome::Failed(ApiFailure::Status {
                status: status.as_u16(),
                body: truncate_body(body.trim()),
            });
        }

        let body: ChatResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                return AttemptOutcome::Failed(ApiFailure::Malformed(format!(
                    "Failed to parse response: {}",
                    e
                )))
            }
        };

        match body.choices.into_iter().next() {
            Some(choice) => AttemptOutcome::Success(choice.message.content),
            None => AttemptOutcome::Failed(ApiFailure::Malformed(
                "response contains no choices".to_string(),
            )),
        }
    }
}

#[async_trait]
impl CompletionClient for ChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> std::result::Result<String, ApiError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Sending completion request - Model: {}, Messages: {}, Prompt length: {}",
            self.model,
            messages.len(),
            messages.iter().map(|m| m.content.len()).sum::<usize>()
        );

        let reply = run_with_retry(&self.policy, self.sleeper.as_ref(), |_| {
            self.try_complete(&request)
        })
        .await?;

        debug!("Received completion - Length: {}", reply.len());
        Ok(reply)
    }
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
