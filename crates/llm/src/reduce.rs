use docbrief_common::{DocBriefError, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::llm_trait::CompletionClient;
use crate::prompts::combine_messages;
use crate::types::Operation;

/// Combines ordered per-segment results into one
pub struct Reducer {
    client: Arc<dyn CompletionClient>,
}

impl Reducer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Reduce partial results with at most one API call
    ///
    /// A single partial is returned unchanged. The joined partials are not
    /// re-chunked, so very long documents can produce an oversized prompt.
    pub async fn reduce(&self, operation: &Operation, partials: &[String]) -> Result<String> {
        match partials {
            [] => Err(DocBriefError::validation("Nothing to combine")),
            [only] => {
                debug!("Single partial result, skipping combination call");
                Ok(only.clone())
            }
            _ => {
                info!(
                    "Combining {} partial results - Length: {} chars",
                    partials.len(),
                    partials.iter().map(|p| p.len()).sum::<usize>()
                );
                let messages = combine_messages(operation, partials);
                Ok(self.client.complete(&messages).await?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use docbrief_common::{ApiError, ApiFailure};

    #[tokio::test]
    async fn test_single_partial_bypasses_api() {
        let client = Arc::new(ScriptedClient::default());
        let reducer = Reducer::new(client.clone());

        let result = reducer
            .reduce(&Operation::Summarize, &["only one".to_string()])
            .await
            .unwrap();

        assert_eq!(result, "only one");
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_multiple_partials_use_one_call() {
        let client = Arc::new(ScriptedClient::with_replies(vec![Ok("combined".to_string())]));
        let reducer = Reducer::new(client.clone());
        let partials = vec!["A1".to_string(), "B2".to_string(), "C3".to_string()];

        let result = reducer
            .reduce(&Operation::answer("What?"), &partials)
            .await
            .unwrap();

        assert_eq!(result, "combined");
        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0][1].content.ends_with("A1 B2 C3"));
        assert!(requests[0][1].content.contains("'What?'"));
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let failure = ApiError::Failed {
            attempts: 3,
            cause: ApiFailure::Network("down".to_string()),
        };
        let client = Arc::new(ScriptedClient::with_replies(vec![Err(failure.clone())]));
        let reducer = Reducer::new(client);

        let err = reducer
            .reduce(&Operation::Summarize, &["a".to_string(), "b".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, DocBriefError::Api(e) if e == failure));
    }

    #[tokio::test]
    async fn test_empty_partials_rejected() {
        let reducer = Reducer::new(Arc::new(ScriptedClient::default()));
        let err = reducer.reduce(&Operation::Summarize, &[]).await.unwrap_err();
        assert!(matches!(err, DocBriefError::Validation(_)));
    }
}
