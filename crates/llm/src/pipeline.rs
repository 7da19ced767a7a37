use docbrief_common::{AppConfig, DocBriefError, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::chunking::chunk_text;
use crate::client::ChatClient;
use crate::llm_trait::CompletionClient;
use crate::prompts::segment_messages;
use crate::reduce::Reducer;
use crate::sleeper::{Sleeper, TokioSleeper};
use crate::types::Operation;

/// Pipeline tuning knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Maximum characters per segment
    pub max_chunk_chars: usize,

    /// Wait before every API call after the first
    pub pacing_delay: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_chunk_chars: 4000,
            pacing_delay: Duration::from_secs(2),
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_chunk_chars: config.max_chunk_chars,
            pacing_delay: config.pacing_delay(),
        }
    }
}

/// Where an invocation currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Chunked { segments: usize },
    PerSegmentCalling { index: usize, total: usize },
    Reducing,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunked { segments } => write!(f, "chunked ({} segments)", segments),
            Self::PerSegmentCalling { index, total } => write!(f, "calling segment {}/{}", index, total),
            Self::Reducing => write!(f, "reducing"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Chunk → per-segment calls → reduce
///
/// Segment calls run strictly one after another with a fixed pause between
/// them; this is how the provider's rate limit is honored. Any failure aborts
/// the whole invocation and no partial output is returned.
pub struct DocumentPipeline {
    client: Arc<dyn CompletionClient>,
    reducer: Reducer,
    sleeper: Arc<dyn Sleeper>,
    settings: PipelineSettings,
}

impl DocumentPipeline {
    /// Create pipeline around an existing client
    pub fn new(client: Arc<dyn CompletionClient>, settings: PipelineSettings) -> Self {
        Self {
            reducer: Reducer::new(client.clone()),
            client,
            sleeper: Arc::new(TokioSleeper),
            settings,
        }
    }

    /// Create pipeline backed by the HTTP completion client
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = ChatClient::new(config)?;
        Ok(Self::new(Arc::new(client), PipelineSettings::from_config(config)))
    }

    /// Replace the sleeper used for pacing
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Summarize the whole text
    pub async fn summarize(&self, text: &str) -> Result<String> {
        self.process(text, &Operation::Summarize).await
    }

    /// Answer a question using the text as context
    pub async fn answer_question(&self, text: &str, question: &str) -> Result<String> {
        self.process(text, &Operation::answer(question)).await
    }

    /// Run one pipeline invocation
    pub async fn process(&self, text: &str, operation: &Operation) -> Result<String> {
        if text.trim().is_empty() {
            return Err(DocBriefError::validation("Text content is empty"));
        }
        if let Operation::Answer { question } = operation {
            if question.trim().is_empty() {
                return Err(DocBriefError::validation("Question is empty"));
            }
        }

        let span = info_span!("pipeline", id = %Uuid::new_v4(), op = operation.label());
        async {
            let result = self.run(text, operation).await;
            match &result {
                Ok(output) => {
                    enter(PipelineStage::Done);
                    info!("Pipeline finished - Output length: {} chars", output.len());
                }
                Err(e) => {
                    enter(PipelineStage::Failed);
                    warn!("Pipeline failed: {}", e);
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, text: &str, operation: &Operation) -> Result<String> {
        info!("Starting pipeline - Text length: {} chars", text.chars().count());

        let segments = chunk_text(text, self.settings.max_chunk_chars);
        enter(PipelineStage::Chunked {
            segments: segments.len(),
        });

        let mut partials = Vec::with_capacity(segments.len());
        for segment in &segments {
            if segment.index > 1 {
                self.pace().await;
            }
            enter(PipelineStage::PerSegmentCalling {
                index: segment.index,
                total: segment.total,
            });

            let messages = segment_messages(operation, segment);
            let partial = self.client.complete(&messages).await?;
            debug!("Segment {}/{} done - Length: {}", segment.index, segment.total, partial.len());
            partials.push(partial);
        }

        if partials.len() > 1 {
            self.pace().await;
            enter(PipelineStage::Reducing);
        }

        self.reducer.reduce(operation, &partials).await
    }

    async fn pace(&self) {
        debug!("Pacing for {:?}", self.settings.pacing_delay);
        self.sleeper.sleep(self.settings.pacing_delay).await;
    }
}

fn enter(stage: PipelineStage) {
    debug!("Pipeline stage: {}", stage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use crate::testing::{Event, EventLog, RecordingSleeper, ScriptedClient};
    use crate::types::ChatMessage;
    use docbrief_common::{ApiError, ApiFailure};
    use httpmock::{Method::POST, MockServer};
    use std::sync::Mutex;

    const PACE: Duration = Duration::from_secs(2);

    fn pipeline(client: Arc<ScriptedClient>, max_chunk_chars: usize, sleeper: RecordingSleeper) -> DocumentPipeline {
        let settings = PipelineSettings {
            max_chunk_chars,
            pacing_delay: PACE,
        };
        DocumentPipeline::new(client, settings).with_sleeper(Arc::new(sleeper))
    }

    fn user_content(messages: &[ChatMessage]) -> &str {
        &messages[1].content
    }

    /// Reply "R<marker>" for segment prompts tagged with "M<marker>", "FINAL" otherwise
    fn marker_client() -> ScriptedClient {
        ScriptedClient::from_fn(|_, messages| {
            let content = &messages[1].content;
            match content.split_whitespace().find(|w| w.starts_with('M')) {
                Some(marker) if !content.starts_with("Please combine") => {
                    Ok(format!("R{}", &marker[1..]))
                }
                _ => Ok("FINAL".to_string()),
            }
        })
    }

    fn failure() -> ApiError {
        ApiError::Failed {
            attempts: 3,
            cause: ApiFailure::Status {
                status: 500,
                body: "boom".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_results_keep_segment_order() {
        let client = Arc::new(marker_client());
        let pipeline = pipeline(client.clone(), 8, RecordingSleeper::default());

        // Each marker word fills a segment of its own
        let result = pipeline.summarize("M1xxxxx M2xxxxx M3xxxxx M4xxxxx").await.unwrap();

        assert_eq!(result, "FINAL");
        let requests = client.requests();
        assert_eq!(requests.len(), 5);
        for (i, request) in requests[..4].iter().enumerate() {
            assert!(user_content(request).contains(&format!("part {} of 4", i + 1)));
            assert!(user_content(request).contains(&format!("M{}xxxxx", i + 1)));
        }
        assert!(user_content(&requests[4]).ends_with("R1xxxxx R2xxxxx R3xxxxx R4xxxxx"));
    }

    #[tokio::test]
    async fn test_single_segment_skips_reduction() {
        let client = Arc::new(ScriptedClient::with_replies(vec![Ok("short summary".to_string())]));
        let sleeper = RecordingSleeper::default();
        let pipeline = pipeline(client.clone(), 4000, sleeper.clone());

        let result = pipeline.summarize("A brief note.").await.unwrap();

        assert_eq!(result, "short summary");
        assert_eq!(client.requests().len(), 1);
        assert!(sleeper.waits().is_empty());
    }

    #[tokio::test]
    async fn test_pacing_waits_interleave_with_calls() {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let client = Arc::new(marker_client().with_log(log.clone()));
        let pipeline = pipeline(client, 8, RecordingSleeper::with_log(log.clone()));

        pipeline.summarize("M1xxxxx M2xxxxx M3xxxxx").await.unwrap();

        let kinds: Vec<&str> = log
            .lock()
            .unwrap()
            .iter()
            .map(|event| match event {
                Event::Call(_) => "call",
                Event::Sleep(d) if *d == PACE => "pace",
                Event::Sleep(_) => "other-sleep",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["call", "pace", "call", "pace", "call", "pace", "call"]
        );
    }

    #[tokio::test]
    async fn test_segment_failure_aborts_remaining_work() {
        let client = Arc::new(ScriptedClient::with_replies(vec![
            Ok("first".to_string()),
            Err(failure()),
            Ok("never used".to_string()),
        ]));
        let sleeper = RecordingSleeper::default();
        let pipeline = pipeline(client.clone(), 8, sleeper.clone());

        let err = pipeline
            .summarize("M1xxxxx M2xxxxx M3xxxxx")
            .await
            .unwrap_err();

        assert!(matches!(err, DocBriefError::Api(e) if e == failure()));
        // Third segment and reduction never issued
        assert_eq!(client.requests().len(), 2);
        assert_eq!(sleeper.waits(), vec![PACE]);
    }

    #[tokio::test]
    async fn test_reduction_failure_propagates() {
        let client = Arc::new(ScriptedClient::with_replies(vec![
            Ok("a".to_string()),
            Ok("b".to_string()),
            Err(failure()),
        ]));
        let pipeline = pipeline(client, 8, RecordingSleeper::default());

        let err = pipeline.summarize("M1xxxxx M2xxxxx").await.unwrap_err();
        assert!(matches!(err, DocBriefError::Api(_)));
    }

    #[tokio::test]
    async fn test_nine_thousand_chars_end_to_end() {
        let client = Arc::new(ScriptedClient::with_replies(vec![
            Ok("part one".to_string()),
            Ok("part two".to_string()),
            Ok("part three".to_string()),
            Ok("the whole document".to_string()),
        ]));
        let sleeper = RecordingSleeper::default();
        let pipeline = pipeline(client.clone(), 4000, sleeper.clone());

        let text = "abcd ".repeat(1800);
        let result = pipeline.summarize(&text).await.unwrap();

        assert_eq!(result, "the whole document");
        let requests = client.requests();
        assert_eq!(requests.len(), 4);
        assert!(user_content(&requests[2]).starts_with("Please summarize part 3 of 3"));
        assert!(user_content(&requests[3]).ends_with("part one part two part three"));
        assert_eq!(sleeper.waits(), vec![PACE, PACE, PACE]);
    }

    #[tokio::test]
    async fn test_answer_mode_embeds_question_everywhere() {
        let client = Arc::new(ScriptedClient::default());
        let pipeline = pipeline(client.clone(), 8, RecordingSleeper::default());

        pipeline
            .answer_question("M1xxxxx M2xxxxx", "Who wrote it?")
            .await
            .unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| user_content(r).contains("Who wrote it?")));
        assert!(user_content(&requests[2]).contains("one coherent answer"));
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_before_any_call() {
        let client = Arc::new(ScriptedClient::default());
        let pipeline = pipeline(client.clone(), 100, RecordingSleeper::default());

        let err = pipeline.summarize("  \n ").await.unwrap_err();
        assert!(matches!(err, DocBriefError::Validation(_)));

        let err = pipeline.answer_question("some text", " ").await.unwrap_err();
        assert!(matches!(err, DocBriefError::Validation(_)));

        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_client_stops_pipeline() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(503).body("unavailable");
            })
            .await;

        let config = AppConfig {
            api_url: server.url("/v1/chat/completions"),
            api_key: "test-key".to_string(),
            ..AppConfig::default()
        };
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = ChatClient::new(&config)
            .expect("client")
            .with_sleeper(sleeper.clone())
            .with_retry_policy(RetryPolicy::default());
        let settings = PipelineSettings {
            max_chunk_chars: 8,
            pacing_delay: PACE,
        };
        let pipeline = DocumentPipeline::new(Arc::new(client), settings).with_sleeper(sleeper.clone());

        let err = pipeline
            .summarize("M1xxxxx M2xxxxx M3xxxxx")
            .await
            .unwrap_err();

        // All attempts spent on the first segment, nothing after it
        mock.assert_hits_async(3).await;
        assert!(matches!(
            err,
            DocBriefError::Api(ApiError::Failed { attempts: 3, .. })
        ));
        assert_eq!(sleeper.waits(), vec![Duration::from_secs(2), Duration::from_secs(2)]);
    }

    #[test]
    fn test_settings_from_config() {
        let config = AppConfig {
            max_chunk_chars: 1500,
            pacing_delay_secs: 0,
            ..AppConfig::default()
        };
        let settings = PipelineSettings::from_config(&config);
        assert_eq!(settings.max_chunk_chars, 1500);
        assert_eq!(settings.pacing_delay, Duration::ZERO);
    }
}
