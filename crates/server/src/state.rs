use docbrief_common::{AppConfig, Result};
use docbrief_llm::DocumentPipeline;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Summarize/answer pipeline, shared by all requests
    pub pipeline: DocumentPipeline,
}

impl AppState {
    /// Create new application state backed by the HTTP completion client
    pub fn new(config: AppConfig) -> Result<Self> {
        let pipeline = DocumentPipeline::from_config(&config)?;
        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Create state around an existing pipeline
    pub fn with_pipeline(config: AppConfig, pipeline: DocumentPipeline) -> Self {
        Self { config, pipeline }
    }
}
