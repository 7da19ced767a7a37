//! docbrief LLM integration
//!
//! Chunking, rate-limited completion client, and the summarize/answer pipeline

mod chunking;
mod client;
mod llm_trait;
mod pipeline;
mod prompts;
mod reduce;
mod retry;
mod sleeper;
mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use chunking::{chunk_text, Segment};
pub use client::ChatClient;
pub use llm_trait::CompletionClient;
pub use pipeline::{DocumentPipeline, PipelineSettings, PipelineStage};
pub use prompts::{combine_messages, segment_messages};
pub use reduce::Reducer;
pub use retry::{run_with_retry, AttemptOutcome, RetryPolicy};
pub use sleeper::{Sleeper, TokioSleeper};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Operation, Role};
