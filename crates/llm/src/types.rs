use serde::{Deserialize, Serialize};

/// Chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Single role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// System instruction message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User content message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    /// Model name (e.g., "mistral-tiny")
    pub model: &'a str,

    /// Conversation, system instruction first
    pub messages: &'a [ChatMessage],

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

/// Chat completion response body
///
/// Only the fields the client reads are modeled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

/// Operation mode of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Summarize,
    Answer { question: String },
}

impl Operation {
    /// Answer mode for the given question
    pub fn answer(question: impl Into<String>) -> Self {
        Self::Answer {
            question: question.into(),
        }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Answer { .. } => "answer",
        }
    }
}
