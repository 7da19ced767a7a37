//! Prompt templates for segment and reduction calls

use crate::chunking::Segment;
use crate::types::{ChatMessage, Operation};

pub const SUMMARIZE_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes text clearly and concisely.";

pub const ANSWER_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers questions based on provided text.";

pub const COMBINE_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that combines multiple text segments coherently.";

/// Messages for one segment call
pub fn segment_messages(operation: &Operation, segment: &Segment) -> Vec<ChatMessage> {
    match operation {
        Operation::Summarize => vec![
            ChatMessage::system(SUMMARIZE_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Please summarize part {} of {} of the following text:\n\n{}",
                segment.index, segment.total, segment.text
            )),
        ],
        Operation::Answer { question } => vec![
            ChatMessage::system(ANSWER_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Using part {} of {} of the following text as context:\n\n{}\n\nPlease answer this question: {}",
                segment.index, segment.total, segment.text, question
            )),
        ],
    }
}

/// Messages for the reduction call; partials are space-joined in order
pub fn combine_messages(operation: &Operation, partials: &[String]) -> Vec<ChatMessage> {
    let joined = partials.join(" ");
    let prompt = match operation {
        Operation::Summarize => format!(
            "Please combine these summaries into one coherent summary:\n\n{}",
            joined
        ),
        Operation::Answer { question } => format!(
            "Please combine these answers into one coherent answer for the question '{}':\n\n{}",
            question, joined
        ),
    };

    vec![
        ChatMessage::system(COMBINE_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ]
}
