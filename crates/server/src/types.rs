use serde::{Deserialize, Serialize};

/// Summarize request
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// Full document text
    pub text_content: String,
}

/// Question answering request
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    /// Full document text
    pub text_content: String,

    /// Question about the text
    pub question: String,
}

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Extracted text with page markers
    pub extracted_text: String,

    /// Length of the extracted text in characters
    pub char_count: usize,

    /// Number of pages in the PDF
    pub page_count: Option<usize>,
}

/// Summarize response
#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Question answering response
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
