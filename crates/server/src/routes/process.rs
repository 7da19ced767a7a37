use actix_web::{post, web, HttpResponse};
use tracing::{info, warn};

use crate::error::HttpError;
use crate::state::AppState;
use crate::types::{AnswerResponse, QuestionRequest, SummarizeRequest, SummarizeResponse};

/// Summarize the given text
#[post("/summarize")]
pub async fn summarize(
    req: web::Json<SummarizeRequest>,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    info!("Summarize requested - Text length: {} chars", req.text_content.len());

    let summary = state
        .pipeline
        .summarize(&req.text_content)
        .await
        .map_err(|e| {
            warn!("Summarization failed: {}", e);
            HttpError(e)
        })?;

    Ok(HttpResponse::Ok().json(SummarizeResponse {
        summary: summary.trim().to_string(),
    }))
}

/// Answer a question about the given text
#[post("/ask-question")]
pub async fn ask_question(
    req: web::Json<QuestionRequest>,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    info!(
        "Question requested - Text length: {} chars, Question: {}",
        req.text_content.len(),
        req.question
    );

    let answer = state
        .pipeline
        .answer_question(&req.text_content, &req.question)
        .await
        .map_err(|e| {
            warn!("Question answering failed: {}", e);
            HttpError(e)
        })?;

    Ok(HttpResponse::Ok().json(AnswerResponse {
        answer: answer.trim().to_string(),
    }))
}
