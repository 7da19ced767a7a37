use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use docbrief_common::DocBriefError;
use docbrief_extract::{extract_pdf_text, DocumentKind};
use futures_util::StreamExt;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{bad_request, HttpError};
use crate::state::AppState;
use crate::types::UploadResponse;

/// Accept a PDF upload and return its text
#[post("/upload-pdf")]
pub async fn upload_pdf(
    mut payload: Multipart,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let max_bytes = state.config.max_upload_bytes;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let content_disposition = field.content_disposition();

        if content_disposition.get_name() != Some("file") {
            continue;
        }

        let filename = content_disposition
            .get_filename()
            .unwrap_or("unknown")
            .to_string();

        if DocumentKind::from_path(Path::new(&filename)) != Some(DocumentKind::Pdf) {
            return Err(bad_request("Only PDF files are allowed").into());
        }

        // Keep counting past the limit so the error can report the real size
        let mut size = 0usize;
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            size += data.len();
            if size <= max_bytes {
                bytes.extend_from_slice(&data);
            }
        }

        if size > max_bytes {
            warn!("Rejected upload {} - Size: {} bytes", filename, size);
            return Err(bad_request(format!(
                "File size ({:.1}KB) exceeds maximum limit of {:.1}KB",
                size as f64 / 1024.0,
                max_bytes as f64 / 1024.0
            ))
            .into());
        }

        upload = Some((filename, bytes));
    }

    let Some((filename, bytes)) = upload else {
        return Err(bad_request("No file uploaded").into());
    };

    info!("Extracting text from {} ({} bytes)", filename, bytes.len());

    let document = web::block(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| HttpError(DocBriefError::internal(e.to_string())))?
        .map_err(HttpError)?;

    if document.is_empty() {
        return Err(bad_request("No text could be extracted from the PDF").into());
    }

    Ok(HttpResponse::Ok().json(UploadResponse {
        char_count: document.char_count,
        page_count: document.page_count,
        extracted_text: document.text,
    }))
}
