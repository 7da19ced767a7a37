//! Document text extraction
//!
//! PDFs go through `pdf-extract`; plain text files only need UTF-8 decoding.

use docbrief_common::{DocBriefError, Result};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info};

use crate::types::{DocumentKind, ExtractedDocument};

/// PDF magic must appear within this many leading bytes
const PDF_HEADER_WINDOW: usize = 1024;

/// Extract text from document bytes of the given kind
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<ExtractedDocument> {
    match kind {
        DocumentKind::Pdf => extract_pdf_text(bytes),
        DocumentKind::PlainText => extract_plain_text(bytes),
    }
}

/// Extract text from PDF bytes, one `--- Page N ---` marker per page
pub fn extract_pdf_text(bytes: &[u8]) -> Result<ExtractedDocument> {
    if bytes.is_empty() {
        return Err(DocBriefError::extraction("Error extracting text from PDF: file is empty"));
    }
    if !has_pdf_header(bytes) {
        return Err(DocBriefError::extraction(
            "Error extracting text from PDF: missing %PDF header",
        ));
    }

    debug!("Extracting PDF text - Size: {} bytes", bytes.len());

    // The parser panics on some malformed inputs
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| DocBriefError::extraction("Error extracting text from PDF: parser crashed"))?
    .map_err(|e| DocBriefError::extraction(format!("Error extracting text from PDF: {}", e)))?;

    let document = ExtractedDocument::new(join_pages(&pages), Some(pages.len()));
    info!(
        "Extracted PDF text - Pages: {}, Characters: {}",
        pages.len(),
        document.char_count
    );

    Ok(document)
}

/// Decode a plain text document
pub fn extract_plain_text(bytes: &[u8]) -> Result<ExtractedDocument> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DocBriefError::extraction(format!("File is not valid UTF-8: {}", e)))?;
    Ok(ExtractedDocument::new(text.trim().to_string(), None))
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for (i, page) in pages.iter().enumerate() {
        text.push_str(&format!("\n--- Page {} ---\n", i + 1));
        text.push_str(page);
    }
    text.trim().to_string()
}
