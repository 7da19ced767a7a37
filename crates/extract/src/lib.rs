//! docbrief document extraction
//!
//! Turns uploaded PDF or text bytes into raw text for the pipeline

pub mod pdf;
pub mod types;

// Re-export main types
pub use pdf::{extract_pdf_text, extract_plain_text, extract_text};
pub use types::{DocumentKind, ExtractedDocument};
