use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source document formats accepted for extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

/// Extensions treated as plain UTF-8 text
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "text"];

impl DocumentKind {
    /// Detect the kind from a file name's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if ext == "pdf" {
            Some(Self::Pdf)
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::PlainText)
        } else {
            None
        }
    }
}

/// Text pulled out of a source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Extracted text, page markers included for PDFs
    pub text: String,

    /// Number of pages (PDF only)
    pub page_count: Option<usize>,

    /// Length of `text` in characters
    pub char_count: usize,
}

impl ExtractedDocument {
    /// Create a new extraction result
    pub fn new(text: String, page_count: Option<usize>) -> Self {
        let char_count = text.chars().count();
        Self {
            text,
            page_count,
            char_count,
        }
    }

    /// True when no text survived extraction
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
