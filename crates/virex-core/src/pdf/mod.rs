//! PDF processing module.

mod extractor;

pub use extractor::{PdfExtractor, render_lossy};

use crate::error::PdfError;

/// Plain text rendered from a PDF document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfText {
    /// Concatenated text of all pages.
    pub text: String,
    /// Number of pages in the document (0 when unreadable).
    pub page_count: u32,
}

impl PdfText {
    /// True when the document yielded no usable text (e.g. a scan).
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text rendering implementations.
pub trait PdfTextExtractor: Send + Sync {
    /// Render the text of every page of a PDF held in memory.
    fn render_to_text(&self, data: &[u8]) -> Result<PdfText>;
}
