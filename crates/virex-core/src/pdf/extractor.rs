//! PDF text extraction using lopdf and pdf-extract.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfText, PdfTextExtractor, Result};
use crate::error::PdfError;

/// PDF text extractor backed by lopdf (loading, decryption) and
/// pdf-extract (text rendering).
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    /// Load the document, decrypting it when it uses an empty user password.
    ///
    /// Returns the bytes pdf-extract should read and the page count.
    fn prepare(&self, data: &[u8]) -> Result<(Option<Vec<u8>>, u32)> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let decrypted = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            Some(decrypted_data)
        } else {
            None
        };

        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        Ok((decrypted, page_count))
    }
}

impl PdfTextExtractor for PdfExtractor {
    fn render_to_text(&self, data: &[u8]) -> Result<PdfText> {
        let (decrypted, page_count) = self.prepare(data)?;
        let source = decrypted.as_deref().unwrap_or(data);

        // pdf-extract panics on some malformed content streams.
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(source)
        }))
        .map_err(|_| PdfError::TextExtraction("renderer panicked".to_string()))?
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        debug!("Rendered {} chars from {} pages", rendered.len(), page_count);

        Ok(PdfText {
            text: rendered,
            page_count,
        })
    }
}

/// Render a PDF, treating every failure as "no text".
///
/// With a timeout, rendering runs on a worker thread that is abandoned
/// once the deadline passes.
pub fn render_lossy(
    extractor: &Arc<dyn PdfTextExtractor>,
    data: &[u8],
    timeout: Option<Duration>,
) -> PdfText {
    let result = match timeout {
        None => extractor.render_to_text(data),
        Some(limit) => render_with_timeout(extractor, data, limit),
    };

    match result {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read PDF, treating as empty: {}", e);
            PdfText::default()
        }
    }
}

fn render_with_timeout(
    extractor: &Arc<dyn PdfTextExtractor>,
    data: &[u8],
    limit: Duration,
) -> Result<PdfText> {
    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(extractor);
    let owned = data.to_vec();

    let spawned = thread::Builder::new()
        .name("pdf-text".to_string())
        .spawn(move || {
            let _ = tx.send(worker.render_to_text(&owned));
        });

    if let Err(e) = spawned {
        debug!("Could not spawn PDF worker ({}), rendering inline", e);
        return extractor.render_to_text(data);
    }

    match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(PdfError::Timeout(limit.as_secs())),
        Err(RecvTimeoutError::Disconnected) => Err(PdfError::TextExtraction(
            "worker exited without a result".to_string(),
        )),
    }
}
