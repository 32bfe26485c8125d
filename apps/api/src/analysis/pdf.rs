//! PDF text extraction for uploaded documents.
//!
//! Parsing is CPU-bound, so it runs inside `tokio::task::spawn_blocking`.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Returns true when an uploaded filename looks like a PDF.
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}

/// Extracts and trims the text content of a PDF document.
pub async fn extract_pdf_text(data: Bytes) -> Result<String, AppError> {
    let size = data.len();
    let result =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;

    // The parser can panic on malformed input; treat that like a parse error.
    let text = match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            return Err(unreadable_pdf());
        }
        Err(e) if e.is_panic() => {
            warn!("PDF parser panicked on a {size} byte upload");
            return Err(unreadable_pdf());
        }
        Err(e) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "spawn_blocking failed in PDF extraction: {e}"
            )))
        }
    };

    debug!("Extracted {} chars from {} byte PDF", text.len(), size);
    Ok(text.trim().to_string())
}

fn unreadable_pdf() -> AppError {
    AppError::Validation("Uploaded file is not a readable PDF".to_string())
}
