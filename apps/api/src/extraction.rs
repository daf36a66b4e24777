//! Resume extraction: PDF bytes to plain text.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF could not be read: {0}")]
    Unreadable(String),

    #[error("PDF contains no extractable text")]
    NoText,
}

/// Extracts the text of every page, in page order. Parsing runs on the
/// blocking pool; a PDF that yields only whitespace is rejected so it never
/// reaches the resume parser.
pub async fn extract_resume_text(pdf: Bytes) -> Result<String, ExtractionError> {
    let size = pdf.len();
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| {
            warn!("PDF extraction task aborted: {e}");
            ExtractionError::Unreadable("extraction aborted".to_string())
        })?
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    let text = ensure_text(extracted)?;
    debug!("Extracted {} characters from {size}-byte PDF", text.len());
    Ok(text)
}

fn ensure_text(text: String) -> Result<String, ExtractionError> {
    if text.trim().is_empty() {
        Err(ExtractionError::NoText)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_only_text_is_rejected() {
        assert!(matches!(
            ensure_text(" \n\t \u{c}\n".to_string()),
            Err(ExtractionError::NoText)
        ));
    }

    #[test]
    fn test_text_is_passed_through_untrimmed() {
        let text = ensure_text("  Ada Lovelace\nRust  ".to_string()).unwrap();
        assert_eq!(text, "  Ada Lovelace\nRust  ");
    }

    #[tokio::test]
    async fn test_non_pdf_bytes_are_unreadable() {
        let err = extract_resume_text(Bytes::from_static(b"plain text, not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)));
    }
}
