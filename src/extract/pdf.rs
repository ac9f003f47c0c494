use crate::extract::text::normalize_text;
use crate::extract::ExtractError;
use std::panic;

/// Extracts whitespace-normalized text from PDF bytes
///
/// The underlying parser can panic on malformed input, so the call runs
/// under `catch_unwind` and a panic is reported as an extraction error.
///
/// # Arguments
///
/// * `bytes` - The raw PDF body
///
/// # Returns
///
/// * `Ok(String)` - Extracted text (possibly empty for image-only PDFs)
/// * `Err(ExtractError)` - The bytes could not be parsed as a PDF
pub fn pdf_to_text(bytes: &[u8]) -> Result<String, ExtractError> {
    if bytes.is_empty() {
        return Err(ExtractError::Pdf("empty body".to_string()));
    }

    let outcome = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match outcome {
        Ok(Ok(text)) => Ok(normalize_text(&text)),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => Err(ExtractError::Pdf("parser panicked".to_string())),
    }
}
