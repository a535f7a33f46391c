//! PDF text extraction for uploaded resumes.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::errors::AppError;

// Strip symbols that never carry resume meaning but confuse keyword matching
// (glyph artifacts, bullets, box-drawing characters from PDF extraction).
static SYMBOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.,;:()\-@]").unwrap());
static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Extracts text from an uploaded PDF. Image-only or corrupt PDFs come back
/// as a `Pdf` error with a message the client can show directly.
pub fn extract_resume_text(data: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(data).map_err(|e| {
        warn!("PDF extraction error: {e}");
        AppError::Pdf("Could not read the PDF file. Please upload a valid PDF.".to_string())
    })?;

    let cleaned = clean_resume_text(&text);
    if cleaned.is_empty() {
        return Err(AppError::Pdf(
            "Could not extract text from PDF. Please use a text-based PDF.".to_string(),
        ));
    }
    Ok(cleaned)
}

/// Normalizes extracted text: drops stray symbols, collapses runs of spaces
/// and blank lines.
pub fn clean_resume_text(content: &str) -> String {
    let content = SYMBOL_RE.replace_all(content, " ");
    let content = MULTI_SPACE_RE.replace_all(&content, " ");
    let content = BLANK_LINES_RE.replace_all(&content, "\n");
    content.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_exotic_symbols() {
        let input = "Skills: Rust ★ Python ● C++";
        assert_eq!(clean_resume_text(input), "Skills: Rust Python C");
    }

    #[test]
    fn test_clean_keeps_contact_punctuation() {
        let input = "jane.doe@example.com; (555) 123-4567";
        assert_eq!(clean_resume_text(input), "jane.doe@example.com; (555) 123-4567");
    }

    #[test]
    fn test_clean_collapses_spaces_and_blank_lines() {
        let input = "Line   one\n\n\nLine two";
        assert_eq!(clean_resume_text(input), "Line one\nLine two");
    }

    #[test]
    fn test_clean_trims_edges() {
        assert_eq!(clean_resume_text("  hello  "), "hello");
    }

    #[test]
    fn test_extract_rejects_garbage_bytes() {
        let err = extract_resume_text(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, AppError::Pdf(_)));
    }
}
