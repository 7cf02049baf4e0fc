//! Error types for the pdf2docx library.
//!
//! Every pipeline stage has its own failure kind so callers can distinguish
//! causes programmatically rather than parsing a formatted message string:
//!
//! * [`Pdf2DocxError::Unreadable`] — the input is not a parseable PDF.
//! * [`Pdf2DocxError::OcrUnavailable`] — the selected OCR engine cannot run.
//! * [`Pdf2DocxError::AiService`] — the AI cleanup call failed.
//! * [`Pdf2DocxError::Assembly`] — the document could not be written.
//!
//! No error is retried or recovered internally: the first failure aborts the
//! request and propagates upward with the original diagnostic preserved. No
//! partial document is ever produced alongside an error.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2docx library.
#[derive(Debug, Error)]
pub enum Pdf2DocxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is unreadable: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    Unreadable { path: PathBuf, detail: String },

    /// pdfium returned an error for a specific page during rasterisation.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The selected OCR engine is misconfigured or unreachable.
    #[error("OCR engine '{engine}' is unavailable: {detail}")]
    OcrUnavailable { engine: String, detail: String },

    /// OCR recognition failed on a specific page.
    #[error("OCR failed on page {page}: {detail}")]
    OcrFailed { page: usize, detail: String },

    // ── AI cleanup errors ─────────────────────────────────────────────────
    /// The AI cleanup call failed or the credential is invalid.
    ///
    /// The unmodified input is never silently returned on failure; the
    /// orchestrator treats this as fatal.
    #[error("AI cleanup failed: {detail}")]
    AiService { detail: String },

    // ── Assembly errors ───────────────────────────────────────────────────
    /// The word-processing document could not be built.
    #[error("Document assembly failed: {detail}")]
    Assembly { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output document file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A supplied credential could not be parsed.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_display() {
        let e = Pdf2DocxError::Unreadable {
            path: PathBuf::from("/tmp/bad.pdf"),
            detail: "xref table missing".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/bad.pdf"), "got: {msg}");
        assert!(msg.contains("xref table missing"));
    }

    #[test]
    fn ocr_unavailable_display() {
        let e = Pdf2DocxError::OcrUnavailable {
            engine: "vision".into(),
            detail: "no credential".into(),
        };
        assert!(e.to_string().contains("vision"));
        assert!(e.to_string().contains("no credential"));
    }

    #[test]
    fn ai_service_display_preserves_detail() {
        let e = Pdf2DocxError::AiService {
            detail: "HTTP 401: API key invalid".into(),
        };
        assert!(e.to_string().contains("API key invalid"));
    }

    #[test]
    fn not_a_pdf_shows_magic() {
        let e = Pdf2DocxError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"hell",
        };
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn assembly_display() {
        let e = Pdf2DocxError::Assembly {
            detail: "zip write error".into(),
        };
        assert!(e.to_string().contains("zip write error"));
    }
}
