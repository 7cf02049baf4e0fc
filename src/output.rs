//! Conversion output types: document bytes, extraction tag, statistics.
//!
//! Everything a caller needs after a conversion lives in
//! [`ConversionOutput`]: the assembled `.docx` bytes, the extracted text, a
//! tag recording which extraction strategy actually ran (so a cloud-to-local
//! OCR fallback is visible programmatically, not just in the logs), and the
//! derived statistics shown by the shell.
//!
//! All of the request's state is dropped once the output is handed back —
//! there is no persisted lifecycle.

use crate::config::OcrEngine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How many characters of the preview string to keep before truncating.
pub const PREVIEW_CHARS: usize = 1000;

/// Which extraction strategy produced the text.
///
/// Exactly one strategy runs per request. For the OCR path the tag also
/// records the engine that actually ran, which may differ from the engine
/// the caller requested (cloud requested without a credential degrades to
/// local).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// The PDF had an extractable text layer and it was used directly.
    DirectText,
    /// Pages were rasterised and recognised by the tagged OCR engine.
    Ocr { engine: OcrEngine },
}

/// The result of a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The assembled word-processing document.
    #[serde(skip)]
    pub document: Vec<u8>,

    /// The extracted (and possibly AI-cleaned) text content.
    pub text: String,

    /// Which extraction strategy actually ran.
    pub method: ExtractionMethod,

    /// Derived statistics over `text`, plus per-stage timings.
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Plain-text preview of the extracted content: the first
    /// [`PREVIEW_CHARS`] characters, ellipsis-truncated beyond that.
    pub fn preview(&self) -> String {
        preview_of(&self.text)
    }
}

/// Truncate `text` to [`PREVIEW_CHARS`] characters, appending "..." when
/// anything was cut.
pub fn preview_of(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Statistics derived from the extracted content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Number of characters (Unicode scalar values) in the text.
    pub char_count: usize,
    /// Number of whitespace-delimited words.
    pub word_count: usize,
    /// Number of newline-delimited line segments. An empty text still has
    /// one segment, matching what the shell displays.
    pub line_count: usize,

    /// Wall-clock duration of the whole request.
    pub total_duration_ms: u64,
    /// Time spent in direct text extraction (path A), 0 otherwise.
    pub extraction_duration_ms: u64,
    /// Time spent rendering pages and running OCR (path B), 0 otherwise.
    pub ocr_duration_ms: u64,
    /// Time spent in the AI cleanup pass, 0 when cleanup is absent.
    pub cleanup_duration_ms: u64,
    /// Time spent assembling the output document.
    pub assembly_duration_ms: u64,
}

impl ConversionStats {
    /// Compute the content counts for `text`. Durations start at zero and
    /// are filled in by the orchestrator.
    pub fn from_text(text: &str) -> Self {
        Self {
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
            line_count: text.split('\n').count(),
            ..Self::default()
        }
    }
}

/// Output file name for a converted document:
/// `{original_filename_without_extension}_converted.docx`.
pub fn download_file_name(original_name: &str) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string());
    format!("{stem}_converted.docx")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_counts_match_content() {
        let text = "Hello world\nsecond line\n\nfourth";
        let stats = ConversionStats::from_text(text);
        assert_eq!(stats.char_count, text.chars().count());
        assert_eq!(stats.word_count, 5);
        assert_eq!(stats.line_count, 4);
    }

    #[test]
    fn stats_of_empty_text() {
        let stats = ConversionStats::from_text("");
        assert_eq!(stats.char_count, 0);
        assert_eq!(stats.word_count, 0);
        // "".split('\n') yields one empty segment
        assert_eq!(stats.line_count, 1);
    }

    #[test]
    fn stats_count_unicode_chars_not_bytes() {
        let stats = ConversionStats::from_text("héllo wörld");
        assert_eq!(stats.char_count, 11);
        assert_eq!(stats.word_count, 2);
    }

    #[test]
    fn preview_short_text_untouched() {
        assert_eq!(preview_of("short text"), "short text");
    }

    #[test]
    fn preview_exactly_limit_untouched() {
        let text = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview_of(&text), text);
    }

    #[test]
    fn preview_truncates_with_ellipsis() {
        let text = "b".repeat(PREVIEW_CHARS + 50);
        let p = preview_of(&text);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        // Multi-byte chars must not be split mid-codepoint.
        let text = "é".repeat(PREVIEW_CHARS + 10);
        let p = preview_of(&text);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn download_name_convention() {
        assert_eq!(download_file_name("report.pdf"), "report_converted.docx");
        assert_eq!(download_file_name("scan"), "scan_converted.docx");
        assert_eq!(
            download_file_name("notes.final.pdf"),
            "notes.final_converted.docx"
        );
        assert_eq!(download_file_name(""), "document_converted.docx");
    }

    #[test]
    fn extraction_method_serialises_engine_tag() {
        let json = serde_json::to_string(&ExtractionMethod::Ocr {
            engine: crate::config::OcrEngine::Cloud,
        })
        .unwrap();
        assert!(json.contains("ocr"));
        assert!(json.contains("cloud"));
    }
}
