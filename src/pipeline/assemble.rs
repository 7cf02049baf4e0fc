//! Document assembly: extracted text → `.docx` bytes.
//!
//! Paragraph layout is a pure function kept separate from the docx writer so
//! the two formatting modes can be tested without unzipping office files:
//!
//! * `preserve_formatting = true` — every source line becomes its own
//!   paragraph and blank lines become empty spacer paragraphs, keeping the
//!   visual structure of the extracted text.
//! * `preserve_formatting = false` — structure collapses: the text is split
//!   into chunks at blank-line boundaries, whitespace inside each chunk is
//!   normalised to single spaces, and each chunk becomes one plain
//!   paragraph. No empty paragraphs are emitted in this mode.
//!
//! Output is deterministic: identical `(text, preserve_formatting)` inputs
//! produce byte-identical documents.

use crate::error::Pdf2DocxError;
use docx_rs::{Docx, Paragraph, Run};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Cursor;

static RE_BLANK_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Split `text` into the paragraphs the document will contain.
///
/// Empty or whitespace-only text yields no paragraphs in either mode.
pub fn layout_paragraphs(text: &str, preserve_formatting: bool) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    if preserve_formatting {
        text.split('\n')
            .map(|line| line.trim_end().to_string())
            .collect()
    } else {
        RE_BLANK_SPLIT
            .split(text)
            .map(|chunk| RE_WHITESPACE.replace_all(chunk, " ").trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Build a `.docx` document from `text`.
pub fn build_document(text: &str, preserve_formatting: bool) -> Result<Vec<u8>, Pdf2DocxError> {
    let paragraphs = layout_paragraphs(text, preserve_formatting);

    let mut docx = Docx::new();
    for para in &paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(para.as_str())));
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| Pdf2DocxError::Assembly {
            detail: format!("docx pack: {e}"),
        })?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Heading line\n\nFirst paragraph line one.\nLine two.\n\n\nSecond   paragraph.";

    #[test]
    fn preserving_layout_keeps_lines_and_blanks() {
        let paras = layout_paragraphs(SAMPLE, true);
        assert_eq!(
            paras,
            vec![
                "Heading line",
                "",
                "First paragraph line one.",
                "Line two.",
                "",
                "",
                "Second   paragraph.",
            ]
        );
    }

    #[test]
    fn plain_layout_collapses_structure() {
        let paras = layout_paragraphs(SAMPLE, false);
        assert_eq!(
            paras,
            vec![
                "Heading line",
                "First paragraph line one. Line two.",
                "Second paragraph.",
            ]
        );
    }

    #[test]
    fn plain_layout_never_emits_structural_markers() {
        // The markers of preserved structure are empty spacer paragraphs and
        // runs of repeated whitespace; plain mode must emit neither.
        let paras = layout_paragraphs(SAMPLE, false);
        assert!(paras.iter().all(|p| !p.is_empty()));
        assert!(paras.iter().all(|p| !p.contains("  ")));
        assert!(paras.iter().all(|p| !p.contains('\n')));
    }

    #[test]
    fn empty_text_yields_no_paragraphs() {
        assert!(layout_paragraphs("", true).is_empty());
        assert!(layout_paragraphs("   \n \n", true).is_empty());
        assert!(layout_paragraphs("", false).is_empty());
    }

    #[test]
    fn build_produces_zip_container() {
        let bytes = build_document("Hello world", true).unwrap();
        // .docx is a zip archive: PK\x03\x04
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn build_is_deterministic() {
        let a = build_document(SAMPLE, true).unwrap();
        let b = build_document(SAMPLE, true).unwrap();
        assert_eq!(a, b, "identical inputs must produce byte-identical output");

        let c = build_document(SAMPLE, false).unwrap();
        let d = build_document(SAMPLE, false).unwrap();
        assert_eq!(c, d);
    }

    #[test]
    fn formatting_modes_differ_for_structured_text() {
        let preserved = build_document(SAMPLE, true).unwrap();
        let plain = build_document(SAMPLE, false).unwrap();
        assert_ne!(preserved, plain);
    }

    #[test]
    fn empty_text_still_builds_a_document() {
        let bytes = build_document("", true).unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }
}
