//! PDF text/image source: extractable-text probe, direct extraction, and
//! page rasterisation via pdfium.
//!
//! ## Why a trait seam here?
//!
//! The orchestrator's branching logic is the one piece of the pipeline worth
//! testing exhaustively, and it must be testable without a pdfium binary on
//! the test machine. [`PageSource`] is that seam: production code uses
//! [`PdfiumSource`], tests inject an instrumented fake.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations.

use crate::error::Pdf2DocxError;
use async_trait::async_trait;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Options controlling page rasterisation for the OCR path.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Rendering DPI. Raise for small-font documents.
    pub dpi: u32,
    /// Cap on the longest rendered edge in pixels.
    pub max_rendered_pixels: u32,
}

/// A source of PDF text and page images.
///
/// Implemented by [`PdfiumSource`] in production. All three operations take
/// the PDF as a path to a locally materialised file.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Whether the document contains an extractable text layer.
    ///
    /// Fails with [`Pdf2DocxError::Unreadable`] if the file is not a valid PDF.
    async fn has_extractable_text(&self, path: &Path) -> Result<bool, Pdf2DocxError>;

    /// Extract the text layer, preserving line structure where the PDF
    /// provides it. Best-effort: never fails on a readable PDF, may return
    /// an empty string; a page whose text cannot be read contributes nothing.
    async fn extract_text(&self, path: &Path) -> Result<String, Pdf2DocxError>;

    /// Rasterise every page to an image, one image per page, page order
    /// preserved. Fails with [`Pdf2DocxError::Unreadable`] on corrupt input.
    async fn render_pages(
        &self,
        path: &Path,
        opts: RenderOptions,
    ) -> Result<Vec<(usize, DynamicImage)>, Pdf2DocxError>;
}

/// The production [`PageSource`], backed by pdfium.
#[derive(Debug, Default)]
pub struct PdfiumSource;

#[async_trait]
impl PageSource for PdfiumSource {
    async fn has_extractable_text(&self, path: &Path) -> Result<bool, Pdf2DocxError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || has_extractable_text_blocking(&path))
            .await
            .map_err(|e| Pdf2DocxError::Internal(format!("Text probe task panicked: {e}")))?
    }

    async fn extract_text(&self, path: &Path) -> Result<String, Pdf2DocxError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || extract_text_blocking(&path))
            .await
            .map_err(|e| Pdf2DocxError::Internal(format!("Extraction task panicked: {e}")))?
    }

    async fn render_pages(
        &self,
        path: &Path,
        opts: RenderOptions,
    ) -> Result<Vec<(usize, DynamicImage)>, Pdf2DocxError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || render_pages_blocking(&path, opts))
            .await
            .map_err(|e| Pdf2DocxError::Internal(format!("Render task panicked: {e}")))?
    }
}

/// Bind to a pdfium library: an explicit `PDFIUM_LIB_PATH` first, then the
/// system library.
fn bind_pdfium() -> Result<Pdfium, Pdf2DocxError> {
    if let Ok(lib_path) = std::env::var("PDFIUM_LIB_PATH") {
        let bindings = Pdfium::bind_to_library(&lib_path)
            .map_err(|e| Pdf2DocxError::PdfiumBindingFailed(format!("{e:?}")))?;
        return Ok(Pdfium::new(bindings));
    }
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| Pdf2DocxError::PdfiumBindingFailed(format!("{e:?}")))
}

fn open_document<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
) -> Result<PdfDocument<'a>, Pdf2DocxError> {
    pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| Pdf2DocxError::Unreadable {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })
}

/// Blocking implementation of the extractable-text probe.
///
/// A document "has extractable text" when any page's text layer contains a
/// non-whitespace character. Scanner-produced PDFs typically have either no
/// text objects at all or a layer of pure whitespace.
fn has_extractable_text_blocking(path: &Path) -> Result<bool, Pdf2DocxError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, path)?;
    let pages = document.pages();

    for page in pages.iter() {
        if let Ok(text) = page.text() {
            if text.all().chars().any(|c| !c.is_whitespace()) {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Blocking implementation of direct text extraction.
fn extract_text_blocking(path: &Path) -> Result<String, Pdf2DocxError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, path)?;
    let pages = document.pages();

    let mut pages_text: Vec<String> = Vec::new();
    for (idx, page) in pages.iter().enumerate() {
        // Best-effort: an unreadable page contributes an empty string
        // rather than failing the whole extraction.
        let text = page.text().map(|t| t.all()).unwrap_or_default();
        debug!("Extracted {} chars from page {}", text.chars().count(), idx + 1);
        pages_text.push(text);
    }

    let joined = pages_text
        .iter()
        .map(|t| t.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n");
    info!(
        "Direct extraction: {} pages, {} chars",
        pages_text.len(),
        joined.chars().count()
    );
    Ok(joined)
}

/// Blocking implementation of page rendering.
fn render_pages_blocking(
    path: &Path,
    opts: RenderOptions,
) -> Result<Vec<(usize, DynamicImage)>, Pdf2DocxError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, path)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let mut results = Vec::with_capacity(total_pages);

    for (idx, page) in pages.iter().enumerate() {
        // Page width is in points (1/72 inch); scale to the requested DPI,
        // then cap the longest edge.
        let width_px = ((page.width().value / 72.0) * opts.dpi as f32) as i32;
        let width_px = width_px.clamp(1, opts.max_rendered_pixels as i32);
        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_maximum_height(opts.max_rendered_pixels as i32);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            Pdf2DocxError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        results.push((idx, image));
    }

    Ok(results)
}
