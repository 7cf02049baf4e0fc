//! Modular OCR backend abstraction.
//!
//! Defines the [`OcrBackend`] trait and unified engine selection so the two
//! recognition backends (local Tesseract, cloud Vision) can be swapped per
//! request. Backends receive one encoded page image at a time and return the
//! recognised text; [`recognize_pages`] drives them strictly in page order
//! and concatenates the results.

pub mod tesseract;
pub mod vision;

pub use tesseract::TesseractOcr;
pub use vision::VisionOcr;

use crate::config::OcrEngine;
use crate::error::Pdf2DocxError;
use crate::pipeline::encode;
use crate::progress::ConversionProgressCallback;
use async_trait::async_trait;
use image::DynamicImage;
use tracing::{debug, warn};

/// Async trait implemented by each OCR backend.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Backend identifier for logs and error messages.
    fn name(&self) -> &str;

    /// Recognise the text on one PNG-encoded page image.
    async fn recognize(&self, page_num: usize, png: &[u8]) -> Result<String, Pdf2DocxError>;
}

/// Decide which engine actually runs.
///
/// The cloud engine is used only if BOTH the caller selected it AND a
/// constructed cloud backend handle is present; otherwise the local engine
/// runs even when cloud was requested. The substitution is logged here and
/// surfaced to the caller through the extraction-method tag in the output —
/// it is an explicit, observable decision, not an invisible one.
pub fn select_engine(requested: OcrEngine, cloud_available: bool) -> OcrEngine {
    match requested {
        OcrEngine::Cloud if cloud_available => OcrEngine::Cloud,
        OcrEngine::Cloud => {
            warn!("Cloud OCR requested but no credential handle present; falling back to local engine");
            OcrEngine::Local
        }
        OcrEngine::Local => OcrEngine::Local,
    }
}

/// Run OCR over rendered pages, strictly in input order, and concatenate
/// the per-page text with a blank line between pages.
///
/// Any page failure aborts the whole recognition pass; there is no retry
/// and no partial result.
pub async fn recognize_pages(
    backend: &dyn OcrBackend,
    pages: &[(usize, DynamicImage)],
    progress: Option<&dyn ConversionProgressCallback>,
) -> Result<String, Pdf2DocxError> {
    let total = pages.len();
    let mut parts: Vec<String> = Vec::with_capacity(total);

    for (idx, image) in pages {
        let page_num = idx + 1;
        if let Some(cb) = progress {
            cb.on_page_ocr_start(page_num, total);
        }

        let png = encode::encode_page(page_num, image)?;
        let text = backend.recognize(page_num, &png).await?;
        debug!(
            "OCR page {}/{} via {}: {} chars",
            page_num,
            total,
            backend.name(),
            text.chars().count()
        );

        if let Some(cb) = progress {
            cb.on_page_ocr_complete(page_num, total, text.len());
        }
        parts.push(text.trim_end().to_string());
    }

    Ok(parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_requires_both_selection_and_handle() {
        assert_eq!(select_engine(OcrEngine::Cloud, true), OcrEngine::Cloud);
        assert_eq!(select_engine(OcrEngine::Cloud, false), OcrEngine::Local);
    }

    #[test]
    fn local_selection_ignores_cloud_availability() {
        assert_eq!(select_engine(OcrEngine::Local, true), OcrEngine::Local);
        assert_eq!(select_engine(OcrEngine::Local, false), OcrEngine::Local);
    }

    #[tokio::test]
    async fn pages_concatenate_in_input_order() {
        use image::{Rgba, RgbaImage};
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct NumberingBackend {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl OcrBackend for NumberingBackend {
            fn name(&self) -> &str {
                "numbering"
            }

            async fn recognize(
                &self,
                page_num: usize,
                _png: &[u8],
            ) -> Result<String, Pdf2DocxError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(format!("text of page {page_num}\n"))
            }
        }

        let img = || DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
        let pages = vec![(0, img()), (1, img()), (2, img())];
        let backend = NumberingBackend {
            calls: AtomicUsize::new(0),
        };

        let text = recognize_pages(&backend, &pages, None).await.unwrap();
        assert_eq!(
            text,
            "text of page 1\n\ntext of page 2\n\ntext of page 3"
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn page_failure_aborts_recognition() {
        use image::{Rgba, RgbaImage};

        struct FailingBackend;

        #[async_trait]
        impl OcrBackend for FailingBackend {
            fn name(&self) -> &str {
                "failing"
            }

            async fn recognize(
                &self,
                page_num: usize,
                _png: &[u8],
            ) -> Result<String, Pdf2DocxError> {
                Err(Pdf2DocxError::OcrFailed {
                    page: page_num,
                    detail: "engine exploded".into(),
                })
            }
        }

        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
        let result = recognize_pages(&FailingBackend, &[(0, img)], None).await;
        assert!(matches!(result, Err(Pdf2DocxError::OcrFailed { page: 1, .. })));
    }
}
