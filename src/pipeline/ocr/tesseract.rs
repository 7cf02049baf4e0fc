//! Local OCR backend: Tesseract running in-process.
//!
//! Tesseract's C API is blocking and not thread-safe across a single handle,
//! so a fresh handle is created per page inside `spawn_blocking`. Handle
//! construction is cheap relative to recognition itself.

use crate::error::Pdf2DocxError;
use crate::pipeline::ocr::OcrBackend;
use async_trait::async_trait;
use std::path::PathBuf;

/// Tesseract-backed [`OcrBackend`].
pub struct TesseractOcr {
    /// Optional tessdata directory. `None` uses the system default.
    datapath: Option<PathBuf>,
    /// Language string, e.g. "eng" or "eng+fra".
    language: String,
}

impl TesseractOcr {
    /// Create a backend using the system tessdata directory.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            datapath: None,
            language: language.into(),
        }
    }

    /// Use an explicit tessdata directory instead of the system default.
    pub fn with_datapath(mut self, path: impl Into<PathBuf>) -> Self {
        self.datapath = Some(path.into());
        self
    }
}

#[async_trait]
impl OcrBackend for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, page_num: usize, png: &[u8]) -> Result<String, Pdf2DocxError> {
        let datapath = self.datapath.clone();
        let language = self.language.clone();
        let png = png.to_vec();

        tokio::task::spawn_blocking(move || recognize_blocking(page_num, &datapath, &language, &png))
            .await
            .map_err(|e| Pdf2DocxError::Internal(format!("OCR task panicked: {e}")))?
    }
}

fn recognize_blocking(
    page_num: usize,
    datapath: &Option<PathBuf>,
    language: &str,
    png: &[u8],
) -> Result<String, Pdf2DocxError> {
    let datapath_str = match datapath {
        Some(p) => Some(p.to_str().ok_or_else(|| {
            Pdf2DocxError::OcrUnavailable {
                engine: "tesseract".into(),
                detail: "tessdata path is not valid UTF-8".into(),
            }
        })?),
        None => None,
    };

    let tess = tesseract::Tesseract::new(datapath_str, Some(language)).map_err(|e| {
        Pdf2DocxError::OcrUnavailable {
            engine: "tesseract".into(),
            detail: format!("initialisation failed for language '{language}': {e:?}"),
        }
    })?;

    let mut tess = tess
        .set_image_from_mem(png)
        .map_err(|e| Pdf2DocxError::OcrFailed {
            page: page_num,
            detail: format!("set_image_from_mem: {e:?}"),
        })?;

    tess.get_text().map_err(|e| Pdf2DocxError::OcrFailed {
        page: page_num,
        detail: format!("get_text: {e:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_reports_name() {
        let backend = TesseractOcr::new("eng");
        assert_eq!(backend.name(), "tesseract");
    }

    #[test]
    fn datapath_builder_sets_path() {
        let backend = TesseractOcr::new("eng").with_datapath("/usr/share/tessdata");
        assert_eq!(
            backend.datapath.as_deref(),
            Some(std::path::Path::new("/usr/share/tessdata"))
        );
    }
}
