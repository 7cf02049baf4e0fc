//! Configuration types for PDF-to-Word conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads and to diff two runs to
//! understand why their outputs differ.
//!
//! Optional capabilities (cloud OCR, AI cleanup) are injected as
//! already-constructed handles. The orchestrator never builds a client from a
//! credential itself — the caller decides which capabilities exist, and an
//! absent handle simply means the corresponding stage is skipped or falls
//! back.

use crate::error::Pdf2DocxError;
use crate::pipeline::cleanup::CleanupEngine;
use crate::pipeline::extract::PageSource;
use crate::pipeline::ocr::OcrBackend;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Configuration for a PDF-to-Word conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2docx::{ConversionConfig, OcrEngine};
///
/// let config = ConversionConfig::builder()
///     .force_ocr(true)
///     .ocr_engine(OcrEngine::Local)
///     .ocr_language("eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Skip the extractable-text probe and always take the OCR path. Default: false.
    ///
    /// Use for handwritten or image-based PDFs whose embedded text layer (if
    /// any) is garbage — a scanner's half-hearted OCR layer often passes the
    /// extractable-text probe while being unreadable.
    pub force_ocr: bool,

    /// Keep the source line and blank-line structure in the output document. Default: true.
    ///
    /// When false, structural formatting is collapsed: whitespace is
    /// normalised and the text is re-flowed into plain paragraphs.
    pub preserve_formatting: bool,

    /// Which OCR engine the caller wants. Default: [`OcrEngine::Local`].
    ///
    /// [`OcrEngine::Cloud`] only runs when a `vision` handle is also present;
    /// otherwise the pipeline falls back to the local engine, logs the
    /// substitution, and reports the engine actually used in
    /// [`crate::output::ExtractionMethod`].
    pub ocr_engine: OcrEngine,

    /// Tesseract language string, e.g. "eng" or "eng+fra". Default: "eng".
    pub ocr_language: String,

    /// Rendering DPI used when rasterising pages for OCR. Range: 72–400. Default: 150.
    ///
    /// 150 DPI keeps text sharp enough for both Tesseract and Vision while
    /// image sizes stay well below the Vision API upload limit.
    pub dpi: u32,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 2000.
    ///
    /// A safety cap independent of DPI: a 200-DPI render of an A0 poster
    /// would otherwise exhaust memory before OCR even starts.
    pub max_rendered_pixels: u32,

    /// Per-network-call timeout in seconds (Vision, cleanup). Default: 60.
    pub api_timeout_secs: u64,

    /// PDF text/image source. `None` uses the built-in pdfium source.
    ///
    /// Overridable so tests can substitute an instrumented fake without a
    /// pdfium binary present.
    pub page_source: Option<Arc<dyn PageSource>>,

    /// Local OCR backend. `None` uses the built-in Tesseract backend,
    /// constructed lazily with `ocr_language`.
    pub local_ocr: Option<Arc<dyn OcrBackend>>,

    /// Cloud OCR backend, already constructed from a resolved credential.
    /// `None` means cloud OCR is absent and [`OcrEngine::Cloud`] requests
    /// fall back to the local engine.
    pub vision: Option<Arc<dyn OcrBackend>>,

    /// AI cleanup engine. `None` disables the cleanup pass entirely.
    pub cleanup: Option<Arc<dyn CleanupEngine>>,

    /// Milestone progress callback. `None` reports nothing.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            force_ocr: false,
            preserve_formatting: true,
            ocr_engine: OcrEngine::Local,
            ocr_language: "eng".to_string(),
            dpi: 150,
            max_rendered_pixels: 2000,
            api_timeout_secs: 60,
            page_source: None,
            local_ocr: None,
            vision: None,
            cleanup: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("force_ocr", &self.force_ocr)
            .field("preserve_formatting", &self.preserve_formatting)
            .field("ocr_engine", &self.ocr_engine)
            .field("ocr_language", &self.ocr_language)
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("page_source", &self.page_source.as_ref().map(|_| "<dyn PageSource>"))
            .field("local_ocr", &self.local_ocr.as_ref().map(|_| "<dyn OcrBackend>"))
            .field("vision", &self.vision.as_ref().map(|_| "<dyn OcrBackend>"))
            .field("cleanup", &self.cleanup.as_ref().map(|_| "<dyn CleanupEngine>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn force_ocr(mut self, v: bool) -> Self {
        self.config.force_ocr = v;
        self
    }

    pub fn preserve_formatting(mut self, v: bool) -> Self {
        self.config.preserve_formatting = v;
        self
    }

    pub fn ocr_engine(mut self, engine: OcrEngine) -> Self {
        self.config.ocr_engine = engine;
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn page_source(mut self, source: Arc<dyn PageSource>) -> Self {
        self.config.page_source = Some(source);
        self
    }

    pub fn local_ocr(mut self, backend: Arc<dyn OcrBackend>) -> Self {
        self.config.local_ocr = Some(backend);
        self
    }

    pub fn vision(mut self, backend: Arc<dyn OcrBackend>) -> Self {
        self.config.vision = Some(backend);
        self
    }

    pub fn cleanup(mut self, engine: Arc<dyn CleanupEngine>) -> Self {
        self.config.cleanup = Some(engine);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2DocxError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(Pdf2DocxError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if c.ocr_language.trim().is_empty() {
            return Err(Pdf2DocxError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which OCR engine to use for image-based pages.
///
/// The cloud engine is substantially more accurate on handwriting, but needs
/// a service-account credential and a network round-trip per page. Requests
/// for [`OcrEngine::Cloud`] without an injected credential handle degrade to
/// [`OcrEngine::Local`]; the substitution is logged and reported in the
/// conversion output, never silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngine {
    /// Tesseract, running in-process. Free, offline. (default)
    #[default]
    Local,
    /// Google Vision document text detection. Needs a credential.
    Cloud,
}

impl fmt::Display for OcrEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcrEngine::Local => write!(f, "tesseract"),
            OcrEngine::Cloud => write!(f, "vision"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_source_defaults() {
        let c = ConversionConfig::default();
        assert!(!c.force_ocr);
        assert!(c.preserve_formatting);
        assert_eq!(c.ocr_engine, OcrEngine::Local);
        assert_eq!(c.ocr_language, "eng");
        assert_eq!(c.dpi, 150);
        assert!(c.vision.is_none());
        assert!(c.cleanup.is_none());
    }

    #[test]
    fn builder_clamps_dpi() {
        let c = ConversionConfig::builder().dpi(10_000).build().unwrap();
        assert_eq!(c.dpi, 400);
        let c = ConversionConfig::builder().dpi(10).build().unwrap();
        assert_eq!(c.dpi, 72);
    }

    #[test]
    fn builder_rejects_empty_language() {
        let result = ConversionConfig::builder().ocr_language("  ").build();
        assert!(matches!(result, Err(Pdf2DocxError::InvalidConfig(_))));
    }

    #[test]
    fn engine_display_names() {
        assert_eq!(OcrEngine::Local.to_string(), "tesseract");
        assert_eq!(OcrEngine::Cloud.to_string(), "vision");
    }

    #[test]
    fn engine_serde_roundtrip() {
        let json = serde_json::to_string(&OcrEngine::Cloud).unwrap();
        assert_eq!(json, "\"cloud\"");
        let back: OcrEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OcrEngine::Cloud);
    }
}
