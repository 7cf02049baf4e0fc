//! # pdf2docx
//!
//! Convert PDF documents to editable Word documents, with OCR for scanned or
//! handwritten pages and an optional AI cleanup pass.
//!
//! ## Why this crate?
//!
//! A PDF is either born digital (it carries an extractable text layer) or
//! born on paper (every page is an image). One tool rarely handles both
//! well. This crate probes the document first and picks the right path per
//! request: direct text extraction when a usable text layer exists, page
//! rasterisation plus OCR (local Tesseract or Google Vision) when it does
//! not, then optional AI grammar/spelling cleanup before assembling a
//! `.docx` the user can actually edit.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     stage the path or uploaded bytes, validate %PDF magic
//!  ├─ 2. Probe     does the document carry an extractable text layer?
//!  ├─ 3a. Extract  direct text extraction via pdfium          (path A)
//!  ├─ 3b. OCR      rasterise pages → Tesseract / Vision       (path B)
//!  ├─ 4. Cleanup   optional AI grammar/spelling pass
//!  └─ 5. Assemble  build the .docx + preview and statistics
//! ```
//!
//! Exactly one of 3a/3b runs per request. Cloud OCR runs only when the
//! caller injected a credential handle; a cloud request without one falls
//! back to the local engine, and the output's
//! [`ExtractionMethod`](output::ExtractionMethod) records which engine
//! actually ran.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2docx::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("scan.pdf", &config).await?;
//!     std::fs::write("scan_converted.docx", &output.document)?;
//!     println!("{}", output.preview());
//!     eprintln!(
//!         "{} chars / {} words / {} lines",
//!         output.stats.char_count, output.stats.word_count, output.stats.line_count
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Optional capabilities
//!
//! Cloud OCR and AI cleanup are injected as already-constructed handles, so
//! the orchestrator never touches credentials or ambient process state:
//!
//! ```rust,no_run
//! use pdf2docx::{ConversionConfig, GeminiCleanup, OcrEngine, VisionCredential, VisionOcr};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credential = VisionCredential::from_json(&std::fs::read_to_string("svc.json")?)?;
//! let config = ConversionConfig::builder()
//!     .ocr_engine(OcrEngine::Cloud)
//!     .vision(Arc::new(VisionOcr::new(credential, 60)?))
//!     .cleanup(Arc::new(GeminiCleanup::new("api-key", 60)?))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2docx` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2docx = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod credentials;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, OcrEngine};
pub use convert::{convert, convert_from_bytes, convert_sync, convert_to_file};
pub use credentials::VisionCredential;
pub use error::Pdf2DocxError;
pub use output::{download_file_name, ConversionOutput, ConversionStats, ExtractionMethod};
pub use pipeline::cleanup::{CleanupEngine, GeminiCleanup};
pub use pipeline::extract::{PageSource, PdfiumSource, RenderOptions};
pub use pipeline::ocr::{OcrBackend, TesseractOcr, VisionOcr};
pub use progress::{ConversionProgressCallback, ConversionStage, NoopProgressCallback, ProgressCallback};
