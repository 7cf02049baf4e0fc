//! Conversion entry points: the orchestrator.
//!
//! This is the only module with branching logic. It decides the extraction
//! strategy (direct text layer vs. OCR), sequences the optional enhancement
//! stages, and drives the pipeline end to end:
//!
//! 1. probe for an extractable text layer;
//! 2. path A (direct extraction) **or** path B (render → OCR) — never both;
//! 3. optional AI cleanup, when the caller injected a cleanup handle;
//! 4. document assembly.
//!
//! Any stage failure aborts the remaining pipeline immediately. There is no
//! retry and no degraded path: a single typed error propagates upward with
//! the original failure's message preserved, and no document is produced.
//! Temporary state is scoped to the request and removed on every exit path.

use crate::config::{ConversionConfig, OcrEngine};
use crate::error::Pdf2DocxError;
use crate::output::{ConversionOutput, ConversionStats, ExtractionMethod};
use crate::pipeline::extract::{PageSource, PdfiumSource, RenderOptions};
use crate::pipeline::ocr::{self, OcrBackend, TesseractOcr};
use crate::pipeline::{assemble, input};
use crate::progress::ConversionStage;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file to a Word document.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_path` — Path to a local PDF file
/// * `config` — Conversion configuration, including any injected capability
///   handles (cloud OCR, AI cleanup)
///
/// # Errors
/// Returns the first stage failure as a typed [`Pdf2DocxError`]; see the
/// module docs for the propagation policy.
pub async fn convert(
    input_path: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2DocxError> {
    let input_path = input_path.as_ref();
    info!("Starting conversion: {}", input_path);

    let resolved = input::resolve_local(input_path)?;
    run_pipeline(resolved.path(), config).await
}

/// Convert raw PDF bytes to a Word document.
///
/// The bytes are staged into a request-scoped temporary directory that is
/// removed when this function returns, on success and on failure alike.
/// This is the API to use when the PDF arrives as an upload rather than a
/// file on disk.
pub async fn convert_from_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2DocxError> {
    info!("Starting conversion of {} uploaded bytes", bytes.len());

    let resolved = input::stage_bytes(bytes)?;
    // `resolved` owns the workdir; it is dropped (and the directory deleted)
    // when this function returns.
    run_pipeline(resolved.path(), config).await
}

/// Convert a PDF and write the document directly to a file.
///
/// Uses atomic write (temp file + rename) so a failed conversion never
/// leaves a partial document at `output_path`.
pub async fn convert_to_file(
    input_path: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2DocxError> {
    let output = convert(input_path, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Pdf2DocxError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    let tmp_path = path.with_extension("docx.tmp");
    tokio::fs::write(&tmp_path, &output.document)
        .await
        .map_err(|e| Pdf2DocxError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2DocxError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_path: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2DocxError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2DocxError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(input_path, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Drive the full pipeline for a locally materialised PDF.
async fn run_pipeline(
    pdf_path: &Path,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2DocxError> {
    let total_start = Instant::now();
    let source = resolve_page_source(config);

    // ── Step 1: Probe for an extractable text layer ──────────────────────
    stage(config, ConversionStage::Analyzing);
    let has_text = source.has_extractable_text(pdf_path).await?;
    debug!("Extractable text layer present: {}", has_text);

    let mut extraction_duration_ms = 0;
    let mut ocr_duration_ms = 0;

    // ── Step 2: Exactly one extraction path ──────────────────────────────
    let (text, method) = if has_text && !config.force_ocr {
        info!("Document contains extractable text; using direct text extraction");
        stage(config, ConversionStage::Extracting);
        let start = Instant::now();
        let text = source.extract_text(pdf_path).await?;
        extraction_duration_ms = start.elapsed().as_millis() as u64;
        (text, ExtractionMethod::DirectText)
    } else {
        if config.force_ocr {
            info!("OCR processing requested; rendering pages to images");
        } else {
            info!("No extractable text found; using OCR processing");
        }
        stage(config, ConversionStage::Rendering);
        let start = Instant::now();
        let pages = source
            .render_pages(
                pdf_path,
                RenderOptions {
                    dpi: config.dpi,
                    max_rendered_pixels: config.max_rendered_pixels,
                },
            )
            .await?;
        info!("Rendered {} pages for OCR", pages.len());

        let engine = ocr::select_engine(config.ocr_engine, config.vision.is_some());
        let backend = resolve_ocr_backend(config, engine)?;

        stage(config, ConversionStage::Recognizing);
        let text = ocr::recognize_pages(
            backend.as_ref(),
            &pages,
            config.progress_callback.as_deref(),
        )
        .await?;
        ocr_duration_ms = start.elapsed().as_millis() as u64;
        (text, ExtractionMethod::Ocr { engine })
    };

    // ── Step 3: Optional AI cleanup ──────────────────────────────────────
    let (text, cleanup_duration_ms) = match config.cleanup {
        Some(ref cleanup) => {
            stage(config, ConversionStage::Cleaning);
            let start = Instant::now();
            let cleaned = cleanup.clean(&text).await?;
            (cleaned, start.elapsed().as_millis() as u64)
        }
        None => (text, 0),
    };

    // ── Step 4: Assemble the document ────────────────────────────────────
    stage(config, ConversionStage::Assembling);
    let assemble_start = Instant::now();
    let document = assemble::build_document(&text, config.preserve_formatting)?;
    let assembly_duration_ms = assemble_start.elapsed().as_millis() as u64;

    // ── Step 5: Derive statistics ────────────────────────────────────────
    let mut stats = ConversionStats::from_text(&text);
    stats.extraction_duration_ms = extraction_duration_ms;
    stats.ocr_duration_ms = ocr_duration_ms;
    stats.cleanup_duration_ms = cleanup_duration_ms;
    stats.assembly_duration_ms = assembly_duration_ms;
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Conversion complete: {} chars, {} words, {}ms total",
        stats.char_count, stats.word_count, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_complete();
    }

    Ok(ConversionOutput {
        document,
        text,
        method,
        stats,
    })
}

/// The PDF source, from the injected handle or the built-in pdfium source.
fn resolve_page_source(config: &ConversionConfig) -> Arc<dyn PageSource> {
    match config.page_source {
        Some(ref source) => Arc::clone(source),
        None => Arc::new(PdfiumSource),
    }
}

/// The OCR backend for the engine that was selected to run.
///
/// The orchestrator pre-selects the engine via [`ocr::select_engine`], so a
/// `Cloud` request reaching this point always has a handle; the error arm
/// keeps the contract honest if a caller wires selection differently.
fn resolve_ocr_backend(
    config: &ConversionConfig,
    engine: OcrEngine,
) -> Result<Arc<dyn OcrBackend>, Pdf2DocxError> {
    match engine {
        OcrEngine::Cloud => {
            config
                .vision
                .clone()
                .ok_or_else(|| Pdf2DocxError::OcrUnavailable {
                    engine: "vision".into(),
                    detail: "cloud engine selected but no credential handle present".into(),
                })
        }
        OcrEngine::Local => Ok(match config.local_ocr {
            Some(ref backend) => Arc::clone(backend),
            None => Arc::new(TesseractOcr::new(config.ocr_language.clone())),
        }),
    }
}

fn stage(config: &ConversionConfig, s: ConversionStage) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage(s);
    }
}
