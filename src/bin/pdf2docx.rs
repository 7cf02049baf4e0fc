//! CLI binary for pdf2docx.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, constructs the optional capability handles (cloud
//! OCR, AI cleanup) from the supplied credentials, and prints results.
//! All decisions live in the library; this file is pure I/O.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2docx::{
    convert_to_file, download_file_name, ConversionConfig, ConversionProgressCallback,
    ConversionStage, ExtractionMethod, GeminiCleanup, OcrEngine, ProgressCallback,
    VisionCredential, VisionOcr,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a single determinate bar that jumps between
/// the pipeline's fixed milestones, with per-page log lines during OCR.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} [{bar:42.green/238}] {pos:>3}%  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_stage(&self, stage: ConversionStage) {
        self.bar.set_position(stage.percent() as u64);
        self.bar.set_message(stage.message());
    }

    fn on_page_ocr_start(&self, page_num: usize, total_pages: usize) {
        self.bar
            .set_message(format!("OCR page {page_num}/{total_pages}"));
    }

    fn on_page_ocr_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total_pages,
            dim(&format!("{text_len:>5} chars")),
        ));
    }

    fn on_complete(&self) {
        self.bar.set_position(100);
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes report_converted.docx)
  pdf2docx report.pdf

  # Scanned/handwritten document, force the OCR path
  pdf2docx --force-ocr scan.pdf

  # Cloud OCR with a Google service-account credential
  pdf2docx --ocr-engine cloud --vision-credentials svc-account.json scan.pdf

  # OCR plus AI grammar/spelling cleanup
  pdf2docx --force-ocr --ai-cleanup --ai-api-key $GEMINI_API_KEY letter.pdf

  # Collapse formatting into plain paragraphs
  pdf2docx --plain legacy.pdf -o clean.docx

  # Machine-readable result summary
  pdf2docx --json report.pdf > result.json

OCR ENGINES:
  local   Tesseract, in-process, free, offline. (default)
  cloud   Google Vision document text detection — much better on
          handwriting; needs --vision-credentials. If the credential is
          missing the pipeline falls back to the local engine and the
          summary reports which engine actually ran.

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY                 AI cleanup API key
  PDF2DOCX_VISION_CREDENTIALS    Path to a service-account JSON file
  PDF2DOCX_OCR_LANGUAGE          Tesseract language string (default: eng)
  PDFIUM_LIB_PATH                Path to an existing libpdfium
"#;

/// Convert PDF documents to editable Word documents.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2docx",
    version,
    about = "Convert PDF documents to editable Word documents with OCR and AI cleanup",
    long_about = "Convert PDF documents to editable Word (.docx) documents. Typed PDFs use \
direct text extraction; scanned or handwritten PDFs are rasterised and recognised with \
Tesseract or Google Vision, optionally followed by an AI grammar/spelling cleanup pass.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: String,

    /// Write the document to this file. Default: {input}_converted.docx.
    #[arg(short, long, env = "PDF2DOCX_OUTPUT")]
    output: Option<PathBuf>,

    /// Force OCR processing even when the PDF has an extractable text layer.
    /// Use for handwritten or image-based PDFs.
    #[arg(long, env = "PDF2DOCX_FORCE_OCR")]
    force_ocr: bool,

    /// Collapse structural formatting into plain paragraphs instead of
    /// preserving the source line structure.
    #[arg(long, env = "PDF2DOCX_PLAIN")]
    plain: bool,

    /// OCR engine for image-based pages.
    #[arg(long, env = "PDF2DOCX_OCR_ENGINE", value_enum, default_value = "local")]
    ocr_engine: OcrEngineArg,

    /// Path to a Google service-account JSON file (enables cloud OCR).
    #[arg(long, env = "PDF2DOCX_VISION_CREDENTIALS")]
    vision_credentials: Option<PathBuf>,

    /// Run an AI grammar/spelling cleanup pass over the extracted text.
    #[arg(long, env = "PDF2DOCX_AI_CLEANUP")]
    ai_cleanup: bool,

    /// API key for the AI cleanup service.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    ai_api_key: Option<String>,

    /// AI cleanup model ID.
    #[arg(long, env = "PDF2DOCX_AI_MODEL")]
    ai_model: Option<String>,

    /// Tesseract language string, e.g. eng or eng+fra.
    #[arg(long, env = "PDF2DOCX_OCR_LANGUAGE", default_value = "eng")]
    ocr_language: String,

    /// Rendering DPI for the OCR path (72–400).
    #[arg(long, env = "PDF2DOCX_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Per-network-call timeout in seconds (Vision, cleanup).
    #[arg(long, env = "PDF2DOCX_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Output a structured JSON result summary instead of the text report.
    #[arg(long, env = "PDF2DOCX_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2DOCX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2DOCX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2DOCX_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OcrEngineArg {
    Local,
    Cloud,
}

impl From<OcrEngineArg> for OcrEngine {
    fn from(v: OcrEngineArg) -> Self {
        match v {
            OcrEngineArg::Local => OcrEngine::Local,
            OcrEngineArg::Cloud => OcrEngine::Cloud,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(download_file_name(&cli.input)));

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert_to_file(&cli.input, &output_path, &config)
        .await
        .context("Conversion failed")?;

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        let mut value = serde_json::to_value(&output).context("Failed to serialise output")?;
        if let Some(map) = value.as_object_mut() {
            map.insert(
                "output_path".to_string(),
                serde_json::Value::String(output_path.display().to_string()),
            );
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("Failed to serialise output")?
        );
        return Ok(());
    }

    if !cli.quiet {
        eprintln!("{} {}", green("✔"), bold("Conversion completed successfully!"));

        let method = match output.method {
            ExtractionMethod::DirectText => "direct text extraction".to_string(),
            ExtractionMethod::Ocr { engine } => format!("OCR ({engine})"),
        };
        eprintln!("   {} {}", dim("Extraction:"), method);
        if matches!(output.method, ExtractionMethod::Ocr { engine: OcrEngine::Local })
            && matches!(cli.ocr_engine, OcrEngineArg::Cloud)
        {
            eprintln!(
                "   {} cloud OCR was requested but no credential was supplied; the local engine ran instead",
                cyan("⚠"),
            );
        }

        eprintln!();
        eprintln!("{}", bold("Preview"));
        eprintln!("{}", output.preview());
        eprintln!();
        eprintln!(
            "{}  Characters {}  ·  Words {}  ·  Lines {}",
            bold("Statistics"),
            output.stats.char_count,
            output.stats.word_count,
            output.stats.line_count,
        );
        eprintln!(
            "   {}",
            dim(&format!("{}ms total", output.stats.total_duration_ms))
        );
        eprintln!("{} {}", green("→"), bold(&output_path.display().to_string()));
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`, constructing the optional capability
/// handles here so the orchestrator receives them ready-made.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .force_ocr(cli.force_ocr)
        .preserve_formatting(!cli.plain)
        .ocr_engine(cli.ocr_engine.into())
        .ocr_language(cli.ocr_language.clone())
        .dpi(cli.dpi)
        .api_timeout_secs(cli.api_timeout);

    // Cloud OCR: only constructed when the engine is selected AND a
    // credential file was supplied, mirroring the absent-handle fallback.
    if matches!(cli.ocr_engine, OcrEngineArg::Cloud) {
        if let Some(ref path) = cli.vision_credentials {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read credentials from {path:?}"))?;
            let credential =
                VisionCredential::from_json(&json).context("Invalid Vision credential")?;
            let backend = VisionOcr::new(credential, cli.api_timeout)
                .context("Failed to construct Vision OCR backend")?;
            builder = builder.vision(Arc::new(backend));
        }
    }

    // AI cleanup: constructed only when requested with a key present.
    if cli.ai_cleanup {
        match cli.ai_api_key {
            Some(ref key) if !key.trim().is_empty() => {
                let mut engine = GeminiCleanup::new(key.clone(), cli.api_timeout)
                    .context("Failed to construct AI cleanup engine")?;
                if let Some(ref model) = cli.ai_model {
                    engine = engine.with_model(model.clone());
                }
                builder = builder.cleanup(Arc::new(engine));
            }
            _ => {
                if !cli.quiet {
                    eprintln!(
                        "{} --ai-cleanup requested without an API key; skipping the cleanup pass",
                        red("✗"),
                    );
                }
            }
        }
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
