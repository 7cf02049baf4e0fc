//! Progress-callback trait for pipeline milestone events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline passes each fixed milestone, plus per-page events
//! while OCR is running.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a WebSocket, or a database
//! record without the library knowing anything about how the host application
//! communicates.

use std::sync::Arc;

/// A fixed milestone in the conversion pipeline.
///
/// Exactly one of [`Extracting`](ConversionStage::Extracting) and the
/// [`Rendering`](ConversionStage::Rendering)/[`Recognizing`](ConversionStage::Recognizing)
/// pair fires per request, matching the two extraction paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    /// Probing the PDF structure for an extractable text layer.
    Analyzing,
    /// Direct text extraction (path A).
    Extracting,
    /// Rasterising pages to images (path B).
    Rendering,
    /// Running OCR over the rendered pages (path B).
    Recognizing,
    /// AI cleanup pass over the extracted text.
    Cleaning,
    /// Building the output document.
    Assembling,
}

impl ConversionStage {
    /// Rough percentage of the pipeline completed when this stage begins.
    /// Useful for driving a determinate progress bar.
    pub fn percent(&self) -> u8 {
        match self {
            ConversionStage::Analyzing => 10,
            ConversionStage::Rendering => 20,
            ConversionStage::Extracting => 30,
            ConversionStage::Recognizing => 50,
            ConversionStage::Cleaning => 90,
            ConversionStage::Assembling => 95,
        }
    }

    /// Human-readable status line for this stage.
    pub fn message(&self) -> &'static str {
        match self {
            ConversionStage::Analyzing => "Analyzing PDF structure…",
            ConversionStage::Extracting => "Extracting text from PDF…",
            ConversionStage::Rendering => "Converting PDF pages to images…",
            ConversionStage::Recognizing => "Performing OCR on images…",
            ConversionStage::Cleaning => "Enhancing text with AI cleanup…",
            ConversionStage::Assembling => "Building Word document…",
        }
    }
}

/// Called by the conversion pipeline as it passes each milestone.
///
/// Implementations must be `Send + Sync`. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called when the pipeline enters a stage.
    fn on_stage(&self, stage: ConversionStage) {
        let _ = stage;
    }

    /// Called just before OCR starts on a page (1-indexed).
    fn on_page_ocr_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when OCR finishes a page. `text_len` is the byte length of the
    /// recognised text for that page.
    fn on_page_ocr_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called once after the full pipeline, including assembly, succeeded.
    fn on_complete(&self) {}
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        stages: AtomicUsize,
        page_starts: AtomicUsize,
        page_completes: AtomicUsize,
        completes: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_stage(&self, _stage: ConversionStage) {
            self.stages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_ocr_start(&self, _page_num: usize, _total_pages: usize) {
            self.page_starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_ocr_complete(&self, _page_num: usize, _total_pages: usize, _text_len: usize) {
            self.page_completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_complete(&self) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage(ConversionStage::Analyzing);
        cb.on_page_ocr_start(1, 2);
        cb.on_page_ocr_complete(1, 2, 42);
        cb.on_complete();
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            stages: AtomicUsize::new(0),
            page_starts: AtomicUsize::new(0),
            page_completes: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
        };

        tracker.on_stage(ConversionStage::Analyzing);
        tracker.on_stage(ConversionStage::Rendering);
        tracker.on_page_ocr_start(1, 2);
        tracker.on_page_ocr_complete(1, 2, 100);
        tracker.on_page_ocr_start(2, 2);
        tracker.on_page_ocr_complete(2, 2, 80);
        tracker.on_complete();

        assert_eq!(tracker.stages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.page_starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.page_completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stage_percent_is_monotonic_along_each_path() {
        // Path A: analyze → extract → clean → assemble
        assert!(ConversionStage::Analyzing.percent() < ConversionStage::Extracting.percent());
        assert!(ConversionStage::Extracting.percent() < ConversionStage::Cleaning.percent());
        assert!(ConversionStage::Cleaning.percent() < ConversionStage::Assembling.percent());
        // Path B: analyze → render → recognize → clean → assemble
        assert!(ConversionStage::Analyzing.percent() < ConversionStage::Rendering.percent());
        assert!(ConversionStage::Rendering.percent() < ConversionStage::Recognizing.percent());
        assert!(ConversionStage::Recognizing.percent() < ConversionStage::Cleaning.percent());
    }
}
