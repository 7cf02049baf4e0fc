//! AI text cleanup: grammar/spelling correction of extracted text.
//!
//! The cleanup pass replaces the extracted content wholesale — it is the
//! only stage that rewrites text rather than producing it. A failed call
//! must surface as an error; silently returning the unmodified input would
//! hide a billing or credential problem from the user.

use crate::error::Pdf2DocxError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Instruction prefix sent ahead of the extracted text.
///
/// Centralised as a constant so unit tests can inspect it and behaviour
/// changes require editing exactly one place.
pub const CLEANUP_PROMPT: &str = "Clean up the following OCR output for spelling, grammar, and \
formatting. Keep the meaning unchanged:";

const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Async trait implemented by text cleanup engines.
#[async_trait]
pub trait CleanupEngine: Send + Sync {
    /// Return a corrected version of `text`.
    ///
    /// Fails with [`Pdf2DocxError::AiService`] on an invalid credential or
    /// service failure. Implementations must not swallow failures.
    async fn clean(&self, text: &str) -> Result<String, Pdf2DocxError>;
}

/// Gemini-backed [`CleanupEngine`].
pub struct GeminiCleanup {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiCleanup {
    /// Create an engine with the given API key.
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> Result<Self, Pdf2DocxError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Pdf2DocxError::InvalidCredential(
                "AI cleanup API key must not be empty".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Pdf2DocxError::AiService {
                detail: format!("HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Use a specific model instead of the default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}

#[async_trait]
impl CleanupEngine for GeminiCleanup {
    async fn clean(&self, text: &str) -> Result<String, Pdf2DocxError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );

        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": format!("{CLEANUP_PROMPT}\n\n{text}") }]
            }]
        });

        debug!(model = %self.model, chars = text.chars().count(), "AI cleanup request");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Pdf2DocxError::AiService {
                detail: format!("request failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Pdf2DocxError::AiService {
                detail: format!("HTTP {status}: {body}"),
            });
        }

        let generated: GenerateResponse =
            resp.json().await.map_err(|e| Pdf2DocxError::AiService {
                detail: format!("response parse: {e}"),
            })?;

        let cleaned = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Pdf2DocxError::AiService {
                detail: "response contained no candidates".into(),
            })?;

        Ok(cleaned.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        let result = GeminiCleanup::new("  ", 60);
        assert!(matches!(result, Err(Pdf2DocxError::InvalidCredential(_))));
    }

    #[test]
    fn default_model_is_flash() {
        let engine = GeminiCleanup::new("key", 60).unwrap();
        assert_eq!(engine.model, "gemini-1.5-flash");
        let engine = engine.with_model("gemini-1.5-pro");
        assert_eq!(engine.model, "gemini-1.5-pro");
    }

    #[test]
    fn prompt_asks_for_meaning_preservation() {
        assert!(CLEANUP_PROMPT.contains("Keep the meaning unchanged"));
    }

    #[test]
    fn response_parses_candidate_text() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "  Corrected text.\n" }], "role": "model" }
            }]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap();
        assert_eq!(text.trim(), "Corrected text.");
    }
}
