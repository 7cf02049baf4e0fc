//! Cloud OCR backend: Google Vision document text detection.
//!
//! One `images:annotate` call per page with `DOCUMENT_TEXT_DETECTION`, which
//! is tuned for dense text and handwriting. The bearer token comes from the
//! injected [`VisionCredential`]; no ambient process state is consulted.

use crate::credentials::VisionCredential;
use crate::error::Pdf2DocxError;
use crate::pipeline::ocr::OcrBackend;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const ANNOTATE_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Google-Vision-backed [`OcrBackend`].
pub struct VisionOcr {
    client: reqwest::Client,
    credential: VisionCredential,
}

impl VisionOcr {
    /// Create a backend from an already-resolved credential.
    pub fn new(credential: VisionCredential, timeout_secs: u64) -> Result<Self, Pdf2DocxError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Pdf2DocxError::OcrUnavailable {
                engine: "vision".into(),
                detail: format!("HTTP client: {e}"),
            })?;
        Ok(Self { client, credential })
    }
}

#[derive(Deserialize)]
struct AnnotateResponse {
    responses: Vec<ImageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    text: String,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[async_trait]
impl OcrBackend for VisionOcr {
    fn name(&self) -> &str {
        "vision"
    }

    async fn recognize(&self, page_num: usize, png: &[u8]) -> Result<String, Pdf2DocxError> {
        let token = self.credential.access_token(&self.client).await?;

        let body = serde_json::json!({
            "requests": [{
                "image": { "content": STANDARD.encode(png) },
                "features": [{ "type": "DOCUMENT_TEXT_DETECTION" }],
            }]
        });

        let resp = self
            .client
            .post(ANNOTATE_URL)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Pdf2DocxError::OcrFailed {
                page: page_num,
                detail: format!("Vision request failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Pdf2DocxError::OcrFailed {
                page: page_num,
                detail: format!("Vision returned {status}: {body}"),
            });
        }

        let annotate: AnnotateResponse =
            resp.json().await.map_err(|e| Pdf2DocxError::OcrFailed {
                page: page_num,
                detail: format!("Vision response parse: {e}"),
            })?;

        let image_response =
            annotate
                .responses
                .into_iter()
                .next()
                .ok_or_else(|| Pdf2DocxError::OcrFailed {
                    page: page_num,
                    detail: "Vision returned no responses".into(),
                })?;

        if let Some(err) = image_response.error {
            return Err(Pdf2DocxError::OcrFailed {
                page: page_num,
                detail: format!("Vision error: {}", err.message),
            });
        }

        // A page with no recognisable text yields no annotation at all.
        let text = image_response
            .full_text_annotation
            .map(|a| a.text)
            .unwrap_or_default();

        debug!("Vision page {}: {} chars", page_num, text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_text_annotation() {
        let json = r#"{
            "responses": [{
                "fullTextAnnotation": { "text": "Dear patient,\nyour results" }
            }]
        }"#;
        let parsed: AnnotateResponse = serde_json::from_str(json).unwrap();
        let text = parsed.responses[0]
            .full_text_annotation
            .as_ref()
            .map(|a| a.text.as_str());
        assert_eq!(text, Some("Dear patient,\nyour results"));
    }

    #[test]
    fn response_parses_api_error() {
        let json = r#"{
            "responses": [{
                "error": { "message": "invalid image payload", "code": 3 }
            }]
        }"#;
        let parsed: AnnotateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.responses[0].error.as_ref().map(|e| e.message.as_str()),
            Some("invalid image payload")
        );
    }

    #[test]
    fn response_tolerates_empty_page() {
        let json = r#"{ "responses": [{}] }"#;
        let parsed: AnnotateResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.responses[0].full_text_annotation.is_none());
        assert!(parsed.responses[0].error.is_none());
    }
}
