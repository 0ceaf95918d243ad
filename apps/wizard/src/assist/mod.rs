//! Assistant client — the single point of entry for all assistant-service
//! calls.
//!
//! No other module may talk to the assistant directly. The five operations
//! here are fallible; the session layer is where each failure degrades to
//! its documented fallback. No retries and no request de-duplication live
//! here — one call, one attempt, the HTTP timeout is the only time bound.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::Resume;
use crate::templates::Language;

/// Upload types accepted before any network call: PDF, legacy Word, and
/// Office Open XML Word. Anything else is a local validation error.
pub const ALLOWED_UPLOAD_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Client-side MIME allow-list check for `parse_document` uploads.
pub fn validate_upload_mime(mime: &str) -> Result<(), AppError> {
    if ALLOWED_UPLOAD_TYPES.contains(&mime) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Unsupported file type '{mime}'. Upload a PDF or Word document."
        )))
    }
}

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The assistant operations consumed by the session layer.
///
/// Held as `Arc<dyn AssistGateway>` so tests can swap in failing or
/// scripted implementations without a network.
#[async_trait]
pub trait AssistGateway: Send + Sync {
    /// Extracts a document from an uploaded file. `None` signals that the
    /// assistant could not read the file; callers must not adopt it.
    async fn parse_document(
        &self,
        file: Bytes,
        mime_type: &str,
    ) -> Result<Option<Resume>, AssistError>;

    /// Rewrites the whole document for the given persona.
    async fn optimize(
        &self,
        doc: &Resume,
        persona_id: &str,
        lang: Language,
    ) -> Result<Resume, AssistError>;

    /// Turns free text into polished bullet points for a role.
    async fn refine_bullets(
        &self,
        role: &str,
        text: &str,
        lang: Language,
    ) -> Result<Vec<String>, AssistError>;

    /// Conversational cover-letter rewrite.
    async fn chat_cover_letter(
        &self,
        doc: &Resume,
        instruction: &str,
        current_text: &str,
        lang: Language,
    ) -> Result<String, AssistError>;

    /// Generates a professional summary from a job title and skills.
    async fn summarize(
        &self,
        job_title: &str,
        skills: &[String],
        lang: Language,
    ) -> Result<String, AssistError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseRequest<'a> {
    /// Base64-encoded file body.
    data: String,
    mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParseResponse {
    document: Option<Resume>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeRequest<'a> {
    document: &'a Resume,
    persona_id: &'a str,
    lang: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeResponse {
    document: Resume,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefineBulletsRequest<'a> {
    role: &'a str,
    text: &'a str,
    lang: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefineBulletsResponse {
    bullets: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CoverLetterRequest<'a> {
    document: &'a Resume,
    instruction: &'a str,
    current_text: &'a str,
    lang: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoverLetterResponse {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeRequest<'a> {
    job_title: &'a str,
    skills: &'a [String],
    lang: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeResponse {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

/// HTTP client for the assistant service.
#[derive(Clone)]
pub struct HttpAssistGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpAssistGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.assist_timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: config.assist_base_url.trim_end_matches('/').to_string(),
            api_key: config.assist_api_key.clone(),
        }
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, AssistError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AssistError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Assist call to {path} succeeded");
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AssistGateway for HttpAssistGateway {
    async fn parse_document(
        &self,
        file: Bytes,
        mime_type: &str,
    ) -> Result<Option<Resume>, AssistError> {
        let request = ParseRequest {
            data: BASE64.encode(&file),
            mime_type,
        };
        let response: ParseResponse = self.post_json("/v1/assist/parse", &request).await?;
        Ok(response.document)
    }

    async fn optimize(
        &self,
        doc: &Resume,
        persona_id: &str,
        lang: Language,
    ) -> Result<Resume, AssistError> {
        let request = OptimizeRequest {
            document: doc,
            persona_id,
            lang: lang.code(),
        };
        let response: OptimizeResponse = self.post_json("/v1/assist/optimize", &request).await?;
        Ok(response.document)
    }

    async fn refine_bullets(
        &self,
        role: &str,
        text: &str,
        lang: Language,
    ) -> Result<Vec<String>, AssistError> {
        let request = RefineBulletsRequest {
            role,
            text,
            lang: lang.code(),
        };
        let response: RefineBulletsResponse =
            self.post_json("/v1/assist/refine-bullets", &request).await?;
        Ok(response.bullets)
    }

    async fn chat_cover_letter(
        &self,
        doc: &Resume,
        instruction: &str,
        current_text: &str,
        lang: Language,
    ) -> Result<String, AssistError> {
        let request = CoverLetterRequest {
            document: doc,
            instruction,
            current_text,
            lang: lang.code(),
        };
        let response: CoverLetterResponse =
            self.post_json("/v1/assist/cover-letter", &request).await?;
        Ok(response.content)
    }

    async fn summarize(
        &self,
        job_title: &str,
        skills: &[String],
        lang: Language,
    ) -> Result<String, AssistError> {
        let request = SummarizeRequest {
            job_title,
            skills,
            lang: lang.code(),
        };
        let response: SummarizeResponse = self.post_json("/v1/assist/summarize", &request).await?;
        Ok(response.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_allow_list_accepts_word_and_pdf() {
        assert!(validate_upload_mime("application/pdf").is_ok());
        assert!(validate_upload_mime("application/msword").is_ok());
        assert!(validate_upload_mime(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        )
        .is_ok());
    }

    #[test]
    fn test_mime_allow_list_rejects_everything_else() {
        for mime in ["image/png", "text/plain", "application/zip", ""] {
            let err = validate_upload_mime(mime).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{mime}");
        }
    }

    #[test]
    fn test_parse_request_encodes_base64_camel_case() {
        let request = ParseRequest {
            data: BASE64.encode(b"hello"),
            mime_type: "application/pdf",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["data"], "aGVsbG8=");
        assert_eq!(json["mimeType"], "application/pdf");
    }

    #[test]
    fn test_parse_response_null_document_is_extraction_failure_signal() {
        let response: ParseResponse = serde_json::from_str(r#"{"document": null}"#).unwrap();
        assert!(response.document.is_none());
    }

    #[test]
    fn test_optimize_request_wire_shape_matches_document_model() {
        let doc = Resume::sample();
        let request = OptimizeRequest {
            document: &doc,
            persona_id: "persona-7",
            lang: Language::Ar.code(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["personaId"], "persona-7");
        assert_eq!(json["lang"], "ar");
        assert!(json["document"]["personalInfo"].is_object());
        assert!(json["document"]["experience"].is_array());
    }

    #[test]
    fn test_refine_and_summarize_responses_parse() {
        let refine: RefineBulletsResponse =
            serde_json::from_str(r#"{"bullets": ["Led a team of 4", "Shipped v2"]}"#).unwrap();
        assert_eq!(refine.bullets.len(), 2);

        let summary: SummarizeResponse =
            serde_json::from_str(r#"{"summary": "Seasoned manager."}"#).unwrap();
        assert_eq!(summary.summary, "Seasoned manager.");
    }

    #[test]
    fn test_api_error_body_parses_message() {
        let err: ApiError =
            serde_json::from_str(r#"{"error": {"message": "model overloaded"}}"#).unwrap();
        assert_eq!(err.error.message, "model overloaded");
    }
}
