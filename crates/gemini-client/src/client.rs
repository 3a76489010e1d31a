use std::time::Duration;

use crate::types::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse, GenerateOptions};
use crate::{GeminiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ─── GeminiClient ─────────────────────────────────────────────────────────

/// Thin async client for the `generateContent` endpoint.
///
/// A client without an API key can be constructed; every call then fails with
/// [`GeminiError::MissingApiKey`], matching how the web app only discovers a
/// missing key when the user presses a button.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Markdown / plain text generation.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, GenerateOptions::default()).await
    }

    /// Generation constrained to a JSON response body.
    pub async fn generate_json(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, GenerateOptions { json: true }).await
    }

    /// Send `prompt` as a single user turn and return the first candidate's
    /// text.
    pub async fn generate(&self, prompt: &str, opts: GenerateOptions) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateContentRequest::user(prompt, &opts);

        tracing::debug!(model = %self.model, json = opts.json, "gemini generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| body.clone());
            tracing::warn!(status = status.as_u16(), "gemini request failed: {message}");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|source| GeminiError::Parse {
                body: body.clone(),
                source,
            })?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn reply(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = GeminiClient::new(None).with_base_url("http://127.0.0.1:9");
        let err = client.generate_text("hello").await.unwrap_err();
        assert!(matches!(err, GeminiError::MissingApiKey));
    }

    #[tokio::test]
    async fn generate_text_returns_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "analyze this" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply("## Market Viability\nHigh"))
            .create_async()
            .await;

        let client = GeminiClient::new(Some("test-key".into())).with_base_url(server.url());
        let text = client.generate_text("analyze this").await.unwrap();
        assert_eq!(text, "## Market Viability\nHigh");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_json_requests_json_mime_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .with_status(200)
            .with_body(reply(r#"{"title":"A"}"#))
            .create_async()
            .await;

        let client = GeminiClient::new(Some("k".into())).with_base_url(server.url());
        let text = client.generate_json("listing").await.unwrap();
        assert_eq!(text, r#"{"title":"A"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_error_surfaces_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(Some("bad".into())).with_base_url(server.url());
        let err = client.generate_text("x").await.unwrap_err();
        match err {
            GeminiError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(Some("k".into())).with_base_url(server.url());
        let err = client.generate_text("x").await.unwrap_err();
        assert!(matches!(err, GeminiError::EmptyResponse));
    }

    #[tokio::test]
    async fn custom_model_changes_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-pro:generateContent")
            .with_status(200)
            .with_body(reply("ok"))
            .create_async()
            .await;

        let client = GeminiClient::new(Some("k".into()))
            .with_model("gemini-2.5-pro")
            .with_base_url(format!("{}/", server.url()));
        assert_eq!(client.generate_text("x").await.unwrap(), "ok");
        mock.assert_async().await;
    }
}
