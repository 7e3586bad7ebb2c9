use std::time::Duration;

use axum::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("provider responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("provider returned no text")]
    EmptyResponse,
}

/// External text-generation service.
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn list_models(&self) -> Result<Vec<String>, ProviderError>;

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Google Gemini over its REST API.
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn model_path(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status { status, body })
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1beta/models", self.base_url))
            .query(&[("pageSize", "1000")])
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let models = ensure_success(response).await?.json::<ListModelsResponse>().await?;

        Ok(models.models.into_iter().map(|m| m.name).collect())
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1beta/{}:generateContent", self.base_url, Self::model_path(model)))
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await?;

        let generated = ensure_success(response)
            .await?
            .json::<GenerateContentResponse>()
            .await?;

        let text = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .filter(|text| !text.is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new("test-key", server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_model_path() {
        assert_eq!(GeminiProvider::model_path("gemini-pro"), "models/gemini-pro");
        assert_eq!(GeminiProvider::model_path("models/gemini-pro"), "models/gemini-pro");
    }

    #[tokio::test]
    async fn test_list_models() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v1beta/models"))
            .and(matchers::header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [
                    { "name": "models/gemini-pro", "displayName": "Gemini Pro" },
                    { "name": "models/gemini-1.5-pro" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let models = provider(&server).list_models().await.unwrap();
        assert_eq!(models, vec!["models/gemini-pro", "models/gemini-1.5-pro"]);
    }

    #[tokio::test]
    async fn test_list_models_error_status() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v1beta/models"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let error = provider(&server).list_models().await.unwrap_err();
        assert!(matches!(error, ProviderError::Status { status, .. } if status == StatusCode::FORBIDDEN));
        assert!(error.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_generate() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/v1beta/models/gemini-pro:generateContent"))
            .and(matchers::header("x-goog-api-key", "test-key"))
            .and(matchers::body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "Title: t\nContent: c\nSummarize briefly." }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "A short " }, { "text": "summary." }], "role": "model" }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider(&server)
            .generate("gemini-pro", "Title: t\nContent: c\nSummarize briefly.")
            .await
            .unwrap();
        assert_eq!(text, "A short summary.");
    }

    #[tokio::test]
    async fn test_generate_without_candidates() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let error = provider(&server).generate("gemini-pro", "prompt").await.unwrap_err();
        assert!(matches!(error, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_generate_server_error() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Generation error"))
            .mount(&server)
            .await;

        let error = provider(&server).generate("models/gemini-pro", "prompt").await.unwrap_err();
        assert!(error.to_string().contains("Generation error"));
    }
}
