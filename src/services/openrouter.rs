use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::CompletionProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f64 = 0.7;

/// OpenRouter chat-completions client (OpenAI-compatible wire format).
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    api_key: Option<String>,
    url: String,
    model: String,
    referer: String,
    title: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenRouterClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            api_key: config.openrouter_api_key.clone(),
            url: config.openrouter_url.clone(),
            model: config.openrouter_model.clone(),
            referer: config.app_referer.clone(),
            title: config.app_title.clone(),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(&self, prompt: &str, system_instruction: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("OPENROUTER_API_KEY is not set".to_string()))?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            stream: false,
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Calling OpenRouter");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::UpstreamTransport(format!("Failed to call OpenRouter: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamTransport(format!(
                "OpenRouter returned status: {} - {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let data: ChatResponse = response.json().await.map_err(|e| {
            AppError::UpstreamFormat(format!("Failed to parse OpenRouter response: {}", e))
        })?;

        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::UpstreamFormat("OpenRouter response has no message content".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{closed_upstream, spawn_upstream};
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    fn client_for(base_url: &str, api_key: Option<&str>) -> OpenRouterClient {
        let config = Config {
            openrouter_api_key: api_key.map(str::to_string),
            openrouter_url: format!("{}/api/v1/chat/completions", base_url),
            ..Config::default()
        };
        OpenRouterClient::new(&config).unwrap()
    }

    fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
        headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or("")
    }

    async fn fake_completions(
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if header(&headers, "authorization") != "Bearer test-key" {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
        }
        assert_eq!(header(&headers, "http-referer"), "http://localhost:5000");
        assert_eq!(header(&headers, "x-title"), "AI Song Recommender");

        assert_eq!(body["model"], "bytedance-seed/seed-1.6-flash");
        assert_eq!(body["temperature"], json!(0.7));
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");

        let echoed = format!(
            "{} | {}",
            body["messages"][0]["content"].as_str().unwrap_or_default(),
            body["messages"][1]["content"].as_str().unwrap_or_default()
        );
        (
            StatusCode::OK,
            Json(json!({"choices": [{"message": {"role": "assistant", "content": echoed}}]})),
        )
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = client_for("http://127.0.0.1:9", None);
        assert!(!client.is_configured());

        let err = client.complete("prompt", "system").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_complete_returns_message_content() {
        let app = Router::new().route("/api/v1/chat/completions", post(fake_completions));
        let base = spawn_upstream(app).await;
        let client = client_for(&base, Some("test-key"));

        let text = client.complete("recommend songs", "only json").await.unwrap();
        assert_eq!(text, "only json | recommend songs");
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let app = Router::new().route("/api/v1/chat/completions", post(fake_completions));
        let base = spawn_upstream(app).await;
        let client = client_for(&base, Some("wrong-key"));

        let err = client.complete("prompt", "system").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamTransport(ref msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_empty_choices_is_format_error() {
        let app = Router::new().route(
            "/api/v1/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let base = spawn_upstream(app).await;
        let client = client_for(&base, Some("test-key"));

        let err = client.complete("prompt", "system").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamFormat(_)));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        let client = client_for(&closed_upstream().await, Some("test-key"));

        let err = client.complete("prompt", "system").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamTransport(_)));
    }
}
