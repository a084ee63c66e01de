//! OpenAI-compatible chat completions client

use serde::{Deserialize, Serialize};
use std::future::Future;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling parameters for one completion
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 4000,
        }
    }
}

/// Text returned by the model and the tokens it cost
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub tokens_used: u64,
}

/// Anything that can turn a system prompt and a user prompt into text
pub trait CompletionProvider: Send + Sync {
    fn complete(
        &self,
        system: &str,
        prompt: &str,
        config: &CompletionConfig,
    ) -> impl Future<Output = Result<Completion, String>> + Send;
}

/// Client for the chat completions endpoint
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

/// Error detail from the API
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at another OpenAI-compatible server
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn send(
        &self,
        system: &str,
        prompt: &str,
        config: &CompletionConfig,
    ) -> Result<Completion, String> {
        let request = ApiRequest {
            model: &config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if let Ok(api_err) = serde_json::from_str::<ApiError>(&body) {
                return Err(format!("OpenAI API error ({}): {}", status, api_err.error.message));
            }
            return Err(format!("OpenAI API error ({}): {}", status, body));
        }

        let parsed = response
            .json::<ApiResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| "No text content in response".to_string())?;

        Ok(Completion {
            text,
            tokens_used: parsed.usage.map_or(0, |u| u.total_tokens),
        })
    }
}

impl CompletionProvider for LlmClient {
    fn complete(
        &self,
        system: &str,
        prompt: &str,
        config: &CompletionConfig,
    ) -> impl Future<Output = Result<Completion, String>> + Send {
        self.send(system, prompt, config)
    }
}
