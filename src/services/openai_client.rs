use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    config::PlannerConfig,
    error::{PlannerError, Result},
};

const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Thin client for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_retries: usize,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl OpenAIClient {
    pub fn new(config: &PlannerConfig) -> Result<Self> {
        // No client timeout: the flow runner owns the call deadline.
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| PlannerError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            max_retries: config.max_retries,
        })
    }

    /// POST one completion. 429 and 5xx answers are retried with exponential
    /// backoff up to `max_retries` times; a 429 `Retry-After` header wins over
    /// the computed delay.
    pub async fn chat_completion(&self, body: &Value) -> Result<Value> {
        let request_url = build_chat_url(&self.base_url);
        let mut attempt = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let response = self
                .http
                .post(&request_url)
                .bearer_auth(&self.api_key)
                .header("X-Title", "wanderplan")
                .json(body)
                .send()
                .await?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response.text().await?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.trim().parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < self.max_retries {
                    warn!(
                        target: "wanderplan::model",
                        attempt = attempt + 1,
                        delay_ms = retry_after.as_millis() as u64,
                        "rate limited by model endpoint, retrying"
                    );
                    tokio::time::sleep(retry_after).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(PlannerError::RateLimit {
                    retry_after: retry_after.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < self.max_retries {
                warn!(
                    target: "wanderplan::model",
                    attempt = attempt + 1,
                    status = status.as_u16(),
                    "model endpoint failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            let response_json: Value = match serde_json::from_str(&response_text) {
                Ok(value) => value,
                Err(err) if status.is_success() => {
                    return Err(PlannerError::Model(format!(
                        "Failed to parse completion response: {err}"
                    )))
                }
                Err(_) => {
                    return Err(PlannerError::Model(format!(
                        "HTTP {status} error: {}",
                        truncate(&response_text, 200)
                    )))
                }
            };

            if let Some(error) = response_json.get("error").filter(|e| !e.is_null()) {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                return Err(PlannerError::Model(if status.is_success() {
                    format!("API error: {message}")
                } else {
                    format!("HTTP {status} error: {message}")
                }));
            }

            if !status.is_success() {
                return Err(PlannerError::Model(format!(
                    "HTTP {status} error: {}",
                    truncate(&response_text, 200)
                )));
            }

            debug!(target: "wanderplan::model", status = status.as_u16(), "completion received");
            return Ok(response_json);
        }
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            max_tokens: None,
            temperature: None,
            response_format: None,
        }
    }

    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.messages
            .push(json!({ "role": "system", "content": content.into() }));
        self
    }

    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.messages
            .push(json!({ "role": "user", "content": content.into() }));
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}

/// Token usage information from the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

pub fn token_usage(response: &Value) -> Option<TokenUsage> {
    let usage = response.get("usage")?;
    Some(TokenUsage {
        prompt_tokens: usage.get("prompt_tokens")?.as_u64()? as u32,
        completion_tokens: usage.get("completion_tokens")?.as_u64()? as u32,
        total_tokens: usage.get("total_tokens")?.as_u64()? as u32,
    })
}

/// Text of the first choice's assistant message.
pub fn first_message_content(response: &Value) -> Result<&str> {
    let message = response
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            PlannerError::Model("Missing 'choices' array in completion response".to_string())
        })?
        .first()
        .ok_or_else(|| PlannerError::Model("Completion response contained no choices".to_string()))?
        .get("message")
        .ok_or_else(|| {
            PlannerError::Model("Completion response missing assistant message".to_string())
        })?;

    if let Some(refusal) = message.get("refusal").and_then(Value::as_str) {
        return Err(PlannerError::Model(format!("Model refused the request: {refusal}")));
    }

    message
        .get("content")
        .and_then(Value::as_str)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| PlannerError::Model("Assistant message has no content".to_string()))
}
