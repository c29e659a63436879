use crate::errors::AppError;
use serde::{Deserialize, Serialize};

/// Sampling temperature used for every analysis.
pub const TEMPERATURE: f64 = 0.7;
/// Upper bound on generated tokens per analysis.
pub const MAX_TOKENS: u32 = 2000;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single role-tagged conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completion API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    /// Creates a new `CompletionClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`.
    /// * `api_key` - Bearer credential.
    /// * `model` - Model identifier sent with every request.
    ///
    /// No request timeout is configured; a call lasts as long as generation does.
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create completion client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one chat completion request and returns the first choice's text.
    ///
    /// Transport failures, non-success statuses and replies without content
    /// all surface as `AppError::UpstreamError`. Nothing is retried.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::info!(
            "Requesting completion from {} (model {}, {} messages)",
            url,
            self.model,
            messages.len()
        );

        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::UpstreamError(format!(
                "Completion API returned {}: {}",
                status, error_text
            )));
        }

        let data: CompletionResponse = response.json().await.map_err(|e| {
            AppError::UpstreamError(format!("Failed to parse completion response: {}", e))
        })?;

        let choice = data.choices.into_iter().next().ok_or_else(|| {
            AppError::UpstreamError("Completion response contained no choices".to_string())
        })?;

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!("Completion stopped at the {} token limit", MAX_TOKENS);
        }

        let content = choice.message.content.ok_or_else(|| {
            AppError::UpstreamError("Completion response contained no content".to_string())
        })?;

        tracing::info!("✓ Completion received ({} chars)", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_strips_trailing_slash() {
        let client = CompletionClient::new(
            "https://api.example.com/v1/".to_string(),
            "key".to_string(),
            "gpt-4".to_string(),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
        assert_eq!(client.model(), "gpt-4");
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = CompletionRequest {
            model: "gpt-4",
            messages: &messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-4",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ],
                "temperature": 0.7,
                "max_tokens": 2000
            })
        );
    }
}
