//! Chat client for the direct LLM parser backend
//!
//! Every call has the same shape: one system message, one user message,
//! JSON mode on. Azure deployments take the key in an `api-key` header;
//! any other OpenAI-compatible endpoint takes a bearer token.

use crate::core::error::{PanelError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "o4-mini";

/// How the API key travels with the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHeader {
    Bearer,
    AzureApiKey,
}

impl KeyHeader {
    fn for_url(url: &str) -> Self {
        if url.contains(".azure.com") {
            KeyHeader::AzureApiKey
        } else {
            KeyHeader::Bearer
        }
    }
}

/// OpenAI-compatible chat-completions client in JSON mode
pub struct ChatClient {
    http: Client,
    api_key: String,
    url: String,
    model: String,
    key_header: KeyHeader,
}

impl ChatClient {
    pub fn new(
        http: Client,
        api_key: impl Into<String>,
        url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            http,
            api_key: api_key.into(),
            key_header: KeyHeader::for_url(&url),
            url,
            model: model.into(),
        }
    }

    /// Build from LLM_API_KEY (required), LLM_API_URL and LLM_MODEL
    pub fn from_env(timeout: Option<Duration>) -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| PanelError::LlmError("LLM_API_KEY not set".into()))?;
        let url = std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_CHAT_URL.into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.into());

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?, api_key, url, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn key_header(&self) -> KeyHeader {
        self.key_header
    }

    /// Ask for a JSON reply; returns the raw message content
    pub async fn complete_json(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        };

        let builder = self.http.post(&self.url).json(&request);
        let builder = match self.key_header {
            KeyHeader::Bearer => builder.bearer_auth(&self.api_key),
            KeyHeader::AzureApiKey => builder.header("api-key", &self.api_key),
        };
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PanelError::LlmError(format!(
                "chat API returned {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| PanelError::LlmError("chat API returned no content".into()))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_header_from_url() {
        let azure = ChatClient::new(
            Client::new(),
            "k",
            "https://acme.cognitiveservices.azure.com/openai/deployments/o4-mini/chat/completions",
            "o4-mini",
        );
        assert_eq!(azure.key_header(), KeyHeader::AzureApiKey);

        let openai = ChatClient::new(Client::new(), "k", DEFAULT_CHAT_URL, "o4-mini");
        assert_eq!(openai.key_header(), KeyHeader::Bearer);
        assert_eq!(openai.model(), "o4-mini");
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_reply_without_content() {
        let reply: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(reply.choices[0].message.content.is_none());
    }
}
