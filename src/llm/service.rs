//! Client for the parse-command HTTP service
//!
//! The service accepts `{"command": "..."}` and answers with a
//! [`ParsedCommand`] JSON object.

use crate::core::error::{PanelError, Result};
use crate::llm::command::ParsedCommand;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct CommandRequest<'a> {
    command: &'a str,
}

/// Talks to the external command parsing service
pub struct ParseServiceClient {
    client: Client,
    url: String,
}

impl ParseServiceClient {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the command and decode the service's answer
    ///
    /// Any non-success status is an error; the body is included in the
    /// message when the service sent one.
    pub async fn parse(&self, command: &str) -> Result<ParsedCommand> {
        let response = self
            .client
            .post(&self.url)
            .json(&CommandRequest { command })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PanelError::ParserError(format!(
                "HTTP error! status: {} {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let parsed: ParsedCommand = response.json().await?;
        Ok(parsed)
    }
}
