//! Turn natural language into a [`ParsedCommand`]
//!
//! Two backends exist: the parse-command HTTP service (default) and a direct
//! chat-completion call. Both sit behind [`CommandParser`], which is also the
//! seam tests use to stub the network out.

use crate::core::config::{ParserBackend, ParserConfig};
use crate::core::error::{PanelError, Result};
use crate::llm::client::ChatClient;
use crate::llm::command::ParsedCommand;
use crate::llm::service::ParseServiceClient;
use std::future::Future;

/// Anything that can interpret a free-text command
pub trait CommandParser {
    fn parse(&self, command: &str) -> impl Future<Output = Result<ParsedCommand>> + Send;
}

impl CommandParser for ParseServiceClient {
    async fn parse(&self, command: &str) -> Result<ParsedCommand> {
        ParseServiceClient::parse(self, command).await
    }
}

/// Parses commands by prompting an LLM directly
pub struct LlmCommandParser {
    client: ChatClient,
}

impl LlmCommandParser {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

impl CommandParser for LlmCommandParser {
    async fn parse(&self, command: &str) -> Result<ParsedCommand> {
        let command = command.trim();
        if command.is_empty() {
            return Err(PanelError::ParserError(
                "Command string cannot be empty.".into(),
            ));
        }

        let response = self
            .client
            .complete_json(JSON_SYSTEM_PROMPT, &command_prompt(command))
            .await?;
        let json_str = extract_json(&response)?;

        serde_json::from_str(json_str).map_err(|e| {
            PanelError::LlmError(format!(
                "LLM returned invalid JSON: {} - Response: {}",
                e, response
            ))
        })
    }
}

/// The parser selected by configuration
pub enum Parser {
    Service(ParseServiceClient),
    Llm(LlmCommandParser),
}

impl Parser {
    /// Build the configured backend
    ///
    /// The LLM backend reads its credentials from the environment.
    pub fn from_config(config: &ParserConfig) -> Result<Self> {
        match config.backend {
            ParserBackend::Http => Ok(Parser::Service(ParseServiceClient::new(
                config.url.clone(),
                config.timeout(),
            )?)),
            ParserBackend::Llm => Ok(Parser::Llm(LlmCommandParser::new(ChatClient::from_env(
                config.timeout(),
            )?))),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Parser::Service(client) => format!("parse service at {}", client.url()),
            Parser::Llm(parser) => format!("LLM model {}", parser.client.model()),
        }
    }
}

impl CommandParser for Parser {
    async fn parse(&self, command: &str) -> Result<ParsedCommand> {
        match self {
            Parser::Service(client) => client.parse(command).await,
            Parser::Llm(parser) => CommandParser::parse(parser, command).await,
        }
    }
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| PanelError::LlmError("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| PanelError::LlmError("No closing brace found in response".into()))?;
    if end < start {
        return Err(PanelError::LlmError("Malformed JSON in response".into()));
    }
    Ok(&response[start..=end])
}

/// System message sent with every parse request
const JSON_SYSTEM_PROMPT: &str = "You are a helpful assistant designed to output JSON.";

/// Parsing rules plus the command, sent as the user message
pub fn command_prompt(command: &str) -> String {
    format!("{}\nUser command: \"{}\"\n\nJSON response:", PARSE_RULES, command)
}

const PARSE_RULES: &str = r#"You interpret commands for an autonomous warehouse robot.
Turn the user's natural language command into a single JSON object.

Fields: "action", "quantity", "item_id", "source", "destination", "valid_command".

ACTIONS:
- MOVE: carry items from a source location to a destination, or travel to one location
- GET: fetch items from a source location
- DELIVER: bring items to a destination location
- CHARGE: go to the charging station
- UNKNOWN: anything else

RULES:
1. Extract every field the command mentions.
2. "quantity" is an integer, or null when not given.
3. Ambiguous, nonsensical or non-logistics commands get "action": "UNKNOWN" and "valid_command": false.
4. Fields the command does not mention are null.
5. Reply with the JSON object only.

Locations are named like "Shelf A3", "Zone B", "Charging Station".
"#;
