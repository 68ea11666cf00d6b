//! Structured command produced by the parser

use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed form of a natural language robot command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub action: CommandAction,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub item_id: Option<String>,
    /// Label of the location to pick up from / travel to
    #[serde(default)]
    pub source: Option<String>,
    /// Label of the location to drop at / travel to
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub valid_command: bool,
}

/// Robot actions understood by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandAction {
    /// Travel, optionally carrying items from source to destination
    Move,
    /// Travel to the source
    Get,
    /// Travel to the destination
    Deliver,
    /// Travel to the charging station
    Charge,
    /// Not understood; anything outside the known set lands here
    #[serde(other)]
    Unknown,
}

impl CommandAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandAction::Move => "MOVE",
            CommandAction::Get => "GET",
            CommandAction::Deliver => "DELIVER",
            CommandAction::Charge => "CHARGE",
            CommandAction::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ParsedCommand {
    /// Substitute result used when the parser cannot be reached
    pub fn fallback() -> Self {
        Self {
            action: CommandAction::Unknown,
            quantity: None,
            item_id: None,
            source: None,
            destination: None,
            valid_command: false,
        }
    }

    /// Whether the executor should act on this command at all
    pub fn is_actionable(&self) -> bool {
        self.valid_command && self.action != CommandAction::Unknown
    }

    /// Requested quantity, treating zero as "not given"
    pub fn requested_quantity(&self) -> Option<u32> {
        self.quantity.filter(|q| *q > 0)
    }

    /// One-line summary: "Action: MOVE | Quantity: 3 | From: A | To: B"
    pub fn summary(&self) -> String {
        let mut line = format!("Action: {}", self.action);
        if let Some(q) = self.requested_quantity() {
            line.push_str(&format!(" | Quantity: {}", q));
        }
        if let Some(source) = non_empty(&self.source) {
            line.push_str(&format!(" | From: {}", source));
        }
        if let Some(dest) = non_empty(&self.destination) {
            line.push_str(&format!(" | To: {}", dest));
        }
        line
    }

    /// Pretty JSON for the parsed-command panel
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.summary())
    }
}

impl Default for ParsedCommand {
    fn default() -> Self {
        Self::fallback()
    }
}

/// An optional label that is present and non-empty
pub(crate) fn non_empty(label: &Option<String>) -> Option<&str> {
    label.as_deref().filter(|s| !s.is_empty())
}
