//! Bounded command history, newest first

use crate::llm::command::ParsedCommand;
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use uuid::Uuid;

/// Maximum history entries to keep
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// One submitted command and what the parser made of it
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub command: String,
    pub result: ParsedCommand,
    pub timestamp: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(command: impl Into<String>, result: ParsedCommand) -> Self {
        Self {
            id: Uuid::new_v4(),
            command: command.into(),
            result,
            timestamp: Local::now(),
        }
    }

    /// Wall-clock time of submission, e.g. "14:03:27"
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<HistoryEntry>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY_ENTRIES),
        }
    }

    /// Add the newest entry at the front, evicting the oldest on overflow
    pub fn record(&mut self, entry: HistoryEntry) {
        if self.entries.len() >= MAX_HISTORY_ENTRIES {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        self.entries.iter()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}
