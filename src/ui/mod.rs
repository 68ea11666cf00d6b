//! UI module - panel state plus terminal and line-mode front ends

pub mod history;
pub mod plain;
pub mod render;
pub mod state;
pub mod terminal;

pub use history::{CommandHistory, HistoryEntry, MAX_HISTORY_ENTRIES};
pub use state::{Action, PanelState, PanelStore};
