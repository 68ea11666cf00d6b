//! Warehouse Panel - natural language control panel for a warehouse robot

pub mod command;
pub mod core;
pub mod llm;
pub mod spatial;
pub mod ui;
pub mod warehouse;
