//! Natural language command parsing
//!
//! Text goes out to a parser, a [`ParsedCommand`] comes back. The parser
//! only structures the request; the executor decides what the robot does.

pub mod client;
pub mod command;
pub mod parser;
pub mod service;

pub use client::ChatClient;
pub use command::{CommandAction, ParsedCommand};
pub use parser::{CommandParser, LlmCommandParser, Parser};
pub use service::ParseServiceClient;
