pub mod config;
pub mod error;
pub mod types;

pub use config::PanelConfig;
pub use error::{PanelError, Result};
pub use types::{GridPos, LocationKind};
