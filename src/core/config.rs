//! Panel configuration with documented defaults
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables and command-line flags. Every section has `#[serde(default)]`
//! so a partial file only needs the keys it changes.

use crate::core::error::{PanelError, Result};
use crate::core::types::LocationKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default endpoint of the command parsing service
pub const DEFAULT_PARSER_URL: &str = "http://localhost:8000/parse-command";

/// Environment variable that overrides `parser.url`
pub const PARSER_URL_ENV: &str = "PANEL_PARSER_URL";

/// Which collaborator turns free text into a parsed command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParserBackend {
    /// POST to the parse-command HTTP service
    #[default]
    Http,
    /// Call an LLM chat API directly (needs LLM_API_KEY)
    Llm,
}

/// Command parser settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub backend: ParserBackend,
    /// Parse-command endpoint for the HTTP backend
    pub url: String,
    /// Request timeout in seconds. `None` waits forever.
    pub timeout_secs: Option<u64>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            backend: ParserBackend::Http,
            url: DEFAULT_PARSER_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl ParserConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Robot movement pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Time to travel one leg, start to target (milliseconds)
    pub leg_duration_ms: u64,
    /// Number of interpolation steps per leg
    ///
    /// A leg publishes `steps + 1` positions, the first being the start cell.
    pub steps: u32,
    /// Pause after a successful pickup before heading to the destination
    pub pickup_pause_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            leg_duration_ms: 2000,
            steps: 20,
            pickup_pause_ms: 1000,
        }
    }
}

/// A location placed on the grid at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSpec {
    pub row: usize,
    pub col: usize,
    pub kind: LocationKind,
    pub label: String,
    #[serde(default)]
    pub items: u32,
}

impl LocationSpec {
    pub fn new(row: usize, col: usize, kind: LocationKind, label: &str, items: u32) -> Self {
        Self {
            row,
            col,
            kind,
            label: label.to_string(),
            items,
        }
    }
}

/// Warehouse floor layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Side length of the square grid
    pub size: usize,
    pub locations: Vec<LocationSpec>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 10,
            locations: default_locations(),
        }
    }
}

/// The stock warehouse: three shelves, two zones, one charger
pub fn default_locations() -> Vec<LocationSpec> {
    vec![
        LocationSpec::new(1, 2, LocationKind::Shelf, "Shelf A3", 3),
        LocationSpec::new(3, 5, LocationKind::Shelf, "Shelf B2", 2),
        LocationSpec::new(6, 8, LocationKind::Zone, "Zone B", 0),
        LocationSpec::new(8, 1, LocationKind::Charging, "Charging Station", 0),
        LocationSpec::new(0, 0, LocationKind::Zone, "Zone A", 1),
        LocationSpec::new(4, 7, LocationKind::Shelf, "Shelf C1", 4),
    ]
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when RUST_LOG is unset
    pub filter: String,
    /// Log file used while the terminal UI owns the screen
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warehouse_panel=info".to_string(),
            file: "warehouse-panel.log".to_string(),
        }
    }
}

/// Complete panel configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub parser: ParserConfig,
    pub animation: AnimationConfig,
    pub grid: GridConfig,
    pub logging: LoggingConfig,
}

impl PanelConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: PanelConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            PanelError::ConfigError(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Apply environment overrides (`PANEL_PARSER_URL`)
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(PARSER_URL_ENV) {
            if !url.trim().is_empty() {
                self.parser.url = url;
            }
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.grid.size == 0 {
            return Err(PanelError::ConfigError("grid.size must be positive".into()));
        }

        for loc in &self.grid.locations {
            if loc.row >= self.grid.size || loc.col >= self.grid.size {
                return Err(PanelError::ConfigError(format!(
                    "location '{}' at ({}, {}) is outside the {}x{} grid",
                    loc.label, loc.row, loc.col, self.grid.size, self.grid.size
                )));
            }
            if loc.label.is_empty() {
                return Err(PanelError::ConfigError(format!(
                    "location at ({}, {}) has an empty label",
                    loc.row, loc.col
                )));
            }
        }

        if self.animation.steps == 0 {
            return Err(PanelError::ConfigError("animation.steps must be positive".into()));
        }

        if self.parser.backend == ParserBackend::Http && self.parser.url.trim().is_empty() {
            return Err(PanelError::ConfigError("parser.url must not be empty".into()));
        }

        Ok(())
    }
}
