//! Warehouse Panel - Entry Point
//!
//! Loads configuration, builds the command parser and the panel state, then
//! hands control to the terminal UI (or the line-mode REPL with `--plain`).

use clap::Parser as ClapParser;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use warehouse_panel::command::{AnimationTiming, CommandExecutor, Session};
use warehouse_panel::core::config::{ParserBackend, PanelConfig};
use warehouse_panel::core::error::Result;
use warehouse_panel::llm::Parser;
use warehouse_panel::ui::{plain, terminal, PanelState, PanelStore};

/// Control a warehouse robot with natural language commands
#[derive(ClapParser, Debug)]
#[command(name = "warehouse-panel")]
#[command(about = "Control a warehouse robot with natural language commands")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Parse-command service endpoint (overrides config and PANEL_PARSER_URL)
    #[arg(long)]
    parser_url: Option<String>,

    /// Which parser backend to use
    #[arg(long, value_enum)]
    backend: Option<ParserBackend>,

    /// Line-oriented mode instead of the full-screen panel
    #[arg(long, default_value_t = false)]
    plain: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PanelConfig::load(path)?,
        None => PanelConfig::default(),
    };
    config.apply_env();
    if let Some(url) = args.parser_url {
        config.parser.url = url;
    }
    if let Some(backend) = args.backend {
        config.parser.backend = backend;
    }
    config.validate()?;

    init_tracing(&config, args.plain)?;
    tracing::info!("Warehouse panel starting...");

    // Create the async runtime for parser calls and animation
    let rt = Runtime::new()?;

    let parser = Parser::from_config(&config.parser)?;
    tracing::info!("Using {}", parser.describe());

    let state = PanelState::from_config(&config);
    for label in state.warehouse.duplicate_labels() {
        tracing::warn!(%label, "duplicate location label; the first cell in row-major order wins");
    }

    let executor = CommandExecutor::new(AnimationTiming::from(&config.animation));
    let session = Session::new(parser, executor);
    let store = PanelStore::new(state);

    if args.plain {
        plain::run(&rt, session, store)
    } else {
        rt.block_on(terminal::run(session, store))
    }
}

/// Log to stderr in plain mode, to the configured file under the TUI
fn init_tracing(config: &PanelConfig, plain: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    if plain {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logging.file)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}
