//! Interactive terminal front end
//!
//! Keys: printable characters edit the input, Enter submits, Esc stops a
//! running command (or quits when idle), Ctrl-C quits.

use crate::command::{CancelToken, Session};
use crate::core::error::{PanelError, Result};
use crate::llm::parser::CommandParser;
use crate::ui::render;
use crate::ui::state::{Action, PanelState, PanelStore};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, IsTerminal, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

type PanelTerminal = Terminal<CrosstermBackend<Stdout>>;

const INPUT_POLL: Duration = Duration::from_millis(50);

/// What a key press means to the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyIntent {
    Edit(Action),
    Submit,
    Stop,
    Quit,
    Ignore,
}

/// Map a key event; `busy` is true while a command runs
pub fn interpret_key(key: &KeyEvent, busy: bool) -> KeyIntent {
    if key.kind != KeyEventKind::Press {
        return KeyIntent::Ignore;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyIntent::Quit;
    }
    match key.code {
        KeyCode::Esc if busy => KeyIntent::Stop,
        KeyCode::Esc => KeyIntent::Quit,
        _ if busy => KeyIntent::Ignore,
        KeyCode::Enter => KeyIntent::Submit,
        KeyCode::Backspace => KeyIntent::Edit(Action::InputBackspace),
        KeyCode::Char(c) => KeyIntent::Edit(Action::InputChar(c)),
        _ => KeyIntent::Ignore,
    }
}

/// Run the panel until the user quits
pub async fn run<P: CommandParser>(session: Session<P>, store: PanelStore) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(PanelError::ConfigError(
            "terminal UI requires an interactive terminal (use --plain)".into(),
        ));
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, session, store).await;

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Forward terminal events from a blocking reader thread
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match event::poll(INPUT_POLL) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("terminal read failed: {}", e);
                    break;
                }
            },
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!("terminal poll failed: {}", e);
                break;
            }
        }
    });
    rx
}

fn redraw(terminal: &mut PanelTerminal, state: &PanelState) {
    if let Err(e) = terminal.draw(|f| render::draw(f, state)) {
        tracing::warn!("redraw failed: {}", e);
    }
}

async fn event_loop<P: CommandParser>(
    terminal: &mut PanelTerminal,
    session: Session<P>,
    mut store: PanelStore,
) -> Result<()> {
    let mut events = spawn_input_reader();
    let mut quit_requested = false;

    redraw(terminal, store.state());

    while let Some(event) = events.recv().await {
        let Event::Key(key) = event else {
            // Resize and friends just need a redraw
            redraw(terminal, store.state());
            continue;
        };

        match interpret_key(&key, false) {
            KeyIntent::Quit => break,
            KeyIntent::Edit(action) => store.dispatch(action),
            KeyIntent::Submit => {
                let cancel = CancelToken::new();
                let mut on_change = |state: &PanelState| {
                    // Keys pressed mid-command are only honored for stop/quit
                    while let Ok(ev) = events.try_recv() {
                        if let Event::Key(key) = ev {
                            match interpret_key(&key, true) {
                                KeyIntent::Stop => cancel.cancel(),
                                KeyIntent::Quit => {
                                    quit_requested = true;
                                    cancel.cancel();
                                }
                                _ => {}
                            }
                        }
                    }
                    redraw(terminal, state);
                };
                let outcome = session.submit(&mut store, &cancel, &mut on_change).await;
                tracing::debug!(?outcome, "submission done");
                if quit_requested {
                    break;
                }
            }
            KeyIntent::Stop | KeyIntent::Ignore => {}
        }

        redraw(terminal, store.state());
    }

    Ok(())
}
