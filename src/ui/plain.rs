//! Line-oriented front end for pipes and dumb terminals
//!
//! Each input line is submitted as a command; status changes are printed as
//! they happen instead of animating a grid.

use crate::command::{CancelToken, Session, SubmitOutcome};
use crate::core::error::Result;
use crate::core::types::GridPos;
use crate::llm::parser::CommandParser;
use crate::ui::state::{Action, PanelState, PanelStore};
use std::io::{self, BufRead, Write};
use tokio::runtime::Runtime;

/// Read commands from stdin until EOF or `quit`
pub fn run<P: CommandParser>(rt: &Runtime, session: Session<P>, mut store: PanelStore) -> Result<()> {
    println!("\n=== WAREHOUSE ROBOT PANEL ===");
    println!("Type a command for the robot, e.g. 'Move 3 boxes from Shelf A3 to Zone B'.");
    println!("  grid / g   - Show the warehouse grid");
    println!("  quit / q   - Exit");
    println!();
    print_grid(store.state());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }
        if input == "grid" || input == "g" {
            print_grid(store.state());
            continue;
        }

        store.dispatch(Action::InputChanged(input.to_string()));
        let mut last_status = store.state().status.clone();
        let mut on_change = |state: &PanelState| {
            if state.status != last_status {
                println!("  {}", state.status);
                last_status = state.status.clone();
            }
        };
        let outcome = rt.block_on(session.submit(&mut store, &CancelToken::new(), &mut on_change));

        match outcome {
            SubmitOutcome::Executed { parsed, .. } => println!("  [{}]", parsed.summary()),
            SubmitOutcome::ParserUnavailable { reason } => println!("  ({})", reason),
            SubmitOutcome::Ignored => {}
        }
        print_robot(store.state());
    }

    println!("\nGoodbye! Robot parked at {}.", store.state().robot.position);
    Ok(())
}

/// One line per grid row, "." for empty cells
pub fn grid_text(state: &PanelState) -> String {
    let size = state.warehouse.size();
    let mut out = String::new();
    for row in 0..size {
        for col in 0..size {
            let pos = GridPos::new(row, col);
            let symbol = if state.robot.position == pos {
                '@'
            } else {
                match state.warehouse.location(pos) {
                    Some(loc) => loc.kind.name().chars().next().unwrap_or('?'),
                    None => '.',
                }
            };
            out.push(symbol);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

fn print_grid(state: &PanelState) {
    print!("{}", grid_text(state));
    for (pos, loc) in state.warehouse.locations() {
        println!("  {} {} - {} items", pos, loc.label, loc.items);
    }
    println!();
}

fn print_robot(state: &PanelState) {
    let robot = &state.robot;
    if robot.is_loaded() {
        println!("--- Robot at {} carrying {} ---", robot.position, robot.carrying);
    } else {
        println!("--- Robot at {} ---", robot.position);
    }
}
