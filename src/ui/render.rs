//! Terminal rendering of the panel state
//!
//! Pure functions of [`PanelState`]; nothing here mutates state.

use crate::core::types::{GridPos, LocationKind};
use crate::ui::history::HistoryEntry;
use crate::ui::state::PanelState;
use crate::warehouse::Location;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

/// Width of one grid cell in terminal columns
pub const CELL_WIDTH: usize = 7;

pub const EXAMPLE_COMMANDS: [&str; 4] = [
    "Move 3 boxes from Shelf A3 to Zone B",
    "Go to charging station",
    "Get items from Shelf B2",
    "Deliver packages to Zone A",
];

pub fn kind_color(kind: LocationKind) -> Color {
    match kind {
        LocationKind::Shelf => Color::Blue,
        LocationKind::Zone => Color::Green,
        LocationKind::Charging => Color::Yellow,
    }
}

/// Compact cell code, e.g. "S:A3" for "Shelf A3", "CHG" for the charger
pub fn short_code(location: &Location) -> String {
    let tail = location
        .label
        .split_whitespace()
        .last()
        .unwrap_or("")
        .chars()
        .take(3)
        .collect::<String>();
    match location.kind {
        LocationKind::Charging => "CHG".to_string(),
        LocationKind::Shelf => format!("S:{}", tail),
        LocationKind::Zone => format!("Z:{}", tail),
    }
}

/// Text and style of one grid cell
pub fn cell_span(state: &PanelState, pos: GridPos) -> Span<'static> {
    let location = state.warehouse.location(pos);
    let robot_here = state.robot.position == pos;

    let mut text = String::new();
    if robot_here {
        text.push('@');
        if state.robot.is_loaded() {
            text.push_str(&format!("+{}", state.robot.carrying));
        }
    }
    match location {
        Some(loc) => {
            if !robot_here {
                text.push_str(&short_code(loc));
            }
            if loc.items > 0 {
                text.push_str(&format!(" {}", loc.items));
            }
        }
        None if !robot_here => text.push('.'),
        None => {}
    }

    let mut style = match location {
        Some(loc) => Style::default().fg(kind_color(loc.kind)),
        None => Style::default().fg(Color::DarkGray),
    };
    if robot_here {
        style = style.fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD);
        if state.animating {
            style = style.add_modifier(Modifier::SLOW_BLINK);
        }
    }

    Span::styled(format!("{:^width$}", text, width = CELL_WIDTH), style)
}

pub fn grid_lines(state: &PanelState) -> Vec<Line<'static>> {
    let size = state.warehouse.size();
    (0..size)
        .map(|row| {
            Line::from(
                (0..size)
                    .map(|col| cell_span(state, GridPos::new(row, col)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

pub fn status_lines(state: &PanelState) -> Vec<Line<'static>> {
    let (activity, color) = if state.animating {
        ("Moving...", Color::Cyan)
    } else if state.busy {
        ("Working...", Color::Cyan)
    } else {
        ("Ready", Color::Green)
    };

    let mut position = vec![Span::raw(format!("Position: {}", state.robot.position))];
    if state.robot.is_loaded() {
        position.push(Span::styled(
            format!("    Carrying: {} boxes", state.robot.carrying),
            Style::default().fg(Color::LightRed),
        ));
    }

    vec![
        Line::from(vec![
            Span::styled("Robot Status: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(activity, Style::default().fg(color)),
        ]),
        Line::from(position),
        Line::from(state.status.clone()),
    ]
}

pub fn legend_lines(state: &PanelState) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("■ Shelf  ", Style::default().fg(kind_color(LocationKind::Shelf))),
        Span::styled("■ Zone  ", Style::default().fg(kind_color(LocationKind::Zone))),
        Span::styled("■ Charging  ", Style::default().fg(kind_color(LocationKind::Charging))),
        Span::styled("@ Robot  ", Style::default().fg(Color::Red)),
        Span::raw("n items"),
    ])];
    for (pos, loc) in state.warehouse.locations() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<6}", short_code(loc)),
                Style::default().fg(kind_color(loc.kind)),
            ),
            Span::raw(format!("{} {} ({} items)", loc.label, pos, loc.items)),
        ]));
    }
    lines
}

pub fn history_item(entry: &HistoryEntry) -> ListItem<'static> {
    let color = if entry.result.valid_command {
        Color::Green
    } else {
        Color::Red
    };
    ListItem::new(vec![
        Line::from(Span::styled(
            entry.command.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            entry.time_label(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(entry.result.summary(), Style::default().fg(color))),
    ])
}

fn parsed_lines(state: &PanelState) -> Vec<Line<'static>> {
    let Some(parsed) = &state.parsed else {
        return vec![Line::from(Span::styled(
            "No command parsed yet",
            Style::default().fg(Color::DarkGray),
        ))];
    };

    let mut lines: Vec<Line<'static>> = parsed
        .to_pretty_json()
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    lines.push(if parsed.valid_command {
        Line::from(Span::styled("✓ Valid Command", Style::default().fg(Color::Green)))
    } else {
        Line::from(Span::styled("✗ Invalid Command", Style::default().fg(Color::Red)))
    });
    lines
}

fn input_lines(state: &PanelState) -> Vec<Line<'static>> {
    if state.input.is_empty() && !state.busy {
        return vec![Line::from(Span::styled(
            format!("e.g. '{}'", EXAMPLE_COMMANDS[0]),
            Style::default().fg(Color::DarkGray),
        ))];
    }
    let style = if state.busy || state.animating {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    vec![Line::from(vec![
        Span::styled(state.input.clone(), style),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ])]
}

fn titled(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
}

/// Draw the whole panel
pub fn draw(frame: &mut Frame, state: &PanelState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(frame.size());

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Logistics Robot Controller",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        outer[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(outer[1]);

    draw_floor(frame, state, columns[0]);
    draw_controls(frame, state, columns[1]);
}

fn draw_floor(frame: &mut Frame, state: &PanelState, area: Rect) {
    let grid_height = state.warehouse.size() as u16 + 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(grid_height),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(grid_lines(state)).block(titled("Warehouse Grid")),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(status_lines(state))
            .wrap(Wrap { trim: true })
            .block(titled("Robot")),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(legend_lines(state)).block(titled("Legend")),
        rows[2],
    );
}

fn draw_controls(frame: &mut Frame, state: &PanelState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(EXAMPLE_COMMANDS.len() as u16 + 2),
            Constraint::Length(10),
            Constraint::Min(0),
        ])
        .split(area);

    let input_title = if state.busy {
        "Command Interface (working...)"
    } else {
        "Command Interface (Enter to send, Esc to stop/quit)"
    };
    frame.render_widget(
        Paragraph::new(input_lines(state))
            .wrap(Wrap { trim: false })
            .block(titled(input_title)),
        rows[0],
    );

    let examples: Vec<Line<'static>> = EXAMPLE_COMMANDS
        .iter()
        .map(|c| Line::from(format!("• \"{}\"", c)))
        .collect();
    frame.render_widget(
        Paragraph::new(examples).block(titled("Example Commands")),
        rows[1],
    );

    frame.render_widget(
        Paragraph::new(parsed_lines(state)).block(titled("Parsed Command")),
        rows[2],
    );

    let items: Vec<ListItem<'static>> = state.history.iter().map(history_item).collect();
    frame.render_widget(List::new(items).block(titled("Command History")), rows[3]);
}
