//! Panel state and the reducer that mutates it
//!
//! All state lives in one [`PanelState`] owned by a [`PanelStore`]. Nothing
//! changes it except [`PanelStore::dispatch`], so every mutation shows up as
//! an [`Action`] in the debug log.

use crate::core::config::PanelConfig;
use crate::core::types::GridPos;
use crate::llm::command::ParsedCommand;
use crate::ui::history::{CommandHistory, HistoryEntry};
use crate::warehouse::{RobotState, Warehouse};

/// Status shown before the first command
pub const READY_STATUS: &str = "Robot is ready for commands";

/// Status shown when the parser could not be reached
pub const BACKEND_ERROR_STATUS: &str = "Error: Could not connect to backend server";

/// Everything the panel renders
#[derive(Debug, Clone)]
pub struct PanelState {
    pub warehouse: Warehouse,
    pub robot: RobotState,
    /// Command input buffer
    pub input: String,
    /// A submission is in flight (parsing or executing)
    pub busy: bool,
    /// The robot is travelling a leg
    pub animating: bool,
    pub status: String,
    /// Most recent parser result
    pub parsed: Option<ParsedCommand>,
    pub history: CommandHistory,
}

impl PanelState {
    pub fn new(warehouse: Warehouse, robot: RobotState) -> Self {
        Self {
            warehouse,
            robot,
            input: String::new(),
            busy: false,
            animating: false,
            status: READY_STATUS.to_string(),
            parsed: None,
            history: CommandHistory::new(),
        }
    }

    pub fn from_config(config: &PanelConfig) -> Self {
        Self::new(
            Warehouse::from_config(&config.grid),
            RobotState::new(GridPos::new(0, 0)),
        )
    }

    /// The submit gate: idle and something to send
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.animating && !self.input.trim().is_empty()
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new(Warehouse::default(), RobotState::default())
    }
}

/// State transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    InputChanged(String),
    InputChar(char),
    InputBackspace,
    SubmitStarted,
    /// The parser answered; records history and clears the input
    CommandParsed {
        command: String,
        result: ParsedCommand,
    },
    /// The parser failed; the fallback result is recorded instead
    ParseFailed {
        command: String,
        reason: String,
    },
    StatusChanged(String),
    AnimationStarted { target: GridPos },
    RobotMoved(GridPos),
    AnimationFinished,
    /// Take `quantity` from the cell onto the robot, if the cell has enough
    ItemsPicked { at: GridPos, quantity: u32 },
    /// Put the whole payload down on the cell
    ItemsDropped { at: GridPos },
    /// Credit an aborted transfer's payload back to the cell it came from
    ItemsReturned { at: GridPos },
    SubmitFinished,
}

impl PanelState {
    /// Apply one action
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::InputChanged(text) => self.input = text,
            Action::InputChar(c) => self.input.push(c),
            Action::InputBackspace => {
                self.input.pop();
            }
            Action::SubmitStarted => self.busy = true,
            Action::CommandParsed { command, result } => {
                self.history.record(HistoryEntry::new(command, result.clone()));
                self.parsed = Some(result);
                self.input.clear();
            }
            Action::ParseFailed { command, .. } => {
                let fallback = ParsedCommand::fallback();
                self.history.record(HistoryEntry::new(command, fallback.clone()));
                self.parsed = Some(fallback);
                self.status = BACKEND_ERROR_STATUS.to_string();
            }
            Action::StatusChanged(status) => self.status = status,
            Action::AnimationStarted { .. } => self.animating = true,
            Action::RobotMoved(pos) => {
                if self.warehouse.contains(pos) {
                    self.robot.position = pos;
                }
            }
            Action::AnimationFinished => self.animating = false,
            Action::ItemsPicked { at, quantity } => {
                if self.warehouse.take_items(at, quantity) {
                    self.robot.load(quantity);
                }
            }
            Action::ItemsDropped { at } | Action::ItemsReturned { at } => {
                if self.warehouse.location(at).is_some() {
                    let payload = self.robot.unload();
                    self.warehouse.add_items(at, payload);
                }
            }
            Action::SubmitFinished => {
                self.busy = false;
                self.animating = false;
            }
        }
    }
}

/// Owner of the panel state
#[derive(Debug, Clone, Default)]
pub struct PanelStore {
    state: PanelState,
}

impl PanelStore {
    pub fn new(state: PanelState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        self.state.reduce(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::command::CommandAction;

    #[test]
    fn test_initial_state() {
        let state = PanelState::from_config(&PanelConfig::default());
        assert_eq!(state.robot.position, GridPos::new(0, 0));
        assert_eq!(state.robot.carrying, 0);
        assert_eq!(state.status, READY_STATUS);
        assert!(state.parsed.is_none());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_submit_gate() {
        let mut store = PanelStore::default();
        assert!(!store.state().can_submit());

        store.dispatch(Action::InputChanged("   ".into()));
        assert!(!store.state().can_submit());

        store.dispatch(Action::InputChanged("Go to charging station".into()));
        assert!(store.state().can_submit());

        store.dispatch(Action::SubmitStarted);
        assert!(!store.state().can_submit());

        store.dispatch(Action::SubmitFinished);
        store.dispatch(Action::AnimationStarted {
            target: GridPos::new(1, 1),
        });
        assert!(!store.state().can_submit());
    }

    #[test]
    fn test_input_editing() {
        let mut store = PanelStore::default();
        store.dispatch(Action::InputChar('h'));
        store.dispatch(Action::InputChar('i'));
        store.dispatch(Action::InputBackspace);
        assert_eq!(store.state().input, "h");
        store.dispatch(Action::InputBackspace);
        store.dispatch(Action::InputBackspace);
        assert_eq!(store.state().input, "");
    }

    #[test]
    fn test_command_parsed_records_history_and_clears_input() {
        let mut store = PanelStore::default();
        store.dispatch(Action::InputChanged("charge".into()));
        let result = ParsedCommand {
            action: CommandAction::Charge,
            valid_command: true,
            ..ParsedCommand::fallback()
        };
        store.dispatch(Action::CommandParsed {
            command: "charge".into(),
            result: result.clone(),
        });

        let state = store.state();
        assert_eq!(state.parsed.as_ref(), Some(&result));
        assert_eq!(state.history.latest().unwrap().command, "charge");
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_parse_failed_keeps_input() {
        let mut store = PanelStore::default();
        store.dispatch(Action::InputChanged("charge".into()));
        store.dispatch(Action::ParseFailed {
            command: "charge".into(),
            reason: "connection refused".into(),
        });

        let state = store.state();
        assert_eq!(state.status, BACKEND_ERROR_STATUS);
        assert_eq!(state.parsed, Some(ParsedCommand::fallback()));
        assert_eq!(state.input, "charge");
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_pick_and_drop() {
        let mut store = PanelStore::default();
        let shelf = GridPos::new(1, 2);
        let zone = GridPos::new(6, 8);

        store.dispatch(Action::ItemsPicked {
            at: shelf,
            quantity: 2,
        });
        assert_eq!(store.state().warehouse.items_at(shelf), 1);
        assert_eq!(store.state().robot.carrying, 2);

        store.dispatch(Action::ItemsDropped { at: zone });
        assert_eq!(store.state().warehouse.items_at(zone), 2);
        assert_eq!(store.state().robot.carrying, 0);
    }

    #[test]
    fn test_pick_short_stock_is_noop() {
        let mut store = PanelStore::default();
        let shelf = GridPos::new(3, 5);
        store.dispatch(Action::ItemsPicked {
            at: shelf,
            quantity: 5,
        });
        assert_eq!(store.state().warehouse.items_at(shelf), 2);
        assert_eq!(store.state().robot.carrying, 0);
    }

    #[test]
    fn test_drop_on_empty_cell_keeps_payload() {
        let mut store = PanelStore::default();
        store.dispatch(Action::ItemsPicked {
            at: GridPos::new(4, 7),
            quantity: 1,
        });
        store.dispatch(Action::ItemsDropped {
            at: GridPos::new(9, 9),
        });
        assert_eq!(store.state().robot.carrying, 1);
    }

    #[test]
    fn test_items_returned_to_source() {
        let mut store = PanelStore::default();
        let shelf = GridPos::new(4, 7);
        store.dispatch(Action::ItemsPicked {
            at: shelf,
            quantity: 3,
        });
        store.dispatch(Action::RobotMoved(GridPos::new(5, 7)));
        store.dispatch(Action::ItemsReturned { at: shelf });

        assert_eq!(store.state().warehouse.items_at(shelf), 4);
        assert_eq!(store.state().robot.carrying, 0);
        assert_eq!(store.state().robot.position, GridPos::new(5, 7));
    }

    #[test]
    fn test_robot_moved_out_of_bounds_ignored() {
        let mut store = PanelStore::default();
        store.dispatch(Action::RobotMoved(GridPos::new(20, 0)));
        assert_eq!(store.state().robot.position, GridPos::new(0, 0));
        store.dispatch(Action::RobotMoved(GridPos::new(2, 3)));
        assert_eq!(store.state().robot.position, GridPos::new(2, 3));
    }
}
