//! Command execution - drives the robot through a resolved plan

use crate::command::animator::{self, AnimationTiming, CancelToken};
use crate::command::resolver::{ExecutionPlan, LabelResolver, ResolveError, Stop};
use crate::core::types::GridPos;
use crate::llm::command::ParsedCommand;
use crate::ui::state::{Action, PanelState, PanelStore};
use std::time::Duration;

/// Status for commands the robot will not act on
pub const INVALID_COMMAND_STATUS: &str = "Invalid command - robot cannot execute";

/// Status when a needed location is not on the grid
pub const LOCATION_NOT_FOUND_STATUS: &str = "Location not found on grid";

/// How a command ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Invalid or UNKNOWN command; nothing moved
    Rejected,
    /// A label was missing or not on the grid; nothing moved
    LocationNotFound { label: Option<String> },
    /// Single leg finished
    Arrived { at: GridPos, label: String },
    /// Two-leg move finished; `picked` is 0 when the source was short
    Transferred {
        source: GridPos,
        destination: GridPos,
        requested: u32,
        picked: u32,
    },
    /// Stopped by the cancel token
    Cancelled { at: GridPos },
}

/// Executes parsed commands against the panel store
pub struct CommandExecutor {
    timing: AnimationTiming,
}

impl CommandExecutor {
    pub fn new(timing: AnimationTiming) -> Self {
        Self { timing }
    }

    pub fn timing(&self) -> &AnimationTiming {
        &self.timing
    }

    /// Run one command to completion
    ///
    /// `on_change` is called after every state change so the caller can
    /// redraw. Items only change after the leg that reaches them completes.
    /// Cancelling `cancel` stops the robot where it is; a payload already
    /// picked up is credited back to its source, so the robot never ends a
    /// command loaded.
    pub async fn execute<F>(
        &self,
        store: &mut PanelStore,
        command: &ParsedCommand,
        cancel: &CancelToken,
        on_change: &mut F,
    ) -> ExecutionOutcome
    where
        F: FnMut(&PanelState),
    {
        let resolution = LabelResolver::new(&store.state().warehouse).plan(command);
        let resolution = match resolution {
            Ok(resolution) => resolution,
            Err(ResolveError::NotActionable) => {
                set_status(store, on_change, INVALID_COMMAND_STATUS);
                return ExecutionOutcome::Rejected;
            }
            Err(err) => {
                let label = match err {
                    ResolveError::NotFound(label) => Some(label),
                    _ => None,
                };
                tracing::info!(?label, action = %command.action, "location not resolved");
                set_status(store, on_change, LOCATION_NOT_FOUND_STATUS);
                return ExecutionOutcome::LocationNotFound { label };
            }
        };

        tracing::debug!(plan = ?resolution.plan, "executing");
        set_status(store, on_change, &resolution.announcement);

        match resolution.plan {
            ExecutionPlan::Travel { target } => {
                self.travel_to(store, target, cancel, on_change).await
            }
            ExecutionPlan::Transfer {
                source,
                destination,
                quantity,
            } => {
                self.transfer(store, source, destination, quantity, cancel, on_change)
                    .await
            }
        }
    }

    async fn travel_to<F>(
        &self,
        store: &mut PanelStore,
        target: Stop,
        cancel: &CancelToken,
        on_change: &mut F,
    ) -> ExecutionOutcome
    where
        F: FnMut(&PanelState),
    {
        if let Err(at) = self.run_leg(store, target.pos, cancel, on_change).await {
            return self.cancelled(store, at, on_change);
        }

        let label = store
            .state()
            .warehouse
            .location(target.pos)
            .map(|loc| loc.label.clone())
            .unwrap_or_else(|| "location".to_string());
        set_status(store, on_change, &format!("Arrived at {}", label));

        ExecutionOutcome::Arrived {
            at: target.pos,
            label,
        }
    }

    async fn transfer<F>(
        &self,
        store: &mut PanelStore,
        source: Stop,
        destination: Stop,
        quantity: u32,
        cancel: &CancelToken,
        on_change: &mut F,
    ) -> ExecutionOutcome
    where
        F: FnMut(&PanelState),
    {
        if let Err(at) = self.run_leg(store, source.pos, cancel, on_change).await {
            return self.cancelled(store, at, on_change);
        }

        let available = store.state().warehouse.items_at(source.pos);
        let picked = if available >= quantity {
            store.dispatch(Action::ItemsPicked {
                at: source.pos,
                quantity,
            });
            set_status(
                store,
                on_change,
                &format!(
                    "Picked up {} items, moving to {}",
                    quantity, destination.label
                ),
            );
            if !pause(self.timing.pickup_pause, cancel).await {
                let at = store.state().robot.position;
                return self.return_payload(store, at, &source, on_change);
            }
            quantity
        } else {
            tracing::warn!(
                source = %source.label,
                requested = quantity,
                available,
                "not enough items, skipping pickup"
            );
            set_status(
                store,
                on_change,
                &format!(
                    "Only {} items at {}, nothing picked up; moving to {}",
                    available, source.label, destination.label
                ),
            );
            0
        };

        if let Err(at) = self.run_leg(store, destination.pos, cancel, on_change).await {
            if picked > 0 {
                return self.return_payload(store, at, &source, on_change);
            }
            return self.cancelled(store, at, on_change);
        }

        let status = if picked > 0 {
            store.dispatch(Action::ItemsDropped {
                at: destination.pos,
            });
            format!("Delivered {} items to {}", picked, destination.label)
        } else {
            format!(
                "Only {} items at {}, nothing delivered to {}",
                available, source.label, destination.label
            )
        };
        set_status(store, on_change, &status);

        ExecutionOutcome::Transferred {
            source: source.pos,
            destination: destination.pos,
            requested: quantity,
            picked,
        }
    }

    /// Animate the robot to `target`; `Err` carries where it stopped
    async fn run_leg<F>(
        &self,
        store: &mut PanelStore,
        target: GridPos,
        cancel: &CancelToken,
        on_change: &mut F,
    ) -> Result<(), GridPos>
    where
        F: FnMut(&PanelState),
    {
        let start = store.state().robot.position;
        store.dispatch(Action::AnimationStarted { target });
        on_change(store.state());

        let mut handle = animator::spawn(start, target, &self.timing, cancel.clone());
        while let Some(pos) = handle.next_position().await {
            store.dispatch(Action::RobotMoved(pos));
            on_change(store.state());
        }
        let outcome = handle.finish().await;

        store.dispatch(Action::AnimationFinished);
        on_change(store.state());

        if outcome.is_cancelled() {
            Err(outcome.position())
        } else {
            Ok(())
        }
    }

    fn cancelled<F>(&self, store: &mut PanelStore, at: GridPos, on_change: &mut F) -> ExecutionOutcome
    where
        F: FnMut(&PanelState),
    {
        tracing::info!(%at, "command cancelled");
        set_status(store, on_change, &format!("Stopped at {}", at));
        ExecutionOutcome::Cancelled { at }
    }

    /// Cancelled after a pickup: the payload goes back to its source
    fn return_payload<F>(
        &self,
        store: &mut PanelStore,
        at: GridPos,
        source: &Stop,
        on_change: &mut F,
    ) -> ExecutionOutcome
    where
        F: FnMut(&PanelState),
    {
        let returned = store.state().robot.carrying;
        store.dispatch(Action::ItemsReturned { at: source.pos });
        tracing::info!(%at, returned, source = %source.label, "transfer cancelled, payload returned");
        set_status(
            store,
            on_change,
            &format!(
                "Stopped at {}; returned {} items to {}",
                at, returned, source.label
            ),
        );
        ExecutionOutcome::Cancelled { at }
    }
}

/// Sleep unless cancelled; false when cancelled
async fn pause(duration: Duration, cancel: &CancelToken) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = cancel.cancelled() => false,
    }
}

fn set_status<F>(store: &mut PanelStore, on_change: &mut F, status: &str)
where
    F: FnMut(&PanelState),
{
    store.dispatch(Action::StatusChanged(status.to_string()));
    on_change(store.state());
}
