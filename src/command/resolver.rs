//! Command resolution - turns a ParsedCommand's labels into grid positions

use crate::core::types::GridPos;
use crate::llm::command::{non_empty, CommandAction, ParsedCommand};
use crate::warehouse::Warehouse;

/// Label the CHARGE action always heads for
pub const CHARGING_STATION_LABEL: &str = "Charging Station";

/// A labeled cell the robot will visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub label: String,
    pub pos: GridPos,
}

/// What the robot will do for a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionPlan {
    /// Two legs: pick up `quantity` at source, drop at destination
    Transfer {
        source: Stop,
        destination: Stop,
        quantity: u32,
    },
    /// One leg, no item changes
    Travel { target: Stop },
}

/// A resolved plan plus the status line announcing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub plan: ExecutionPlan,
    pub announcement: String,
}

/// Why a command cannot be turned into a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Invalid or UNKNOWN command
    NotActionable,
    /// The action needs a label the command did not give
    MissingLabel,
    /// A label is not on the grid
    NotFound(String),
}

/// Resolves labels against the warehouse grid
pub struct LabelResolver<'a> {
    warehouse: &'a Warehouse,
}

impl<'a> LabelResolver<'a> {
    pub fn new(warehouse: &'a Warehouse) -> Self {
        Self { warehouse }
    }

    /// Row-major scan for an exact label; first match wins
    pub fn resolve(&self, label: &str) -> Option<GridPos> {
        self.warehouse.find_by_label(label)
    }

    fn stop(&self, label: &str) -> Result<Stop, ResolveError> {
        self.resolve(label)
            .map(|pos| Stop {
                label: label.to_string(),
                pos,
            })
            .ok_or_else(|| ResolveError::NotFound(label.to_string()))
    }

    /// Work out which cells the command visits
    ///
    /// Every label the plan needs is resolved before anything moves, so a
    /// missing location never leaves the robot half way.
    pub fn plan(&self, command: &ParsedCommand) -> Result<Resolution, ResolveError> {
        if !command.is_actionable() {
            return Err(ResolveError::NotActionable);
        }

        let source = non_empty(&command.source);
        let destination = non_empty(&command.destination);

        match command.action {
            CommandAction::Move => match (source, destination) {
                (Some(src), Some(dst)) => {
                    let announcement = match command.requested_quantity() {
                        Some(q) => format!("Moving {} from {} to {}", q, src, dst),
                        None => format!("Moving items from {} to {}", src, dst),
                    };
                    let plan = match command.requested_quantity() {
                        Some(quantity) => ExecutionPlan::Transfer {
                            source: self.stop(src)?,
                            destination: self.stop(dst)?,
                            quantity,
                        },
                        // Without a quantity the robot only goes to the source
                        None => ExecutionPlan::Travel {
                            target: self.stop(src)?,
                        },
                    };
                    Ok(Resolution { plan, announcement })
                }
                (None, Some(dst)) => self.travel(dst, format!("Moving to {}", dst)),
                (Some(src), None) => self.travel(src, format!("Moving to {}", src)),
                (None, None) => Err(ResolveError::MissingLabel),
            },
            CommandAction::Get => {
                let src = source.ok_or(ResolveError::MissingLabel)?;
                self.travel(src, format!("Getting items from {}", src))
            }
            CommandAction::Deliver => {
                let dst = destination.ok_or(ResolveError::MissingLabel)?;
                self.travel(dst, format!("Delivering items to {}", dst))
            }
            CommandAction::Charge => self.travel(
                CHARGING_STATION_LABEL,
                "Moving to charging station".to_string(),
            ),
            CommandAction::Unknown => Err(ResolveError::NotActionable),
        }
    }

    fn travel(&self, label: &str, announcement: String) -> Result<Resolution, ResolveError> {
        Ok(Resolution {
            plan: ExecutionPlan::Travel {
                target: self.stop(label)?,
            },
            announcement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(
        action: CommandAction,
        source: Option<&str>,
        destination: Option<&str>,
        quantity: Option<u32>,
    ) -> ParsedCommand {
        ParsedCommand {
            action,
            quantity,
            item_id: None,
            source: source.map(String::from),
            destination: destination.map(String::from),
            valid_command: true,
        }
    }

    #[test]
    fn test_resolve_label() {
        let warehouse = Warehouse::default();
        let resolver = LabelResolver::new(&warehouse);
        assert_eq!(resolver.resolve("Shelf C1"), Some(GridPos::new(4, 7)));
        assert_eq!(resolver.resolve("Shelf Z9"), None);
    }

    #[test]
    fn test_plan_transfer() {
        let warehouse = Warehouse::default();
        let resolver = LabelResolver::new(&warehouse);
        let resolution = resolver
            .plan(&command(
                CommandAction::Move,
                Some("Shelf A3"),
                Some("Zone B"),
                Some(3),
            ))
            .unwrap();

        assert_eq!(resolution.announcement, "Moving 3 from Shelf A3 to Zone B");
        match resolution.plan {
            ExecutionPlan::Transfer {
                source,
                destination,
                quantity,
            } => {
                assert_eq!(source.pos, GridPos::new(1, 2));
                assert_eq!(destination.pos, GridPos::new(6, 8));
                assert_eq!(quantity, 3);
            }
            other => panic!("expected transfer, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_move_without_quantity_goes_to_source() {
        let warehouse = Warehouse::default();
        let resolver = LabelResolver::new(&warehouse);
        let resolution = resolver
            .plan(&command(
                CommandAction::Move,
                Some("Shelf B2"),
                Some("Zone A"),
                None,
            ))
            .unwrap();
        assert_eq!(
            resolution.plan,
            ExecutionPlan::Travel {
                target: Stop {
                    label: "Shelf B2".into(),
                    pos: GridPos::new(3, 5)
                }
            }
        );
    }

    #[test]
    fn test_plan_transfer_unknown_destination_fails_up_front() {
        let warehouse = Warehouse::default();
        let resolver = LabelResolver::new(&warehouse);
        let result = resolver.plan(&command(
            CommandAction::Move,
            Some("Shelf A3"),
            Some("Loading Dock"),
            Some(1),
        ));
        assert_eq!(result, Err(ResolveError::NotFound("Loading Dock".into())));
    }

    #[test]
    fn test_plan_single_leg_moves() {
        let warehouse = Warehouse::default();
        let resolver = LabelResolver::new(&warehouse);

        let to_dest = resolver
            .plan(&command(CommandAction::Move, None, Some("Zone A"), None))
            .unwrap();
        assert_eq!(to_dest.announcement, "Moving to Zone A");

        let get = resolver
            .plan(&command(CommandAction::Get, Some("Shelf B2"), None, Some(2)))
            .unwrap();
        assert_eq!(get.announcement, "Getting items from Shelf B2");
        assert!(matches!(get.plan, ExecutionPlan::Travel { .. }));

        let deliver = resolver
            .plan(&command(CommandAction::Deliver, None, Some("Zone B"), Some(2)))
            .unwrap();
        assert_eq!(deliver.announcement, "Delivering items to Zone B");
    }

    #[test]
    fn test_plan_charge_ignores_labels() {
        let warehouse = Warehouse::default();
        let resolver = LabelResolver::new(&warehouse);
        let resolution = resolver
            .plan(&command(CommandAction::Charge, Some("Zone A"), None, None))
            .unwrap();
        match resolution.plan {
            ExecutionPlan::Travel { target } => assert_eq!(target.pos, GridPos::new(8, 1)),
            other => panic!("expected travel, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_missing_labels() {
        let warehouse = Warehouse::default();
        let resolver = LabelResolver::new(&warehouse);
        assert_eq!(
            resolver.plan(&command(CommandAction::Get, None, Some("Zone B"), None)),
            Err(ResolveError::MissingLabel)
        );
        assert_eq!(
            resolver.plan(&command(CommandAction::Move, Some(""), None, None)),
            Err(ResolveError::MissingLabel)
        );
    }

    #[test]
    fn test_plan_invalid_command() {
        let warehouse = Warehouse::default();
        let resolver = LabelResolver::new(&warehouse);
        let mut cmd = command(CommandAction::Charge, None, None, None);
        cmd.valid_command = false;
        assert_eq!(resolver.plan(&cmd), Err(ResolveError::NotActionable));
        assert_eq!(
            resolver.plan(&ParsedCommand::fallback()),
            Err(ResolveError::NotActionable)
        );
    }

    #[test]
    fn test_charge_without_station() {
        let warehouse = Warehouse::new(10);
        let resolver = LabelResolver::new(&warehouse);
        assert_eq!(
            resolver.plan(&command(CommandAction::Charge, None, None, None)),
            Err(ResolveError::NotFound(CHARGING_STATION_LABEL.into()))
        );
    }
}
