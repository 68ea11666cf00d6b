//! Robot position and payload

use crate::core::types::GridPos;
use serde::Serialize;

/// The single warehouse robot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RobotState {
    pub position: GridPos,
    /// Items currently on board
    pub carrying: u32,
}

impl RobotState {
    pub fn new(position: GridPos) -> Self {
        Self {
            position,
            carrying: 0,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.carrying > 0
    }

    /// Load items onto the robot
    pub fn load(&mut self, quantity: u32) {
        self.carrying = self.carrying.saturating_add(quantity);
    }

    /// Hand over the whole payload, leaving the robot empty
    ///
    /// The returned count must be credited to a destination in full.
    pub fn unload(&mut self) -> u32 {
        std::mem::take(&mut self.carrying)
    }
}
