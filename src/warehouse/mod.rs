//! Warehouse state model: the location grid and the robot

pub mod layout;
pub mod robot;

pub use layout::{Location, Warehouse};
pub use robot::RobotState;
