//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell address on the warehouse grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Linear interpolation toward `target`, rounded to the nearest cell
    ///
    /// `progress` is clamped to 0.0..=1.0.
    pub fn lerp(&self, target: GridPos, progress: f64) -> GridPos {
        let t = progress.clamp(0.0, 1.0);
        let row = self.row as f64 + (target.row as f64 - self.row as f64) * t;
        let col = self.col as f64 + (target.col as f64 - self.col as f64) * t;
        GridPos {
            row: row.round() as usize,
            col: col.round() as usize,
        }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Kind of location placed on a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Shelf,
    Zone,
    #[serde(alias = "charging_station")]
    Charging,
}

impl LocationKind {
    pub fn name(&self) -> &'static str {
        match self {
            LocationKind::Shelf => "Shelf",
            LocationKind::Zone => "Zone",
            LocationKind::Charging => "Charging",
        }
    }
}
