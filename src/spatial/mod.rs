//! Spatial primitives

pub mod grid;

pub use grid::Grid;
