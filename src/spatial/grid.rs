//! Generic row-major grid

use crate::core::types::GridPos;

/// Generic 2D grid addressed by (row, col)
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub rows: usize,
    pub cols: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    /// Square grid with `size` rows and columns
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    #[inline]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    pub fn get(&self, pos: GridPos) -> Option<&T> {
        if self.contains(pos) {
            Some(&self.data[pos.row * self.cols + pos.col])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut T> {
        if self.contains(pos) {
            Some(&mut self.data[pos.row * self.cols + pos.col])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, pos: GridPos, value: T) {
        if self.contains(pos) {
            self.data[pos.row * self.cols + pos.col] = value;
        }
    }

    /// Iterate cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &T)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, cell)| (GridPos::new(i / cols, i % cols), cell))
    }
}
