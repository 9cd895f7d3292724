//! Fixed-size square container used to hold the board.
//!
//! The grid knows nothing about tiles or merging; it is a row-major `N x N`
//! array with bounds-checked access. Out-of-range coordinates are a caller
//! bug and panic.

use std::fmt;
use std::ops::{Index, IndexMut};

/// A board-absolute coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A square grid of `size * size` cells, stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `initial`.
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize, initial: T) -> Self {
        assert!(size > 0, "grid size must be positive");
        Grid {
            size,
            cells: vec![initial; size * size],
        }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Copy out one row, left to right.
    pub fn row(&self, row: usize) -> Vec<T> {
        self.check(row, 0);
        self.cells[row * self.size..(row + 1) * self.size].to_vec()
    }

    /// Copy out one column, top to bottom.
    pub fn column(&self, col: usize) -> Vec<T> {
        self.check(0, col);
        (0..self.size)
            .map(|row| self.cells[row * self.size + col].clone())
            .collect()
    }
}

impl<T> Grid<T> {
    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> &T {
        self.check(row, col);
        &self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.check(row, col);
        self.cells[row * self.size + col] = value;
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterate over `(position, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Position::new(i / size, i % size), cell))
    }

    fn check(&self, row: usize, col: usize) {
        assert!(
            row < self.size && col < self.size,
            "grid access ({row}, {col}) out of range for size {}",
            self.size
        );
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Position) -> &T {
        self.get(pos.row, pos.col)
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    fn index_mut(&mut self, pos: Position) -> &mut T {
        self.check(pos.row, pos.col);
        &mut self.cells[pos.row * self.size + pos.col]
    }
}
