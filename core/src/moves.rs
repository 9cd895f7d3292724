//! Applying the line resolver across the whole board.
//!
//! Every direction is reduced to the same toward-index-0 collapse. A
//! direction only decides which lines are read (rows or columns) and in
//! which order their cells are visited; [`MoveDirection::position`] maps a
//! `(line, slot)` pair back to board coordinates.

use log::debug;

use crate::grid::{Grid, Position};
use crate::line::{resolve_line, ActionToken, Cell};

/// The four possible move directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveDirection {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl MoveDirection {
    /// Convert a u8 to a direction (0=Up, 1=Down, 2=Left, 3=Right).
    /// Returns None for invalid values.
    pub fn from_u8(value: u8) -> Option<MoveDirection> {
        match value {
            0 => Some(MoveDirection::Up),
            1 => Some(MoveDirection::Down),
            2 => Some(MoveDirection::Left),
            3 => Some(MoveDirection::Right),
            _ => None,
        }
    }

    /// Get all four directions.
    pub fn all() -> [MoveDirection; 4] {
        [
            MoveDirection::Up,
            MoveDirection::Down,
            MoveDirection::Left,
            MoveDirection::Right,
        ]
    }

    /// Board coordinate of `slot` within `line`, where slot 0 lies on the
    /// destination edge.
    pub fn position(self, line: usize, slot: usize, size: usize) -> Position {
        match self {
            MoveDirection::Left => Position::new(line, slot),
            MoveDirection::Right => Position::new(line, size - 1 - slot),
            MoveDirection::Up => Position::new(slot, line),
            MoveDirection::Down => Position::new(size - 1 - slot, line),
        }
    }
}

/// A board-absolute instruction for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOrder {
    /// One tile slides to `destination`, merging there if `was_merge`.
    Single {
        source: Position,
        destination: Position,
        value: u32,
        was_merge: bool,
    },
    /// Two tiles slide into `destination` and merge.
    Double {
        first_source: Position,
        second_source: Position,
        destination: Position,
        value: u32,
    },
}

/// Aggregate outcome of one move over the whole board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub orders: Vec<MoveOrder>,
    /// Points gained from merges.
    pub score_delta: u32,
    pub changed: bool,
}

/// Resolve `direction` on `grid` in place.
///
/// All lines are resolved before the grid is written back, so the grid is
/// either untouched or fully updated.
pub fn resolve_move(grid: &mut Grid<Cell>, direction: MoveDirection) -> MoveReport {
    let size = grid.size();
    let mut report = MoveReport::default();
    let mut lines = Vec::with_capacity(size);

    for line in 0..size {
        let cells: Vec<Cell> = (0..size)
            .map(|slot| grid[direction.position(line, slot, size)])
            .collect();
        let resolution = resolve_line(&cells);

        for (slot, token) in resolution.tokens.iter().enumerate() {
            if let Some(order) = translate(*token, line, slot, direction, size) {
                report.orders.push(order);
            }
        }
        report.score_delta = report.score_delta.saturating_add(resolution.score);
        report.changed |= resolution.changed();
        lines.push(resolution.cells);
    }

    if report.changed {
        for (line, cells) in lines.into_iter().enumerate() {
            for (slot, cell) in cells.into_iter().enumerate() {
                grid[direction.position(line, slot, size)] = cell;
            }
        }
    }

    debug!(
        "resolved {:?}: changed={} orders={} score_delta={}",
        direction,
        report.changed,
        report.orders.len(),
        report.score_delta
    );
    report
}

fn translate(
    token: ActionToken,
    line: usize,
    slot: usize,
    direction: MoveDirection,
    size: usize,
) -> Option<MoveOrder> {
    let at = |index| direction.position(line, index, size);
    match token {
        ActionToken::NoAction { .. } => None,
        ActionToken::Move { source, value } => Some(MoveOrder::Single {
            source: at(source),
            destination: at(slot),
            value,
            was_merge: false,
        }),
        ActionToken::SingleCombine { source, value } => Some(MoveOrder::Single {
            source: at(source),
            destination: at(slot),
            value,
            was_merge: true,
        }),
        ActionToken::DoubleCombine {
            source,
            second,
            value,
        } => Some(MoveOrder::Double {
            first_source: at(source),
            second_source: at(second),
            destination: at(slot),
            value,
        }),
    }
}
