//! Collapsing a single row or column.
//!
//! The resolver always works toward index 0. Callers reorder the line so that
//! index 0 is the slot nearest the destination edge, then map the resulting
//! indices back to board coordinates (see [`crate::moves`]).
//!
//! Each placed tile may absorb at most one incoming tile per pass, so
//! `[2, 2, 2, 2]` collapses to `[4, 4]` and never to `[8]`.

use std::fmt;

/// Content of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Tile(u32),
}

impl Cell {
    /// Tile value, or `None` for an empty cell.
    pub fn value(self) -> Option<u32> {
        match self {
            Cell::Empty => None,
            Cell::Tile(v) => Some(v),
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<u32> for Cell {
    /// `0` maps to [`Cell::Empty`], anything else to a tile.
    fn from(value: u32) -> Self {
        if value == 0 {
            Cell::Empty
        } else {
            Cell::Tile(value)
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => f.pad("."),
            Cell::Tile(v) => f.pad(&v.to_string()),
        }
    }
}

/// How one output slot of a collapsed line was produced.
///
/// Indices are line-local: `source` is where the tile sat in the input,
/// the destination is the token's position in the output list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionToken {
    /// The tile stayed where it was.
    NoAction { source: usize, value: u32 },
    /// The tile slid without merging.
    Move { source: usize, value: u32 },
    /// The incoming tile at `source` slid onto a tile that never moved and
    /// merged with it. `source` is never the stationary tile's index.
    SingleCombine { source: usize, value: u32 },
    /// Two displaced tiles converged on the same slot.
    DoubleCombine { source: usize, second: usize, value: u32 },
}

impl ActionToken {
    /// Value of the tile occupying the destination slot after the move.
    pub fn value(&self) -> u32 {
        match *self {
            ActionToken::NoAction { value, .. }
            | ActionToken::Move { value, .. }
            | ActionToken::SingleCombine { value, .. }
            | ActionToken::DoubleCombine { value, .. } => value,
        }
    }

    /// Primary source index.
    pub fn source(&self) -> usize {
        match *self {
            ActionToken::NoAction { source, .. }
            | ActionToken::Move { source, .. }
            | ActionToken::SingleCombine { source, .. }
            | ActionToken::DoubleCombine { source, .. } => source,
        }
    }

    /// Whether the token describes any visible change.
    pub fn is_change(&self) -> bool {
        !matches!(self, ActionToken::NoAction { .. })
    }

    pub fn is_merge(&self) -> bool {
        matches!(
            self,
            ActionToken::SingleCombine { .. } | ActionToken::DoubleCombine { .. }
        )
    }
}

/// Result of collapsing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineResolution {
    /// The line after the move, same length as the input.
    pub cells: Vec<Cell>,
    /// One token per occupied output slot, in destination order.
    pub tokens: Vec<ActionToken>,
    /// Sum of merged totals in this line.
    pub score: u32,
}

impl LineResolution {
    pub fn changed(&self) -> bool {
        self.tokens.iter().any(ActionToken::is_change)
    }
}

/// An output slot under construction.
struct Group {
    token: ActionToken,
    merged: bool,
}

/// Collapse `line` toward index 0.
///
/// Equal tiles whose sum does not fit in a `u32` are left unmerged.
/// Panics on an empty line.
pub fn resolve_line(line: &[Cell]) -> LineResolution {
    assert!(!line.is_empty(), "cannot resolve an empty line");

    let mut groups: Vec<Group> = Vec::with_capacity(line.len());
    let mut score: u32 = 0;

    for (source, cell) in line.iter().enumerate() {
        let Cell::Tile(value) = *cell else {
            continue;
        };

        match groups.last_mut() {
            Some(last)
                if !last.merged
                    && last.token.value() == value
                    && value.checked_mul(2).is_some() =>
            {
                let total = value * 2;
                last.token = match last.token {
                    ActionToken::NoAction { .. } => ActionToken::SingleCombine {
                        source,
                        value: total,
                    },
                    ActionToken::Move { source: first, .. } => ActionToken::DoubleCombine {
                        source: first,
                        second: source,
                        value: total,
                    },
                    ActionToken::SingleCombine { .. } | ActionToken::DoubleCombine { .. } => {
                        unreachable!("merged group accepted a second tile")
                    }
                };
                last.merged = true;
                score = score.saturating_add(total);
            }
            _ => {
                let slot = groups.len();
                let token = if slot == source {
                    ActionToken::NoAction { source, value }
                } else {
                    ActionToken::Move { source, value }
                };
                groups.push(Group {
                    token,
                    merged: false,
                });
            }
        }
    }

    let mut cells = vec![Cell::Empty; line.len()];
    for (slot, group) in groups.iter().enumerate() {
        cells[slot] = Cell::Tile(group.token.value());
    }

    LineResolution {
        cells,
        tokens: groups.into_iter().map(|g| g.token).collect(),
        score,
    }
}
