//! Recoverable engine errors.
//!
//! Precondition violations (out-of-range grid access, resolving an empty
//! line) are bugs and panic instead of appearing here.

use thiserror::Error;

use crate::grid::Position;
use crate::queue::MoveTicket;

/// Errors returned by the game model.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// No empty cell is left for an insertion. The board is untouched.
    #[error("board is full, no empty cell to insert into")]
    BoardFull,

    /// A tile was placed on a cell that already holds one.
    #[error("cell {position} is already occupied")]
    CellOccupied { position: Position },

    /// The move queue already holds `limit` pending commands.
    #[error("move queue is full ({limit} pending moves)")]
    QueueFull { limit: usize },

    /// An acknowledgment arrived for a move that is not waiting for one.
    #[error("unexpected acknowledgement for move {ticket}")]
    UnexpectedAcknowledgement { ticket: MoveTicket },

    /// A raw direction code outside `0..=3`.
    #[error("invalid direction code {0} (expected 0-3)")]
    InvalidDirection(u8),
}

/// Result type alias for game model operations
pub type GameResult<T> = Result<T, GameError>;
