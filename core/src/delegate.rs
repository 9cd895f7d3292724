//! Callbacks consumed by the presentation layer.

use crate::grid::Position;
use crate::queue::MoveTicket;

/// Receiver of everything the presentation layer needs to animate a game.
///
/// Coordinates are board-absolute. Callbacks for one move arrive in order:
/// tile movements, then the new score if it changed, then
/// [`GameDelegate::move_dispatched`].
pub trait GameDelegate {
    fn score_changed(&mut self, score: u32);

    /// A single tile slid from `from` to `to`, ending with `value`.
    fn tile_moved(&mut self, from: Position, to: Position, value: u32);

    /// Two tiles slid into `to` and merged into `value`.
    fn tiles_merged(&mut self, from: (Position, Position), to: Position, value: u32);

    fn tile_inserted(&mut self, at: Position, value: u32);

    /// All callbacks for move `ticket` have been emitted. If `changed`, the
    /// model waits for [`crate::GameModel::acknowledge`] with this ticket
    /// before resolving the next queued move.
    fn move_dispatched(&mut self, _ticket: MoveTicket, _changed: bool) {}
}

/// A recorded delegate callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationEvent {
    ScoreChanged {
        score: u32,
    },
    TileMoved {
        from: Position,
        to: Position,
        value: u32,
    },
    TilesMerged {
        from: (Position, Position),
        to: Position,
        value: u32,
    },
    TileInserted {
        at: Position,
        value: u32,
    },
    MoveDispatched {
        ticket: MoveTicket,
        changed: bool,
    },
}

/// Records every callback in order.
impl GameDelegate for Vec<PresentationEvent> {
    fn score_changed(&mut self, score: u32) {
        self.push(PresentationEvent::ScoreChanged { score });
    }

    fn tile_moved(&mut self, from: Position, to: Position, value: u32) {
        self.push(PresentationEvent::TileMoved { from, to, value });
    }

    fn tiles_merged(&mut self, from: (Position, Position), to: Position, value: u32) {
        self.push(PresentationEvent::TilesMerged { from, to, value });
    }

    fn tile_inserted(&mut self, at: Position, value: u32) {
        self.push(PresentationEvent::TileInserted { at, value });
    }

    fn move_dispatched(&mut self, ticket: MoveTicket, changed: bool) {
        self.push(PresentationEvent::MoveDispatched { ticket, changed });
    }
}

/// Discards every callback.
impl GameDelegate for () {
    fn score_changed(&mut self, _score: u32) {}
    fn tile_moved(&mut self, _from: Position, _to: Position, _value: u32) {}
    fn tiles_merged(&mut self, _from: (Position, Position), _to: Position, _value: u32) {}
    fn tile_inserted(&mut self, _at: Position, _value: u32) {}
}
