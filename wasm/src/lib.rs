//! # 2048 WebAssembly Bindings
//!
//! JavaScript-friendly bindings to the 2048 engine using wasm-bindgen. The
//! browser is the presentation layer: every call returns the callbacks the
//! engine emitted as plain objects, and the page calls `acknowledge` once it
//! has finished animating a move so the next queued move can run.

use game_2048_engine::{
    FollowUp, GameConfig, GameDelegate, GameError, GameModel, MoveDirection, MoveTicket, Position,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A board coordinate as seen from JavaScript.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsPosition {
    pub row: usize,
    pub col: usize,
}

impl From<Position> for JsPosition {
    fn from(pos: Position) -> Self {
        JsPosition {
            row: pos.row,
            col: pos.col,
        }
    }
}

/// One engine callback, serialized with a `kind` tag.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum JsEvent {
    ScoreChanged {
        score: u32,
    },
    TileMoved {
        from: JsPosition,
        to: JsPosition,
        value: u32,
    },
    TilesMerged {
        from: [JsPosition; 2],
        to: JsPosition,
        value: u32,
    },
    TileInserted {
        at: JsPosition,
        value: u32,
    },
    /// The move is fully emitted. `ticket` must be passed back to
    /// `acknowledge` when `awaitingAck` is true.
    #[serde(rename_all = "camelCase")]
    MoveFinished {
        ticket: u64,
        changed: bool,
        awaiting_ack: bool,
    },
    /// Result of the automatic follow-up after a changing move.
    GameWon {
        at: JsPosition,
    },
    GameLost,
}

/// Buffers events until the next call drains them.
#[derive(Debug, Default)]
struct EventBuffer {
    events: Vec<JsEvent>,
}

impl GameDelegate for EventBuffer {
    fn score_changed(&mut self, score: u32) {
        self.events.push(JsEvent::ScoreChanged { score });
    }

    fn tile_moved(&mut self, from: Position, to: Position, value: u32) {
        self.events.push(JsEvent::TileMoved {
            from: from.into(),
            to: to.into(),
            value,
        });
    }

    fn tiles_merged(&mut self, from: (Position, Position), to: Position, value: u32) {
        self.events.push(JsEvent::TilesMerged {
            from: [from.0.into(), from.1.into()],
            to: to.into(),
            value,
        });
    }

    fn tile_inserted(&mut self, at: Position, value: u32) {
        self.events.push(JsEvent::TileInserted {
            at: at.into(),
            value,
        });
    }

    fn move_dispatched(&mut self, ticket: MoveTicket, changed: bool) {
        self.events.push(JsEvent::MoveFinished {
            ticket: ticket.get(),
            changed,
            awaiting_ack: changed,
        });
    }
}

/// Completion for every queued move: run the follow-up and surface its
/// result as an event.
fn report_follow_up(model: &mut GameModel<EventBuffer>, changed: bool) {
    if !changed {
        return;
    }
    let event = match model.follow_up() {
        FollowUp::Won(at) => JsEvent::GameWon { at: at.into() },
        FollowUp::Lost => JsEvent::GameLost,
        FollowUp::Continue => return,
    };
    model.delegate_mut().events.push(event);
}

/// WebAssembly wrapper for the 2048 game.
#[wasm_bindgen]
pub struct WasmGame {
    game: GameModel<EventBuffer>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game and place the two opening tiles.
    ///
    /// `size` is raised to at least 3 and `goal` to at least 8.
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize, goal: u32, seed: u64) -> WasmGame {
        let mut game = GameModel::with_seed(GameConfig::new(size, goal), EventBuffer::default(), seed);
        // An empty board always has room for the opening tiles.
        let _ = game.start();
        WasmGame { game }
    }

    /// Clear the board and start over. Returns the insertion events.
    pub fn reset(&mut self) -> JsValue {
        self.game.reset();
        self.game.delegate_mut().events.clear();
        let _ = self.game.start();
        self.drain()
    }

    /// Queue a move in the given direction.
    ///
    /// Direction values:
    /// - 0 = Up
    /// - 1 = Down
    /// - 2 = Left
    /// - 3 = Right
    ///
    /// Returns the events emitted so far. When a previous move is still
    /// awaiting acknowledgement the move is queued and the array is empty.
    #[wasm_bindgen(js_name = queueMove)]
    pub fn queue_move(&mut self, direction: u8) -> Result<JsValue, JsError> {
        let direction =
            MoveDirection::from_u8(direction).ok_or(GameError::InvalidDirection(direction))?;
        self.game.queue_move(direction, report_follow_up)?;
        Ok(self.drain())
    }

    /// Tell the engine the animation of move `ticket` is done. Returns the
    /// events of any queued move that resolved as a result.
    pub fn acknowledge(&mut self, ticket: u64) -> Result<JsValue, JsError> {
        self.game.acknowledge(MoveTicket::from(ticket))?;
        Ok(self.drain())
    }

    /// Place a tile of `value` on a random empty cell. Returns the events,
    /// or an empty array if the board is full.
    #[wasm_bindgen(js_name = insertTileAtRandomLocation)]
    pub fn insert_tile_at_random_location(&mut self, value: u32) -> JsValue {
        if value > 0 {
            let _ = self.game.insert_tile_at_random_location(value);
        }
        self.drain()
    }

    /// Get the board as a flat row-major array (0 for empty cells).
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Vec<u32> {
        self.game
            .grid()
            .cells()
            .iter()
            .map(|cell| cell.value().unwrap_or(0))
            .collect()
    }

    #[wasm_bindgen(js_name = getSize)]
    pub fn get_size(&self) -> usize {
        self.game.grid().size()
    }

    /// Get the current score.
    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u32 {
        self.game.score()
    }

    #[wasm_bindgen(js_name = userHasWon)]
    pub fn user_has_won(&self) -> bool {
        self.game.user_has_won()
    }

    #[wasm_bindgen(js_name = userHasLost)]
    pub fn user_has_lost(&self) -> bool {
        self.game.user_has_lost()
    }

    /// Number of moves waiting behind the one being animated.
    #[wasm_bindgen(js_name = queuedMoves)]
    pub fn queued_moves(&self) -> usize {
        self.game.queued_moves()
    }

    /// Get the maximum tile value on the board.
    #[wasm_bindgen(js_name = getMaxTile)]
    pub fn get_max_tile(&self) -> u32 {
        self.game.max_tile()
    }

    /// Helper method to hand buffered events to JavaScript.
    fn drain(&mut self) -> JsValue {
        let events = std::mem::take(&mut self.game.delegate_mut().events);
        serde_wasm_bindgen::to_value(&events).unwrap_or(JsValue::NULL)
    }
}
