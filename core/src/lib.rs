//! # 2048 Game Engine
//!
//! Board state, move resolution and move sequencing for sliding-tile
//! puzzles of any square size. Rendering is left to the caller, which
//! receives every change through a [`GameDelegate`] and tells the engine
//! when it has finished animating a move.
//!
//! ## Example
//!
//! ```rust
//! use game_2048_engine::{GameConfig, GameModel, MoveDirection, PresentationEvent};
//!
//! let mut game = GameModel::with_seed(GameConfig::default(), Vec::<PresentationEvent>::new(), 42);
//! game.start().unwrap();
//!
//! game.queue_move(MoveDirection::Left, |model, changed| {
//!     if changed {
//!         model.follow_up();
//!     }
//! })
//! .unwrap();
//!
//! // Let the next queued move through once the animation is done.
//! if let Some(ticket) = game.pending_acknowledgement() {
//!     game.acknowledge(ticket).unwrap();
//! }
//! println!("Score: {}, Lost: {}", game.score(), game.user_has_lost());
//! ```

pub mod config;
pub mod delegate;
pub mod error;
pub mod grid;
pub mod line;
pub mod model;
pub mod moves;
pub mod queue;

pub use config::{AdvancePolicy, GameConfig};
pub use delegate::{GameDelegate, PresentationEvent};
pub use error::{GameError, GameResult};
pub use grid::{Grid, Position};
pub use line::{resolve_line, ActionToken, Cell, LineResolution};
pub use model::{FollowUp, GameModel, MoveCompletion};
pub use moves::{resolve_move, MoveDirection, MoveOrder, MoveReport};
pub use queue::{MoveCommand, MoveQueue, MoveTicket, QueueState};
