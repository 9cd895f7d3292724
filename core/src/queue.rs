//! Serializing move requests against asynchronous presentation.
//!
//! The queue is a small state machine:
//!
//! ```text
//! Idle --begin--> Resolving(t) --finish(ack)--> AwaitingAck(t) --acknowledge(t)--> Idle
//!                              \--finish------> Idle
//! ```
//!
//! Only one command is ever in flight. The queue does not run anything
//! itself; [`crate::GameModel`] drives it.

use std::collections::VecDeque;
use std::fmt;

use log::{trace, warn};

use crate::error::{GameError, GameResult};
use crate::moves::MoveDirection;

/// Identifies one resolved move so its acknowledgment can be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveTicket(u64);

impl MoveTicket {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MoveTicket {
    fn from(raw: u64) -> Self {
        MoveTicket(raw)
    }
}

impl fmt::Display for MoveTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Idle,
    /// The command is being resolved and its callbacks emitted.
    Resolving(MoveTicket),
    /// Waiting for the presentation layer to acknowledge the move.
    AwaitingAck(MoveTicket),
}

/// One queued user intent.
pub struct MoveCommand<C> {
    pub direction: MoveDirection,
    pub completion: C,
}

impl<C> MoveCommand<C> {
    pub fn new(direction: MoveDirection, completion: C) -> Self {
        MoveCommand {
            direction,
            completion,
        }
    }
}

impl<C> fmt::Debug for MoveCommand<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveCommand")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// FIFO of pending moves plus the in-flight state.
pub struct MoveQueue<C> {
    pending: VecDeque<MoveCommand<C>>,
    state: QueueState,
    next_ticket: u64,
    limit: Option<usize>,
}

impl<C> MoveQueue<C> {
    /// Create an idle queue. `limit` caps the number of pending commands.
    pub fn new(limit: Option<usize>) -> Self {
        MoveQueue {
            pending: VecDeque::new(),
            state: QueueState::Idle,
            next_ticket: 0,
            limit,
        }
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    /// Number of commands waiting to be resolved, excluding the one in flight.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Append a command. Fails only when a limit is configured and reached.
    pub fn push(&mut self, command: MoveCommand<C>) -> GameResult<()> {
        if let Some(limit) = self.limit {
            if self.pending.len() >= limit {
                warn!("rejecting {:?}: {} moves pending", command.direction, limit);
                return Err(GameError::QueueFull { limit });
            }
        }
        self.pending.push_back(command);
        Ok(())
    }

    /// Take the next command if the queue is idle, moving to `Resolving`.
    pub fn begin(&mut self) -> Option<(MoveTicket, MoveCommand<C>)> {
        if self.state != QueueState::Idle {
            return None;
        }
        let command = self.pending.pop_front()?;
        let ticket = MoveTicket(self.next_ticket);
        self.next_ticket += 1;
        self.transition(QueueState::Resolving(ticket));
        Some((ticket, command))
    }

    /// Close out `ticket` after its callbacks were emitted.
    ///
    /// Does nothing if `ticket` is no longer the one being resolved, which
    /// happens when the queue was cleared from inside a completion.
    pub fn finish(&mut self, ticket: MoveTicket, await_ack: bool) {
        if self.state != QueueState::Resolving(ticket) {
            return;
        }
        if await_ack {
            self.transition(QueueState::AwaitingAck(ticket));
        } else {
            self.transition(QueueState::Idle);
        }
    }

    /// Release the queue after the presentation finished animating `ticket`.
    pub fn acknowledge(&mut self, ticket: MoveTicket) -> GameResult<()> {
        if self.state != QueueState::AwaitingAck(ticket) {
            warn!("ignoring acknowledgement for {} in state {:?}", ticket, self.state);
            return Err(GameError::UnexpectedAcknowledgement { ticket });
        }
        self.transition(QueueState::Idle);
        Ok(())
    }

    /// Drop every pending command and return to `Idle`.
    ///
    /// Tickets keep counting up so acknowledgments from before the clear
    /// are rejected.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.transition(QueueState::Idle);
    }

    fn transition(&mut self, next: QueueState) {
        trace!("move queue {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl<C> fmt::Debug for MoveQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveQueue")
            .field("pending", &self.pending.len())
            .field("state", &self.state)
            .field("limit", &self.limit)
            .finish()
    }
}
