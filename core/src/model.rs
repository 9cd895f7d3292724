//! The game model: board, score and move queue behind one façade.

use std::fmt;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{AdvancePolicy, GameConfig};
use crate::delegate::GameDelegate;
use crate::error::{GameError, GameResult};
use crate::grid::{Grid, Position};
use crate::line::Cell;
use crate::moves::{resolve_move, MoveDirection, MoveOrder, MoveReport};
use crate::queue::{MoveCommand, MoveQueue, MoveTicket, QueueState};

/// Called once a queued move has been resolved and its callbacks emitted.
///
/// Receives the model, so the caller can insert a tile or check for a win
/// right away, and whether the move changed the board.
pub type MoveCompletion<D> = Box<dyn FnOnce(&mut GameModel<D>, bool)>;

/// Outcome of [`GameModel::follow_up`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// A tile reached the winning value. No tile was spawned.
    Won(Position),
    /// A tile was spawned and no move can change the board any more.
    Lost,
    Continue,
}

/// A single game session.
///
/// The grid and score are owned here and only change through moves,
/// insertions and [`GameModel::reset`]. Every change is reported to the
/// delegate `D`.
pub struct GameModel<D: GameDelegate> {
    config: GameConfig,
    grid: Grid<Cell>,
    score: u32,
    queue: MoveQueue<MoveCompletion<D>>,
    rng: SmallRng,
    delegate: D,
}

impl<D: GameDelegate> GameModel<D> {
    /// Create an empty board with a seeded RNG for tile placement.
    pub fn with_seed(config: GameConfig, delegate: D, seed: u64) -> Self {
        GameModel {
            grid: Grid::new(config.grid_size(), Cell::Empty),
            score: 0,
            queue: MoveQueue::new(config.queue_limit()),
            rng: SmallRng::seed_from_u64(seed),
            config,
            delegate,
        }
    }

    /// Place the two opening tiles.
    pub fn start(&mut self) -> GameResult<()> {
        self.insert_tile_at_random_location(2)?;
        self.insert_tile_at_random_location(2)?;
        Ok(())
    }

    /// Queue a move in `direction`.
    ///
    /// If nothing is in flight the move is resolved before this returns;
    /// otherwise it waits behind the pending ones. `completion` runs after
    /// the move's callbacks were emitted.
    pub fn queue_move<F>(&mut self, direction: MoveDirection, completion: F) -> GameResult<()>
    where
        F: FnOnce(&mut GameModel<D>, bool) + 'static,
    {
        let completion: MoveCompletion<D> = Box::new(completion);
        self.queue.push(MoveCommand::new(direction, completion))?;
        self.process_queue();
        Ok(())
    }

    /// Signal that the presentation finished animating move `ticket`.
    ///
    /// Resolves the next queued move, if any.
    pub fn acknowledge(&mut self, ticket: MoveTicket) -> GameResult<()> {
        self.queue.acknowledge(ticket)?;
        self.process_queue();
        Ok(())
    }

    /// The move the queue is currently waiting on, if any.
    pub fn pending_acknowledgement(&self) -> Option<MoveTicket> {
        match self.queue.state() {
            QueueState::AwaitingAck(ticket) => Some(ticket),
            QueueState::Idle | QueueState::Resolving(_) => None,
        }
    }

    /// Number of moves queued behind the one in flight.
    pub fn queued_moves(&self) -> usize {
        self.queue.len()
    }

    /// Place `value` on a uniformly chosen empty cell.
    ///
    /// Returns [`GameError::BoardFull`] and changes nothing if no cell is empty.
    pub fn insert_tile_at_random_location(&mut self, value: u32) -> GameResult<Position> {
        let empty: Vec<Position> = self
            .grid
            .iter()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(pos, _)| pos)
            .collect();

        if empty.is_empty() {
            debug!("no empty cell for a {} tile", value);
            return Err(GameError::BoardFull);
        }

        let at = empty[self.rng.gen_range(0..empty.len())];
        self.insert_tile(at, value)?;
        Ok(at)
    }

    /// Place `value` at `at`, which must be empty.
    pub fn insert_tile(&mut self, at: Position, value: u32) -> GameResult<()> {
        assert!(value > 0, "tile values must be positive");
        if !self.grid[at].is_empty() {
            return Err(GameError::CellOccupied { position: at });
        }
        self.grid[at] = Cell::Tile(value);
        self.delegate.tile_inserted(at, value);
        Ok(())
    }

    /// Spawn a 2, or a 4 with the configured probability, on a random empty cell.
    pub fn spawn_random_tile(&mut self) -> GameResult<Position> {
        let value = if self.rng.gen_bool(self.config.four_probability()) {
            4
        } else {
            2
        };
        self.insert_tile_at_random_location(value)
    }

    /// The routine to run after a move that changed the board: stop on a
    /// win, otherwise spawn a tile and check whether the game is lost.
    pub fn follow_up(&mut self) -> FollowUp {
        if let Some(at) = self.winning_tile() {
            return FollowUp::Won(at);
        }
        // A full board is not an error here, the loss check below covers it.
        let _ = self.spawn_random_tile();
        if self.user_has_lost() {
            FollowUp::Lost
        } else {
            FollowUp::Continue
        }
    }

    /// Whether a move in `direction` would change the board. The board
    /// itself is not touched.
    pub fn can_move(&self, direction: MoveDirection) -> bool {
        let mut scratch = self.grid.clone();
        resolve_move(&mut scratch, direction).changed
    }

    /// Directions that would change the board, in [`MoveDirection::all`] order.
    pub fn legal_moves(&self) -> Vec<MoveDirection> {
        MoveDirection::all()
            .into_iter()
            .filter(|&dir| self.can_move(dir))
            .collect()
    }

    pub fn user_has_won(&self) -> bool {
        self.winning_tile().is_some()
    }

    /// Position of the first tile (row-major) at or above the winning value.
    pub fn winning_tile(&self) -> Option<Position> {
        let goal = self.config.winning_value();
        self.grid
            .iter()
            .find(|(_, cell)| matches!(cell, Cell::Tile(v) if *v >= goal))
            .map(|(pos, _)| pos)
    }

    /// True if the board is full and no two orthogonal neighbours are equal.
    pub fn user_has_lost(&self) -> bool {
        let size = self.grid.size();
        for (pos, cell) in self.grid.iter() {
            if cell.is_empty() {
                return false;
            }
            if pos.col + 1 < size && self.grid.get(pos.row, pos.col + 1) == cell {
                return false;
            }
            if pos.row + 1 < size && self.grid.get(pos.row + 1, pos.col) == cell {
                return false;
            }
        }
        true
    }

    /// Clear the board, the score and every queued move.
    ///
    /// Completions of dropped moves are never called.
    pub fn reset(&mut self) {
        info!(
            "resetting game (score {}, {} queued moves dropped)",
            self.score,
            self.queue.len()
        );
        self.grid.fill(Cell::Empty);
        self.score = 0;
        self.queue.clear();
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Largest tile value on the board, 0 if empty.
    pub fn max_tile(&self) -> u32 {
        self.grid
            .cells()
            .iter()
            .filter_map(|cell| cell.value())
            .max()
            .unwrap_or(0)
    }

    pub fn empty_count(&self) -> usize {
        self.grid.cells().iter().filter(|c| c.is_empty()).count()
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    // -------------------------------------------------------------------------
    // Private methods
    // -------------------------------------------------------------------------

    /// Resolve queued moves until the queue is empty or blocked on an
    /// acknowledgement.
    fn process_queue(&mut self) {
        while let Some((ticket, command)) = self.queue.begin() {
            let report = resolve_move(&mut self.grid, command.direction);
            self.score = self.score.saturating_add(report.score_delta);
            self.emit(&report);

            (command.completion)(&mut *self, report.changed);

            // A reset inside the completion already retired this ticket.
            if self.queue.state() != QueueState::Resolving(ticket) {
                continue;
            }
            self.delegate.move_dispatched(ticket, report.changed);
            let await_ack =
                report.changed && self.config.advance_policy() == AdvancePolicy::OnAcknowledge;
            self.queue.finish(ticket, await_ack);
        }
    }

    fn emit(&mut self, report: &MoveReport) {
        for order in &report.orders {
            match *order {
                MoveOrder::Single {
                    source,
                    destination,
                    value,
                    ..
                } => self.delegate.tile_moved(source, destination, value),
                MoveOrder::Double {
                    first_source,
                    second_source,
                    destination,
                    value,
                } => self
                    .delegate
                    .tiles_merged((first_source, second_source), destination, value),
            }
        }
        if report.score_delta > 0 {
            self.delegate.score_changed(self.score);
        }
    }
}

impl<D: GameDelegate> fmt::Debug for GameModel<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "GameModel {{ score: {}, queue: {:?} }}",
            self.score, self.queue
        )?;
        let size = self.grid.size();
        for row in 0..size {
            for col in 0..size {
                write!(f, "{:>5}", self.grid.get(row, col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<D: GameDelegate> fmt::Display for GameModel<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.grid.size();
        let border = format!("+{}", "------+".repeat(size));

        writeln!(f, "Score: {}", self.score)?;
        writeln!(f, "{}", border)?;
        for row in 0..size {
            write!(f, "|")?;
            for col in 0..size {
                match self.grid.get(row, col) {
                    Cell::Empty => write!(f, "      |")?,
                    Cell::Tile(v) => write!(f, "{:^6}|", v)?,
                }
            }
            writeln!(f)?;
            writeln!(f, "{}", border)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::delegate::PresentationEvent;

    type Recorder = Vec<PresentationEvent>;

    fn model(config: GameConfig) -> GameModel<Recorder> {
        GameModel::with_seed(config, Vec::new(), 42)
    }

    fn load(game: &mut GameModel<Recorder>, values: &[u32]) {
        let size = game.grid.size();
        for (i, &v) in values.iter().enumerate() {
            game.grid.set(i / size, i % size, Cell::from(v));
        }
    }

    fn values(game: &GameModel<Recorder>) -> Vec<u32> {
        game.grid.cells().iter().map(|c| c.value().unwrap_or(0)).collect()
    }

    fn changes() -> (
        Rc<RefCell<Vec<bool>>>,
        impl FnOnce(&mut GameModel<Recorder>, bool) + 'static,
    ) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |_: &mut GameModel<Recorder>, changed: bool| {
            sink.borrow_mut().push(changed);
        })
    }

    const LOST_BOARD: [u32; 16] = [2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2];

    // -------------------------------------------------------------------------
    // Moves
    // -------------------------------------------------------------------------

    #[test]
    fn test_merge_then_move_left() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[2, 2, 4]);
        let (seen, completion) = changes();

        game.queue_move(MoveDirection::Left, completion).unwrap();

        assert_eq!(&values(&game)[..4], &[4, 4, 0, 0]);
        assert_eq!(game.score(), 4);
        assert_eq!(*seen.borrow(), vec![true]);
        assert_eq!(
            game.delegate()[..],
            [
                PresentationEvent::TileMoved {
                    from: Position::new(0, 1),
                    to: Position::new(0, 0),
                    value: 4
                },
                PresentationEvent::TileMoved {
                    from: Position::new(0, 2),
                    to: Position::new(0, 1),
                    value: 4
                },
                PresentationEvent::ScoreChanged { score: 4 },
                PresentationEvent::MoveDispatched {
                    ticket: MoveTicket::from(0),
                    changed: true
                },
            ]
        );
    }

    #[test]
    fn test_trailing_pair_merges_left() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[2, 4, 2, 2]);
        game.queue_move(MoveDirection::Left, |_, _| {}).unwrap();
        assert_eq!(&values(&game)[..4], &[2, 4, 4, 0]);
        assert_eq!(game.score(), 4);
    }

    #[test]
    fn test_double_merge_event() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[0, 8, 0, 8]);
        game.queue_move(MoveDirection::Left, |_, _| {}).unwrap();
        assert_eq!(
            game.delegate()[0],
            PresentationEvent::TilesMerged {
                from: (Position::new(0, 1), Position::new(0, 3)),
                to: Position::new(0, 0),
                value: 16
            }
        );
    }

    #[test]
    fn test_no_op_move_reports_unchanged() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[2, 0, 0, 0, 4, 0, 0, 0]);
        let (seen, completion) = changes();

        game.queue_move(MoveDirection::Left, completion).unwrap();

        assert_eq!(*seen.borrow(), vec![false]);
        assert_eq!(game.score(), 0);
        assert_eq!(game.pending_acknowledgement(), None);
        assert_eq!(
            game.delegate()[..],
            [PresentationEvent::MoveDispatched {
                ticket: MoveTicket::from(0),
                changed: false
            }]
        );
    }

    #[test]
    fn test_score_accumulates() {
        let mut game = model(GameConfig::default().with_advance_policy(AdvancePolicy::OnDispatch));
        load(&mut game, &[2, 2, 0, 0, 4, 4, 0, 0]);
        game.queue_move(MoveDirection::Left, |_, _| {}).unwrap();
        assert_eq!(game.score(), 12);
        game.queue_move(MoveDirection::Up, |_, _| {}).unwrap();
        assert_eq!(game.score(), 12);
        assert_eq!(&values(&game)[..2], &[4, 0]);
        assert_eq!(values(&game)[4], 8);
    }

    #[test]
    fn test_huge_equal_tiles_do_not_overflow() {
        let mut game = model(GameConfig::default());
        game.insert_tile(Position::new(0, 0), 1 << 31).unwrap();
        game.insert_tile(Position::new(0, 1), 1 << 31).unwrap();
        let (seen, completion) = changes();

        game.queue_move(MoveDirection::Left, completion).unwrap();

        assert_eq!(*seen.borrow(), vec![false]);
        assert_eq!(&values(&game)[..2], &[1 << 31, 1 << 31]);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_score_saturates() {
        let mut game = model(GameConfig::default());
        game.score = u32::MAX - 1;
        load(&mut game, &[2, 2]);
        game.queue_move(MoveDirection::Left, |_, _| {}).unwrap();
        assert_eq!(game.score(), u32::MAX);
    }

    // -------------------------------------------------------------------------
    // Queue advancement
    // -------------------------------------------------------------------------

    #[test]
    fn test_second_move_waits_for_acknowledgement() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[0, 0, 0, 2]);
        let (seen, first) = changes();
        let sink = Rc::clone(&seen);

        game.queue_move(MoveDirection::Left, first).unwrap();
        game.queue_move(MoveDirection::Right, move |_, changed| {
            sink.borrow_mut().push(changed);
        })
        .unwrap();

        assert_eq!(*seen.borrow(), vec![true]);
        assert_eq!(values(&game)[0], 2);
        assert_eq!(game.queued_moves(), 1);

        let ticket = game.pending_acknowledgement().unwrap();
        game.acknowledge(ticket).unwrap();

        assert_eq!(*seen.borrow(), vec![true, true]);
        assert_eq!(values(&game)[3], 2);
        assert_eq!(game.queued_moves(), 0);
        assert!(game.pending_acknowledgement().is_some());
    }

    #[test]
    fn test_on_dispatch_drains_immediately() {
        let config = GameConfig::default().with_advance_policy(AdvancePolicy::OnDispatch);
        let mut game = model(config);
        load(&mut game, &[0, 0, 0, 2]);

        game.queue_move(MoveDirection::Left, |_, _| {}).unwrap();
        game.queue_move(MoveDirection::Down, |_, _| {}).unwrap();

        assert_eq!(game.pending_acknowledgement(), None);
        assert_eq!(*game.grid().get(3, 0), Cell::Tile(2));
    }

    #[test]
    fn test_moves_queued_from_completion_run_in_order() {
        let config = GameConfig::default().with_advance_policy(AdvancePolicy::OnDispatch);
        let mut game = model(config);
        load(&mut game, &[0, 0, 0, 2]);

        game.queue_move(MoveDirection::Left, |model, _| {
            model
                .queue_move(MoveDirection::Down, |_, _| {})
                .unwrap();
            // Still resolving the first move, so the second one is queued.
            assert_eq!(model.queued_moves(), 1);
        })
        .unwrap();

        assert_eq!(game.queued_moves(), 0);
        assert_eq!(*game.grid().get(3, 0), Cell::Tile(2));
    }

    #[test]
    fn test_stale_acknowledgement_rejected() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[0, 2]);
        game.queue_move(MoveDirection::Left, |_, _| {}).unwrap();
        let ticket = game.pending_acknowledgement().unwrap();
        game.acknowledge(ticket).unwrap();
        assert_eq!(
            game.acknowledge(ticket),
            Err(GameError::UnexpectedAcknowledgement { ticket })
        );
    }

    #[test]
    fn test_queue_limit() {
        let config = GameConfig::default().with_queue_limit(Some(1));
        let mut game = model(config);
        load(&mut game, &[0, 2]);

        game.queue_move(MoveDirection::Left, |_, _| {}).unwrap();
        game.queue_move(MoveDirection::Right, |_, _| {}).unwrap();
        assert_eq!(
            game.queue_move(MoveDirection::Up, |_, _| {}),
            Err(GameError::QueueFull { limit: 1 })
        );
    }

    #[test]
    fn test_zero_queue_limit_still_accepts_a_move() {
        let mut game = model(GameConfig::default().with_queue_limit(Some(0)));
        load(&mut game, &[0, 2]);
        let (seen, completion) = changes();

        game.queue_move(MoveDirection::Left, completion).unwrap();

        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn test_completion_can_follow_up() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[0, 2]);
        game.queue_move(MoveDirection::Left, |model, changed| {
            if changed {
                assert_eq!(model.follow_up(), FollowUp::Continue);
            }
        })
        .unwrap();
        assert_eq!(game.empty_count(), 14);
        assert!(matches!(
            game.delegate()[1],
            PresentationEvent::TileInserted { .. }
        ));
        assert!(matches!(
            game.delegate().last(),
            Some(PresentationEvent::MoveDispatched { changed: true, .. })
        ));
    }

    // -------------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------------

    #[test]
    fn test_insert_random_picks_empty_cell() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2]);
        let at = game.insert_tile_at_random_location(4).unwrap();
        assert_eq!(at, Position::new(3, 3));
        assert_eq!(
            game.delegate()[..],
            [PresentationEvent::TileInserted { at, value: 4 }]
        );
    }

    #[test]
    fn test_insert_on_full_board_is_noop() {
        let mut game = model(GameConfig::default());
        load(&mut game, &LOST_BOARD);
        assert_eq!(
            game.insert_tile_at_random_location(2),
            Err(GameError::BoardFull)
        );
        assert_eq!(values(&game), LOST_BOARD.to_vec());
        assert!(game.delegate().is_empty());
        assert!(game.user_has_lost());
    }

    #[test]
    fn test_insert_occupied_cell() {
        let mut game = model(GameConfig::default());
        game.insert_tile(Position::new(1, 1), 2).unwrap();
        assert_eq!(
            game.insert_tile(Position::new(1, 1), 4),
            Err(GameError::CellOccupied {
                position: Position::new(1, 1)
            })
        );
    }

    #[test]
    fn test_start_places_two_tiles() {
        let mut game = model(GameConfig::default());
        game.start().unwrap();
        assert_eq!(game.empty_count(), 14);
        assert_eq!(game.max_tile(), 2);
    }

    #[test]
    fn test_seeded_placement_is_deterministic() {
        let mut a = model(GameConfig::default());
        let mut b = model(GameConfig::default());
        a.start().unwrap();
        b.start().unwrap();
        assert_eq!(values(&a), values(&b));
    }

    #[test]
    fn test_spawn_respects_four_probability() {
        let mut game = model(GameConfig::default().with_four_probability(1.0));
        for _ in 0..5 {
            game.spawn_random_tile().unwrap();
        }
        assert!(game.grid().cells().iter().all(|c| matches!(c, Cell::Empty | Cell::Tile(4))));

        let mut game = model(GameConfig::default().with_four_probability(0.0));
        for _ in 0..5 {
            game.spawn_random_tile().unwrap();
        }
        assert_eq!(game.max_tile(), 2);
    }

    // -------------------------------------------------------------------------
    // Win / loss
    // -------------------------------------------------------------------------

    #[test]
    fn test_win_detection() {
        let mut game = model(GameConfig::new(4, 64));
        assert!(!game.user_has_won());
        load(&mut game, &[0, 0, 0, 0, 0, 32, 128]);
        assert!(game.user_has_won());
        assert_eq!(game.winning_tile(), Some(Position::new(1, 2)));
    }

    #[test]
    fn test_follow_up_stops_on_win() {
        let mut game = model(GameConfig::new(4, 8));
        load(&mut game, &[8]);
        assert_eq!(game.follow_up(), FollowUp::Won(Position::new(0, 0)));
        assert_eq!(game.empty_count(), 15);
    }

    #[test]
    fn test_lost_board() {
        let mut game = model(GameConfig::default());
        load(&mut game, &LOST_BOARD);
        assert!(game.user_has_lost());
    }

    #[test]
    fn test_not_lost_with_empty_cell() {
        let mut game = model(GameConfig::default());
        let mut board = LOST_BOARD;
        board[5] = 0;
        load(&mut game, &board);
        assert!(!game.user_has_lost());
    }

    #[test]
    fn test_not_lost_horizontal_pair() {
        let mut game = model(GameConfig::default());
        load(
            &mut game,
            &[2, 2, 4, 8, 4, 8, 16, 32, 8, 16, 32, 64, 16, 32, 64, 128],
        );
        assert!(!game.user_has_lost());
    }

    #[test]
    fn test_not_lost_vertical_pair() {
        let mut game = model(GameConfig::default());
        load(
            &mut game,
            &[2, 4, 8, 16, 2, 8, 16, 32, 4, 16, 32, 64, 8, 32, 64, 128],
        );
        assert!(!game.user_has_lost());
    }

    #[test]
    fn test_follow_up_detects_loss() {
        let mut game = model(GameConfig::default().with_four_probability(0.0));
        let mut board = LOST_BOARD;
        // The only empty cell gets a 2, which locks the board.
        board[0] = 0;
        load(&mut game, &board);
        assert_eq!(game.follow_up(), FollowUp::Lost);
    }

    #[test]
    fn test_legal_moves_do_not_mutate() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[2, 0, 0, 0, 4]);
        let before = values(&game);
        assert_eq!(
            game.legal_moves(),
            vec![MoveDirection::Down, MoveDirection::Right]
        );
        assert!(!game.can_move(MoveDirection::Left));
        assert_eq!(values(&game), before);
        assert_eq!(game.score(), 0);
    }

    // -------------------------------------------------------------------------
    // Reset
    // -------------------------------------------------------------------------

    #[test]
    fn test_reset_clears_everything() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[2, 2]);
        let (seen, completion) = changes();
        game.queue_move(MoveDirection::Left, |_, _| {}).unwrap();
        game.queue_move(MoveDirection::Right, completion).unwrap();
        assert!(game.pending_acknowledgement().is_some());

        game.reset();

        assert_eq!(game.score(), 0);
        assert_eq!(game.empty_count(), 16);
        assert_eq!(game.queued_moves(), 0);
        assert_eq!(game.pending_acknowledgement(), None);
        assert!(seen.borrow().is_empty());

        // The queue is idle again, so a new move resolves immediately.
        load(&mut game, &[0, 2]);
        game.queue_move(MoveDirection::Left, |_, _| {}).unwrap();
        assert_eq!(values(&game)[0], 2);
    }

    #[test]
    fn test_reset_inside_completion() {
        let mut game = model(GameConfig::default());
        load(&mut game, &[0, 2]);
        game.queue_move(MoveDirection::Left, |model, _| model.reset())
            .unwrap();
        assert_eq!(game.pending_acknowledgement(), None);
        assert_eq!(game.empty_count(), 16);
    }

    // -------------------------------------------------------------------------
    // Display
    // -------------------------------------------------------------------------

    #[test]
    fn test_display_format() {
        let mut game = model(GameConfig::new(3, 2048));
        load(&mut game, &[2]);
        let display = format!("{}", game);
        assert!(display.contains("Score: 0"));
        assert!(display.contains("+------+------+------+"));
        assert!(display.contains("  2   |"));
    }

    #[test]
    fn test_debug_format() {
        let game = model(GameConfig::default());
        let debug = format!("{:?}", game);
        assert!(debug.contains("GameModel"));
        assert!(debug.contains("score"));
    }
}
