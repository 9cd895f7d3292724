//! # 2048 CLI
//!
//! Command-line front end for the engine. Interactive mode is a small
//! presentation layer: it records the engine's callbacks, redraws the board
//! and acknowledges each move once drawn. Headless mode runs simulations
//! with simple policies through the same move queue.

use std::cell::Cell as Slot;
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use game_2048_engine::{
    AdvancePolicy, FollowUp, GameConfig, GameDelegate, GameModel, MoveDirection, MoveTicket,
    Position,
};
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Parser, Debug)]
#[command(name = "game-2048-cli")]
#[command(author, version, about = "Play 2048 in the terminal or run simulations")]
struct Args {
    /// Number of episodes to run in headless mode (interactive if omitted)
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Side length of the board (at least 3)
    #[arg(long, default_value = "4")]
    size: usize,

    /// Tile value that wins the game (at least 8)
    #[arg(long, default_value = "2048")]
    goal: u32,

    /// Chance that a spawned tile is a 4 instead of a 2
    #[arg(long, default_value = "0.1")]
    four_probability: f64,

    /// Random seed for deterministic runs
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Maximum steps per episode (0 = unlimited)
    #[arg(short, long, default_value = "10000")]
    max_steps: u32,

    /// Policy for headless mode
    #[arg(short, long, value_enum, default_value = "random")]
    policy: Policy,

    /// Show board after each move in headless mode
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> GameConfig {
        GameConfig::new(self.size, self.goal).with_four_probability(self.four_probability)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Random valid moves
    Random,
    /// Cycle through actions: Left, Down, Right, Up
    Cycle,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Some(episodes) = args.episodes {
        run_headless(&args, episodes)
    } else {
        run_interactive(&args)
    }
}

// =============================================================================
// Interactive mode
// =============================================================================

/// Collects the callbacks of one move so they can be summarised on screen.
#[derive(Debug, Default)]
struct TerminalView {
    slid: usize,
    merged: usize,
    inserted: Vec<(Position, u32)>,
    score: u32,
    gained: u32,
}

impl TerminalView {
    fn clear_move(&mut self) {
        self.slid = 0;
        self.merged = 0;
        self.inserted.clear();
        self.gained = 0;
    }

    fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.gained > 0 {
            parts.push(format!("+{} points", self.gained));
        }
        if self.merged > 0 {
            parts.push(format!("{} merge(s)", self.merged));
        }
        if self.slid > 0 {
            parts.push(format!("{} tile(s) slid", self.slid));
        }
        for (at, value) in &self.inserted {
            parts.push(format!("new {} at {}", value, at));
        }
        parts.join(", ")
    }
}

impl GameDelegate for TerminalView {
    fn score_changed(&mut self, score: u32) {
        self.gained += score.saturating_sub(self.score);
        self.score = score;
    }

    fn tile_moved(&mut self, _from: Position, _to: Position, _value: u32) {
        self.slid += 1;
    }

    fn tiles_merged(&mut self, _from: (Position, Position), _to: Position, _value: u32) {
        self.merged += 1;
    }

    fn tile_inserted(&mut self, at: Position, value: u32) {
        self.inserted.push((at, value));
    }

    fn move_dispatched(&mut self, ticket: MoveTicket, changed: bool) {
        debug!("move {} dispatched, changed={}", ticket, changed);
    }
}

/// What the last completion decided, read back by the input loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Nothing,
    Won,
    Lost,
}

/// Follow-up after a changing move. Once the win has been announced the
/// game keeps spawning tiles past the goal, so the loss check must still run.
fn outcome<D: GameDelegate>(model: &mut GameModel<D>, keep_going: bool) -> Outcome {
    match model.follow_up() {
        FollowUp::Won(_) if keep_going => {
            let _ = model.spawn_random_tile();
            if model.user_has_lost() {
                Outcome::Lost
            } else {
                Outcome::Nothing
            }
        }
        FollowUp::Won(_) => Outcome::Won,
        FollowUp::Lost => Outcome::Lost,
        FollowUp::Continue => Outcome::Nothing,
    }
}

/// Run interactive mode where user plays with keyboard.
fn run_interactive(args: &Args) -> Result<()> {
    // Set terminal to raw mode for single-key input
    enable_raw_mode();
    let result = play(args);
    disable_raw_mode();
    result
}

fn play(args: &Args) -> Result<()> {
    let mut game = GameModel::with_seed(args.config(), TerminalView::default(), args.seed);
    game.start().context("placing opening tiles")?;

    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];
    let outcome = Rc::new(Slot::new(Outcome::Nothing));
    let mut won_announced = false;
    let mut over = false;

    redraw(&game, "")?;

    loop {
        // Read input
        let bytes_read = stdin.read(&mut buffer).unwrap_or(0);
        if bytes_read == 0 {
            continue;
        }

        match parse_input(&buffer[..bytes_read]) {
            InputAction::Move(direction) if !over => {
                game.delegate_mut().clear_move();
                let slot = Rc::clone(&outcome);
                let keep_going = won_announced;
                game.queue_move(direction, move |model, changed| {
                    if changed {
                        slot.set(self::outcome(model, keep_going));
                    }
                })?;

                let status = game.delegate().summary();
                redraw(&game, &status)?;

                match outcome.replace(Outcome::Nothing) {
                    Outcome::Won => {
                        won_announced = true;
                        println!("\r\n  *** YOU WON! *** (keep going, or R to restart)\r");
                    }
                    Outcome::Lost => {
                        over = true;
                        println!("\r\n  *** GAME OVER ***\r");
                        println!("  Final Score: {}\r", game.score());
                        println!("  Max Tile: {}\r", game.max_tile());
                        println!("\r\n  Press R to restart or Q to quit\r");
                    }
                    Outcome::Nothing => {}
                }

                // The board is drawn, so the move's "animation" is over.
                if let Some(ticket) = game.pending_acknowledgement() {
                    game.acknowledge(ticket)?;
                }
            }
            InputAction::Move(_) => {}
            InputAction::Restart => {
                game.reset();
                *game.delegate_mut() = TerminalView::default();
                game.start().context("placing opening tiles")?;
                won_announced = false;
                over = false;
                redraw(&game, "")?;
            }
            InputAction::Quit => {
                println!("\r\nGoodbye!\r");
                return Ok(());
            }
            InputAction::None => {}
        }
    }
}

fn redraw(game: &GameModel<TerminalView>, status: &str) -> Result<()> {
    print!("\x1b[2J\x1b[H"); // Clear screen
    println!("=== 2048 ===\r");
    println!("Controls: WASD or Arrow Keys | Q to quit | R to restart\r\n\r");
    print!("{}", game.to_string().replace('\n', "\r\n"));
    if !status.is_empty() {
        println!("  {}\r", status);
    }
    io::stdout().flush().context("flushing stdout")
}

enum InputAction {
    Move(MoveDirection),
    Restart,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(MoveDirection::Up),
        [27, 91, 66] => InputAction::Move(MoveDirection::Down),
        [27, 91, 67] => InputAction::Move(MoveDirection::Right),
        [27, 91, 68] => InputAction::Move(MoveDirection::Left),

        // WASD keys
        [b'w'] | [b'W'] => InputAction::Move(MoveDirection::Up),
        [b's'] | [b'S'] => InputAction::Move(MoveDirection::Down),
        [b'a'] | [b'A'] => InputAction::Move(MoveDirection::Left),
        [b'd'] | [b'D'] => InputAction::Move(MoveDirection::Right),

        // Control keys
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // q, Q, Ctrl+C, Esc
        [b'r'] | [b'R'] => InputAction::Restart,

        _ => InputAction::None,
    }
}

// =============================================================================
// Headless mode
// =============================================================================

/// Statistics of one finished episode.
#[derive(Debug, Clone, Copy)]
struct Episode {
    score: u32,
    max_tile: u32,
    steps: u32,
    won: bool,
}

/// Run headless simulation mode.
fn run_headless(args: &Args, episodes: u32) -> Result<()> {
    // Use a separate RNG for action selection
    let mut action_rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1000));
    let mut results = Vec::with_capacity(episodes as usize);

    for episode in 0..episodes {
        let episode_seed = args.seed.wrapping_add(u64::from(episode));
        let result = run_episode(args, episode_seed, &mut action_rng)?;

        if args.verbose {
            println!(
                "Episode {}: Score={}, MaxTile={}, Steps={}",
                episode + 1,
                result.score,
                result.max_tile,
                result.steps
            );
        }
        results.push(result);
    }

    info!("finished {} episodes", episodes);
    print_statistics(args, &results);
    Ok(())
}

fn run_episode(args: &Args, seed: u64, action_rng: &mut SmallRng) -> Result<Episode> {
    // Nothing is animated, so the queue never waits for acknowledgements.
    let config = args.config().with_advance_policy(AdvancePolicy::OnDispatch);
    let mut game = GameModel::with_seed(config, (), seed);
    game.start().context("placing opening tiles")?;

    let won = Rc::new(Slot::new(false));
    let mut steps = 0;
    let mut action_cycle = 0;

    while !game.user_has_lost() && (args.max_steps == 0 || steps < args.max_steps) {
        let action = match args.policy {
            Policy::Random => select_random_action(&game, action_rng),
            Policy::Cycle => select_cycle_action(&game, &mut action_cycle),
        };
        let Some(direction) = action else {
            break; // No valid actions
        };

        let won_flag = Rc::clone(&won);
        game.queue_move(direction, move |model, changed| {
            if changed {
                if let FollowUp::Won(_) = model.follow_up() {
                    won_flag.set(true);
                    // Keep playing past the goal to measure how far a policy gets.
                    let _ = model.spawn_random_tile();
                }
            }
        })?;
        steps += 1;

        if args.verbose {
            println!("Step {}: {:?}", steps, direction);
            print!("{}", game);
        }
    }

    Ok(Episode {
        score: game.score(),
        max_tile: game.max_tile(),
        steps,
        won: won.get(),
    })
}

fn print_statistics(args: &Args, results: &[Episode]) {
    let episodes = results.len();
    let mut scores: Vec<u32> = results.iter().map(|r| r.score).collect();
    scores.sort_unstable();

    let total_score: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    let avg_score = total_score as f64 / episodes.max(1) as f64;
    let median_score = match episodes {
        0 => 0.0,
        n if n % 2 == 0 => (f64::from(scores[n / 2 - 1]) + f64::from(scores[n / 2])) / 2.0,
        n => f64::from(scores[n / 2]),
    };
    let max_tile_overall = results.iter().map(|r| r.max_tile).max().unwrap_or(0);
    let wins = results.iter().filter(|r| r.won).count();

    // Count tile distribution
    let mut tile_counts: HashMap<u32, u32> = HashMap::new();
    for result in results {
        *tile_counts.entry(result.max_tile).or_insert(0) += 1;
    }

    // Output results in parseable format
    println!("=== Simulation Results ===");
    println!("episodes={}", episodes);
    println!("policy={:?}", args.policy);
    println!("size={}", args.config().grid_size());
    println!("seed={}", args.seed);
    println!("max_steps={}", args.max_steps);
    println!("avg_score={:.2}", avg_score);
    println!("median_score={:.2}", median_score);
    println!("min_score={}", scores.first().unwrap_or(&0));
    println!("max_score={}", scores.last().unwrap_or(&0));
    println!("max_tile_overall={}", max_tile_overall);
    println!("wins={}", wins);

    // Tile distribution
    let mut tile_list: Vec<_> = tile_counts.into_iter().collect();
    tile_list.sort_by_key(|&(tile, _)| tile);
    let distribution: Vec<String> = tile_list
        .iter()
        .map(|(tile, count)| format!("{}:{}", tile, count))
        .collect();
    println!("tile_distribution={}", distribution.join(","));
}

/// Select a random valid action.
fn select_random_action<D: GameDelegate>(
    game: &GameModel<D>,
    rng: &mut SmallRng,
) -> Option<MoveDirection> {
    let legal = game.legal_moves();
    if legal.is_empty() {
        None
    } else {
        Some(legal[rng.gen_range(0..legal.len())])
    }
}

/// Select action in a cycle: Left, Down, Right, Up.
fn select_cycle_action<D: GameDelegate>(
    game: &GameModel<D>,
    cycle: &mut usize,
) -> Option<MoveDirection> {
    let order = [
        MoveDirection::Left,
        MoveDirection::Down,
        MoveDirection::Right,
        MoveDirection::Up,
    ];

    // Try actions in cycle order, starting from current position
    for _ in 0..order.len() {
        let direction = order[*cycle % order.len()];
        *cycle += 1;
        if game.can_move(direction) {
            return Some(direction);
        }
    }

    None
}

// Platform-specific terminal raw mode handling
#[cfg(unix)]
fn enable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(unix)]
fn disable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag |= libc::ICANON | libc::ECHO;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(not(unix))]
fn enable_raw_mode() {
    // On non-Unix systems, just continue without raw mode
    // Interactive mode will require Enter after each key
}

#[cfg(not(unix))]
fn disable_raw_mode() {}
