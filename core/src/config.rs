//! Construction-time game configuration.

/// When the move queue may start resolving the next command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvancePolicy {
    /// Wait for the presentation layer to acknowledge the previous move's
    /// animation before resolving the next one.
    #[default]
    OnAcknowledge,
    /// Resolve the next command as soon as the previous completion returns.
    OnDispatch,
}

/// Immutable settings for one game session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    grid_size: usize,
    winning_value: u32,
    four_probability: f64,
    advance_policy: AdvancePolicy,
    queue_limit: Option<usize>,
}

impl GameConfig {
    pub const MIN_GRID_SIZE: usize = 3;
    pub const MIN_WINNING_VALUE: u32 = 8;
    pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

    /// Create a configuration, raising `grid_size` to at least 3 and
    /// `winning_value` to at least 8.
    pub fn new(grid_size: usize, winning_value: u32) -> Self {
        GameConfig {
            grid_size: grid_size.max(Self::MIN_GRID_SIZE),
            winning_value: winning_value.max(Self::MIN_WINNING_VALUE),
            four_probability: Self::DEFAULT_FOUR_PROBABILITY,
            advance_policy: AdvancePolicy::default(),
            queue_limit: None,
        }
    }

    /// Chance that a follow-up spawn is a 4 rather than a 2, clamped to `[0, 1]`.
    /// NaN falls back to the default.
    pub fn with_four_probability(mut self, probability: f64) -> Self {
        self.four_probability = if probability.is_nan() {
            Self::DEFAULT_FOUR_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_advance_policy(mut self, policy: AdvancePolicy) -> Self {
        self.advance_policy = policy;
        self
    }

    /// Reject moves once `limit` commands are pending. `None` is unbounded,
    /// and a limit of 0 is raised to 1 so that a move can always be queued.
    pub fn with_queue_limit(mut self, limit: Option<usize>) -> Self {
        self.queue_limit = limit.map(|limit| limit.max(1));
        self
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn winning_value(&self) -> u32 {
        self.winning_value
    }

    pub fn four_probability(&self) -> f64 {
        self.four_probability
    }

    pub fn advance_policy(&self) -> AdvancePolicy {
        self.advance_policy
    }

    pub fn queue_limit(&self) -> Option<usize> {
        self.queue_limit
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::new(4, 2048)
    }
}
