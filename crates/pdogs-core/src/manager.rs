//! The manager: owns the board, keeps time and score, and bridges to the
//! strategy.
//!
//! Each [`Manager::update`] is one tick:
//! 1. Stop if the end tick has been reached.
//! 2. Advance the clock.
//! 3. On action ticks, ask the strategy for one action and apply it.
//!    Rejected actions are logged and otherwise ignored.
//! 4. Run the board's two sweeps.

use crate::action::Action;
use crate::action_log::ActionLog;
use crate::board::{Board, BuildError, LayeredCell, RemoveError};
use crate::config::{ConfigError, Level, SimConfig};
use crate::entity::{Background, ForegroundCell};
use crate::flow::ProductObserver;
use crate::grid::{CellPosition, GridSize};
use crate::id::EntityId;
use crate::product::Product;
use crate::sim::{SimClock, StateHash};
use crate::strategy::{GameInfo, Strategy};
use crate::world::{WorldSummary, generate_world};
use tracing::{debug, info, trace};

/// Why the board refused an action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("build rejected: {0}")]
    Build(#[from] BuildError),
    #[error("clear rejected: {0}")]
    Remove(#[from] RemoveError),
}

// ---------------------------------------------------------------------------
// Scoreboard
// ---------------------------------------------------------------------------

/// Scoring policy: a product scores one point when its value is a multiple
/// of the divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoreboard {
    divisor: u32,
    score: u64,
}

impl Scoreboard {
    /// `divisor` must be non-zero.
    pub fn new(divisor: u32) -> Self {
        debug_assert!(divisor != 0, "scoring divisor must be non-zero");
        Self { divisor, score: 0 }
    }

    /// Products whose value is a multiple of this score.
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Points so far.
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_scored(&self, value: u32) -> bool {
        value % self.divisor == 0
    }
}

impl ProductObserver for Scoreboard {
    fn on_product_received(&mut self, product: Product) {
        if self.is_scored(product.value()) {
            self.score += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// GameView
// ---------------------------------------------------------------------------

/// Borrowed read-only view of a running game.
#[derive(Clone, Copy)]
pub struct GameView<'a> {
    board: &'a Board,
    scoreboard: &'a Scoreboard,
    clock: &'a SimClock,
}

impl GameView<'_> {
    /// The full board, for callers that need more than [`GameInfo`].
    pub fn board(&self) -> &Board {
        self.board
    }
}

impl GameInfo for GameView<'_> {
    fn board_size(&self) -> GridSize {
        self.board.size()
    }

    fn layered_cell(&self, position: CellPosition) -> Option<&LayeredCell> {
        self.board.layered_cell(position)
    }

    fn foreground(&self, position: CellPosition) -> Option<&ForegroundCell> {
        self.board.foreground(position)
    }

    fn background(&self, position: CellPosition) -> Option<&Background> {
        self.board.background(position)
    }

    fn is_scored_product(&self, value: u32) -> bool {
        self.scoreboard.is_scored(value)
    }

    fn score(&self) -> u64 {
        self.scoreboard.score()
    }

    fn elapsed_ticks(&self) -> u64 {
        self.clock.elapsed()
    }

    fn end_tick(&self) -> u64 {
        self.clock.end_tick()
    }

    fn is_game_over(&self) -> bool {
        self.clock.is_over()
    }

    fn level_info(&self) -> String {
        format!("({})", self.scoreboard.divisor())
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// One game: a generated board, its clock and score, and the strategy that
/// drives it.
pub struct Manager {
    config: SimConfig,
    level: Level,
    board: Board,
    scoreboard: Scoreboard,
    clock: SimClock,
    strategy: Box<dyn Strategy>,
    history: ActionLog,
    world: WorldSummary,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("level", &self.level)
            .field("clock", &self.clock)
            .field("scoreboard", &self.scoreboard)
            .field("world", &self.world)
            .finish_non_exhaustive()
    }
}

impl Manager {
    /// Validate the configuration and generate the world for `level.seed`.
    pub fn new(
        config: SimConfig,
        level: Level,
        strategy: Box<dyn Strategy>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        level.validate()?;
        let (board, world) = generate_world(&config, level.seed);
        Ok(Self {
            scoreboard: Scoreboard::new(level.divisor),
            clock: SimClock::new(config.end_tick),
            history: ActionLog::new(),
            config,
            level,
            board,
            strategy,
            world,
        })
    }

    /// Configuration the game was validated against.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// What world generation placed.
    pub fn world_summary(&self) -> WorldSummary {
        self.world
    }

    /// Every non-idle action issued so far, applied or not.
    pub fn history(&self) -> &ActionLog {
        &self.history
    }

    /// Points so far.
    pub fn score(&self) -> u64 {
        self.scoreboard.score()
    }

    /// Ticks run so far.
    pub fn elapsed_ticks(&self) -> u64 {
        self.clock.elapsed()
    }

    /// True once the end tick is reached; further updates do nothing.
    pub fn is_game_over(&self) -> bool {
        self.clock.is_over()
    }

    /// Whether a product of `value` would score under this level.
    pub fn is_scored_product(&self, value: u32) -> bool {
        self.scoreboard.is_scored(value)
    }

    /// Scoring callback: one point if `product` satisfies the divisor.
    pub fn on_product_received(&mut self, product: Product) {
        self.scoreboard.on_product_received(product);
    }

    /// The read-only view handed to strategies and renderers.
    pub fn view(&self) -> GameView<'_> {
        GameView {
            board: &self.board,
            scoreboard: &self.scoreboard,
            clock: &self.clock,
        }
    }

    /// Run one tick. A no-op once the game is over.
    pub fn update(&mut self) {
        let Some(tick) = self.clock.advance() else {
            return;
        };

        if tick % self.config.action_interval == 0 {
            let view = GameView {
                board: &self.board,
                scoreboard: &self.scoreboard,
                clock: &self.clock,
            };
            let action = self.strategy.next_action(&view);
            if !action.is_idle() {
                let applied = match self.apply_action(action) {
                    Ok(_) => {
                        trace!(tick, ?action, "action applied");
                        true
                    }
                    Err(err) => {
                        debug!(tick, ?action, %err, "action rejected");
                        false
                    }
                };
                self.history.record(tick, action, applied);
            }
        }

        self.board.update(&mut self.scoreboard);

        if self.clock.is_over() {
            info!(
                tick,
                score = self.scoreboard.score(),
                level = %self.view().level_info(),
                "game over"
            );
        }
    }

    /// Run until the end tick. Returns the final score.
    pub fn run_to_end(&mut self) -> u64 {
        while !self.is_game_over() {
            self.update();
        }
        self.score()
    }

    /// Apply one action to the board immediately. Returns the id of the
    /// built or removed entity; `Ok(None)` for [`Action::Idle`].
    pub fn apply_action(&mut self, action: Action) -> Result<Option<EntityId>, ActionError> {
        match action {
            Action::Idle => Ok(None),
            Action::Clear { at } => Ok(Some(self.board.remove(at)?)),
            Action::BuildMiningMachine { at, .. }
            | Action::BuildConveyor { at, .. }
            | Action::BuildCombiner { at, .. } => {
                let Some(kind) = action.build_kind() else {
                    return Ok(None);
                };
                Ok(Some(self.board.build(at, kind)?))
            }
        }
    }

    /// Deterministic hash of the tick, score and every cell.
    pub fn state_hash(&self) -> u64 {
        let mut hash = StateHash::new();
        hash.write_u64(self.clock.elapsed());
        hash.write_u64(self.scoreboard.score());
        self.board.hash_into(&mut hash);
        hash.finish()
    }
}
