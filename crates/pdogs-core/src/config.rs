//! Immutable simulation configuration.
//!
//! Every tunable that the game treats as a constant lives here so tests can
//! run on small boards. [`SimConfig::default`] reproduces the standard game.

use crate::grid::{CellPosition, GridSize};
use serde::{Deserialize, Serialize};

/// Fewest slots a conveyor can run with: the three head slots of pass one
/// plus a tail to receive into.
pub const MIN_CONVEYOR_SLOTS: usize = 4;

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    EmptyBoard { width: u32, height: u32 },
    #[error("board width must be even, got {0}")]
    OddWidth(u32),
    #[error("collection center of size {goal} does not fit a {width}x{height} board")]
    GoalTooLarge { goal: u32, width: u32, height: u32 },
    #[error("conveyor buffer size must be at least 4, got {0}")]
    BufferTooSmall(usize),
    #[error("mining interval must be at least 1")]
    ZeroMiningInterval,
    #[error("action interval must be at least 1")]
    ZeroActionInterval,
    #[error("deposit roll must be at least 1")]
    ZeroDepositRoll,
    #[error("deposit value {value} is not in 1..{roll}")]
    DepositOutOfRange { value: u32, roll: u32 },
    #[error("scoring divisor must be non-zero")]
    ZeroDivisor,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Parameters the board and its entities need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: u32,
    pub height: u32,
    /// Slots per conveyor. Also the capacity reported by an empty combiner
    /// slot and by the collection center.
    pub conveyor_buffer_size: usize,
    /// Edge length of the square collection center.
    pub goal_size: u32,
    /// Ticks between mining attempts.
    pub mining_interval: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 62,
            height: 36,
            conveyor_buffer_size: 10,
            goal_size: 4,
            mining_interval: 100,
        }
    }
}

impl BoardConfig {
    pub fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    /// Top-left cell of the centered collection center.
    pub fn goal_top_left(&self) -> CellPosition {
        let half = (self.goal_size / 2) as i32;
        CellPosition::new(self.height as i32 / 2 - half, self.width as i32 / 2 - half)
    }
}

// ---------------------------------------------------------------------------
// World generation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of wall placement attempts. Collisions are skipped.
    pub wall_count: u32,
    /// Each background draw is taken modulo this value.
    pub deposit_roll: u32,
    /// Draws that become a deposit of the same value.
    pub deposit_values: Vec<u32>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            wall_count: 100,
            deposit_roll: 30,
            deposit_values: vec![1, 2, 3, 5, 7, 11, 13],
        }
    }
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub board: BoardConfig,
    pub world: WorldConfig,
    /// The game is over once this many ticks have elapsed.
    pub end_tick: u64,
    /// The strategy is consulted on ticks divisible by this value.
    pub action_interval: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            world: WorldConfig::default(),
            end_tick: 9000,
            action_interval: 3,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.board;
        if b.width == 0 || b.height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: b.width,
                height: b.height,
            });
        }
        if b.width % 2 != 0 {
            return Err(ConfigError::OddWidth(b.width));
        }
        if b.goal_size == 0 || b.goal_size > b.width || b.goal_size > b.height {
            return Err(ConfigError::GoalTooLarge {
                goal: b.goal_size,
                width: b.width,
                height: b.height,
            });
        }
        if b.conveyor_buffer_size < MIN_CONVEYOR_SLOTS {
            return Err(ConfigError::BufferTooSmall(b.conveyor_buffer_size));
        }
        if b.mining_interval == 0 {
            return Err(ConfigError::ZeroMiningInterval);
        }
        if self.action_interval == 0 {
            return Err(ConfigError::ZeroActionInterval);
        }
        let roll = self.world.deposit_roll;
        if roll == 0 {
            return Err(ConfigError::ZeroDepositRoll);
        }
        if let Some(&value) = self
            .world
            .deposit_values
            .iter()
            .find(|&&v| v == 0 || v >= roll)
        {
            return Err(ConfigError::DepositOutOfRange { value, roll });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// The two per-run parameters: which products score, and the world seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Level {
    pub divisor: u32,
    pub seed: u32,
}

impl Level {
    pub fn new(divisor: u32, seed: u32) -> Self {
        Self { divisor, seed }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.divisor == 0 {
            return Err(ConfigError::ZeroDivisor);
        }
        Ok(())
    }
}
