//! Replay recording and playback for regression and desync checks.
//!
//! A replay stores the run parameters and the actions the strategy issued,
//! never board state. Playback regenerates the world from the seed, feeds
//! the actions back on their original ticks and compares state hashes at
//! the recorded checkpoints.

use crate::action::Action;
use crate::action_log::ActionRecord;
use crate::config::{ConfigError, Level, SimConfig};
use crate::manager::Manager;
use crate::strategy::{GameInfo, Strategy};
use std::collections::VecDeque;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("invalid replay configuration: {0}")]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// ReplayMismatch
// ---------------------------------------------------------------------------

/// Where playback diverged from the recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayMismatch {
    /// Tick of the failing checkpoint.
    pub tick: u64,
    pub expected_hash: u64,
    pub actual_hash: u64,
}

// ---------------------------------------------------------------------------
// ReplayLog
// ---------------------------------------------------------------------------

/// A recorded game: parameters, issued actions and hash checkpoints.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReplayLog {
    pub config: SimConfig,
    pub level: Level,
    /// Every non-idle action in tick order.
    pub records: Vec<ActionRecord>,
    /// Hash checkpoints: (tick, state_hash).
    pub checkpoints: Vec<(u64, u64)>,
    pub final_score: u64,
}

impl ReplayLog {
    /// An empty log for a game not yet played.
    pub fn new(config: SimConfig, level: Level) -> Self {
        Self {
            config,
            level,
            records: Vec::new(),
            checkpoints: Vec::new(),
            final_score: 0,
        }
    }

    pub fn record_checkpoint(&mut self, tick: u64, hash: u64) {
        self.checkpoints.push((tick, hash));
    }

    pub fn action_count(&self) -> usize {
        self.records.len()
    }

    /// Serialize the replay log to bytes (using bitcode).
    pub fn serialize(&self) -> Result<Vec<u8>, ReplayError> {
        bitcode::serialize(self).map_err(|e| ReplayError::Encode(e.to_string()))
    }

    /// Deserialize a replay log from bytes.
    pub fn deserialize(data: &[u8]) -> Result<Self, ReplayError> {
        bitcode::deserialize(data).map_err(|e| ReplayError::Decode(e.to_string()))
    }
}

/// Play a full game with `strategy` and record it. A checkpoint is taken
/// every `checkpoint_interval` ticks (never, if zero) and always at the
/// final tick.
pub fn record_game(
    config: SimConfig,
    level: Level,
    strategy: Box<dyn Strategy>,
    checkpoint_interval: u64,
) -> Result<ReplayLog, ReplayError> {
    let mut manager = Manager::new(config.clone(), level, strategy)?;
    let mut log = ReplayLog::new(config, level);

    while !manager.is_game_over() {
        manager.update();
        let tick = manager.elapsed_ticks();
        if checkpoint_interval != 0 && tick % checkpoint_interval == 0 {
            log.record_checkpoint(tick, manager.state_hash());
        }
    }
    let tick = manager.elapsed_ticks();
    if log.checkpoints.last().is_none_or(|&(t, _)| t != tick) {
        log.record_checkpoint(tick, manager.state_hash());
    }

    log.records = manager.history().records().to_vec();
    log.final_score = manager.score();
    Ok(log)
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// Issues recorded actions on the ticks they were originally issued.
#[derive(Debug, Clone, Default)]
pub struct ReplayStrategy {
    pending: VecDeque<ActionRecord>,
}

impl ReplayStrategy {
    pub fn new(records: impl IntoIterator<Item = ActionRecord>) -> Self {
        Self {
            pending: records.into_iter().collect(),
        }
    }
}

impl Strategy for ReplayStrategy {
    fn next_action(&mut self, info: &dyn GameInfo) -> Action {
        let tick = info.elapsed_ticks();
        // Drop anything recorded for a tick already passed.
        while self.pending.front().is_some_and(|r| r.tick < tick) {
            self.pending.pop_front();
        }
        match self.pending.front() {
            Some(record) if record.tick == tick => {
                let action = record.action;
                self.pending.pop_front();
                action
            }
            _ => Action::Idle,
        }
    }
}

/// The result of replaying a log.
#[derive(Debug)]
pub struct ReplayResult {
    pub ticks_executed: u64,
    pub final_score: u64,
    /// Whether all hash checkpoints and the final score matched.
    pub is_verified: bool,
    /// First checkpoint mismatch encountered (if any).
    pub first_mismatch: Option<ReplayMismatch>,
}

/// Replay a log without verification, returning the finished manager.
pub fn replay(log: &ReplayLog) -> Result<Manager, ReplayError> {
    let strategy = ReplayStrategy::new(log.records.iter().copied());
    let mut manager = Manager::new(log.config.clone(), log.level, Box::new(strategy))?;
    manager.run_to_end();
    Ok(manager)
}

/// Replay a log and verify hash checkpoints and the final score.
pub fn replay_and_verify(log: &ReplayLog) -> Result<ReplayResult, ReplayError> {
    let strategy = ReplayStrategy::new(log.records.iter().copied());
    let mut manager = Manager::new(log.config.clone(), log.level, Box::new(strategy))?;

    let mut first_mismatch: Option<ReplayMismatch> = None;
    let mut checkpoint_idx = 0;

    while !manager.is_game_over() {
        manager.update();
        let tick = manager.elapsed_ticks();

        while checkpoint_idx < log.checkpoints.len() && log.checkpoints[checkpoint_idx].0 <= tick {
            let (at, expected_hash) = log.checkpoints[checkpoint_idx];
            if at == tick {
                let actual_hash = manager.state_hash();
                if actual_hash != expected_hash && first_mismatch.is_none() {
                    first_mismatch = Some(ReplayMismatch {
                        tick,
                        expected_hash,
                        actual_hash,
                    });
                }
            }
            checkpoint_idx += 1;
        }
    }

    let final_score = manager.score();
    Ok(ReplayResult {
        ticks_executed: manager.elapsed_ticks(),
        final_score,
        is_verified: first_mismatch.is_none() && final_score == log.final_score,
        first_mismatch,
    })
}

// ===========================================================================
// Tests
// ===========================================================================
