//! Strategy protocol: the read-only view a strategy sees and the trait it
//! implements.
//!
//! Strategies decide what to build; the engine only consumes their
//! [`Action`]s. They may keep private planning state between calls but can
//! only affect the board through the action they return.

use crate::action::Action;
use crate::board::LayeredCell;
use crate::entity::{Background, ForegroundCell};
use crate::grid::{CellPosition, GridSize};
use std::collections::VecDeque;

/// Read-only game state, shared by strategies and renderers.
pub trait GameInfo {
    /// Rows and columns of the board.
    fn board_size(&self) -> GridSize;

    /// Both layers at `position`; `None` off the board.
    fn layered_cell(&self, position: CellPosition) -> Option<&LayeredCell>;

    /// The entity covering `position`, if any.
    fn foreground(&self, position: CellPosition) -> Option<&ForegroundCell>;

    /// The deposit under `position`, if any.
    fn background(&self, position: CellPosition) -> Option<&Background>;

    /// Whether a product of this value would score.
    fn is_scored_product(&self, value: u32) -> bool;

    /// Points so far.
    fn score(&self) -> u64;

    /// Ticks run so far. During a strategy call this is the current tick.
    fn elapsed_ticks(&self) -> u64;

    /// Tick at which the game stops.
    fn end_tick(&self) -> u64;

    fn is_game_over(&self) -> bool;

    /// Short level descriptor, e.g. `"(3)"`.
    fn level_info(&self) -> String;
}

/// Chooses one action per invocation.
pub trait Strategy {
    /// Called once per action tick, before that tick's board update.
    /// Returning [`Action::Idle`] skips the turn.
    fn next_action(&mut self, info: &dyn GameInfo) -> Action;
}

impl<F> Strategy for F
where
    F: FnMut(&dyn GameInfo) -> Action,
{
    fn next_action(&mut self, info: &dyn GameInfo) -> Action {
        self(info)
    }
}

/// Never acts.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleStrategy;

impl Strategy for IdleStrategy {
    fn next_action(&mut self, _info: &dyn GameInfo) -> Action {
        Action::Idle
    }
}

/// Plays queued actions in order, one per invocation, then idles.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStrategy {
    queue: VecDeque<Action>,
}

impl ScriptedStrategy {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            queue: actions.into_iter().collect(),
        }
    }

    /// Queue `action` after everything already pending.
    pub fn push(&mut self, action: Action) {
        self.queue.push_back(action);
    }

    /// Actions not yet handed out.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Strategy for ScriptedStrategy {
    fn next_action(&mut self, _info: &dyn GameInfo) -> Action {
        self.queue.pop_front().unwrap_or(Action::Idle)
    }
}
