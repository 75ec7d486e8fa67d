//! The action vocabulary a strategy uses to change the board.

use crate::entity::BuildKind;
use crate::grid::{CellPosition, Direction};
use serde::{Deserialize, Serialize};

/// One strategy decision. Every non-idle action targets a single cell;
/// multi-cell entities are anchored there as their top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    BuildMiningMachine { at: CellPosition, facing: Direction },
    /// A conveyor carrying products toward `direction`.
    BuildConveyor { at: CellPosition, direction: Direction },
    BuildCombiner { at: CellPosition, facing: Direction },
    Clear { at: CellPosition },
}

// Ordinal tables of the action-history format.
const MINER_ORDINALS: [Direction; 4] = [
    Direction::Left,
    Direction::Top,
    Direction::Right,
    Direction::Bottom,
];
const CONVEYOR_ORDINALS: [Direction; 4] = [
    Direction::Right,
    Direction::Bottom,
    Direction::Left,
    Direction::Top,
];
const COMBINER_ORDINALS: [Direction; 4] = [
    Direction::Top,
    Direction::Right,
    Direction::Bottom,
    Direction::Left,
];

const MINER_BASE: u8 = 1;
const CONVEYOR_BASE: u8 = 5;
const COMBINER_BASE: u8 = 9;
const CLEAR: u8 = 13;

fn table_index(table: &[Direction; 4], direction: Direction) -> u8 {
    table.iter().position(|&d| d == direction).unwrap_or(0) as u8
}

impl Action {
    /// Target cell, `None` for [`Action::Idle`].
    pub fn position(&self) -> Option<CellPosition> {
        match *self {
            Action::Idle => None,
            Action::BuildMiningMachine { at, .. }
            | Action::BuildConveyor { at, .. }
            | Action::BuildCombiner { at, .. }
            | Action::Clear { at } => Some(at),
        }
    }

    /// The entity this action builds, if it is a build action.
    pub fn build_kind(&self) -> Option<BuildKind> {
        match *self {
            Action::BuildMiningMachine { facing, .. } => Some(BuildKind::MiningMachine(facing)),
            Action::BuildConveyor { direction, .. } => Some(BuildKind::Conveyor(direction)),
            Action::BuildCombiner { facing, .. } => Some(BuildKind::Combiner(facing)),
            Action::Idle | Action::Clear { .. } => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Action::Idle)
    }

    /// Stable action-type number: 0 idle, 1-4 miners (left, top, right,
    /// bottom), 5-8 conveyors (rightward, downward, leftward, upward),
    /// 9-12 combiners (top, right, bottom, left), 13 clear.
    pub fn ordinal(&self) -> u8 {
        match *self {
            Action::Idle => 0,
            Action::BuildMiningMachine { facing, .. } => {
                MINER_BASE + table_index(&MINER_ORDINALS, facing)
            }
            Action::BuildConveyor { direction, .. } => {
                CONVEYOR_BASE + table_index(&CONVEYOR_ORDINALS, direction)
            }
            Action::BuildCombiner { facing, .. } => {
                COMBINER_BASE + table_index(&COMBINER_ORDINALS, facing)
            }
            Action::Clear { .. } => CLEAR,
        }
    }

    /// Inverse of [`ordinal`](Self::ordinal). `at` is ignored for idle.
    pub fn from_ordinal(ordinal: u8, at: CellPosition) -> Option<Action> {
        let action = match ordinal {
            0 => Action::Idle,
            MINER_BASE..CONVEYOR_BASE => Action::BuildMiningMachine {
                at,
                facing: MINER_ORDINALS[(ordinal - MINER_BASE) as usize],
            },
            CONVEYOR_BASE..COMBINER_BASE => Action::BuildConveyor {
                at,
                direction: CONVEYOR_ORDINALS[(ordinal - CONVEYOR_BASE) as usize],
            },
            COMBINER_BASE..CLEAR => Action::BuildCombiner {
                at,
                facing: COMBINER_ORDINALS[(ordinal - COMBINER_BASE) as usize],
            },
            CLEAR => Action::Clear { at },
            _ => return None,
        };
        Some(action)
    }
}
