//! Action history: every non-idle action the manager received, with the
//! tick it arrived on and whether the board accepted it.
//!
//! The text form is one `row col ordinal` line per action, the format the
//! interactive client saves. It carries no ticks; replaying it through a
//! [`ScriptedStrategy`](crate::strategy::ScriptedStrategy) plays the
//! actions back-to-back.

use crate::action::Action;
use crate::grid::CellPosition;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionLogError {
    #[error("line {line}: expected `row col ordinal`, got {content:?}")]
    Malformed { line: usize, content: String },
    #[error("line {line}: unknown action ordinal {ordinal}")]
    UnknownOrdinal { line: usize, ordinal: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub tick: u64,
    pub action: Action,
    /// False when the board rejected the build or clear.
    pub applied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLog {
    records: Vec<ActionRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one issued action.
    pub fn record(&mut self, tick: u64, action: Action, applied: bool) {
        self.records.push(ActionRecord {
            tick,
            action,
            applied,
        });
    }

    /// Records in the order they were issued.
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records the board accepted.
    pub fn applied_count(&self) -> usize {
        self.records.iter().filter(|r| r.applied).count()
    }

    /// The issued actions, applied or not, without their ticks.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.records.iter().map(|r| r.action)
    }

    /// Write the `row col ordinal` text form.
    pub fn write_history<W: Write>(&self, mut out: W) -> io::Result<()> {
        for record in &self.records {
            let at = record.action.position().unwrap_or_default();
            writeln!(out, "{} {} {}", at.row, at.col, record.action.ordinal())?;
        }
        Ok(())
    }
}

/// Parse `row col ordinal` lines. Blank lines are skipped.
pub fn parse_history(text: &str) -> Result<Vec<Action>, ActionLogError> {
    let mut actions = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let malformed = || ActionLogError::Malformed {
            line,
            content: raw.to_string(),
        };
        let fields: Vec<&str> = raw.split_whitespace().collect();
        let [row, col, ordinal] = fields.as_slice() else {
            return Err(malformed());
        };
        let row: i32 = row.parse().map_err(|_| malformed())?;
        let col: i32 = col.parse().map_err(|_| malformed())?;
        let ordinal: u8 = ordinal.parse().map_err(|_| malformed())?;
        let action = Action::from_ordinal(ordinal, CellPosition::new(row, col))
            .ok_or(ActionLogError::UnknownOrdinal { line, ordinal })?;
        actions.push(action);
    }
    Ok(actions)
}
