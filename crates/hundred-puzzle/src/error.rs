//! Error types surfaced to callers of the engine.
//!
//! Evaluation faults never show up here: the validator folds them into a
//! plain `false` (see [`crate::eval::EvalError`]).

use std::time::Duration;

use thiserror::Error;

/// Failures of puzzle generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Every drawn digit set was searched without finding an expression
    /// worth 100.
    #[error("no solution found after {draws} digit draws")]
    ExhaustedSearch { draws: usize },

    /// The caller's deadline passed before a solution was found.
    #[error("puzzle generation timed out after {elapsed:?}")]
    DeadlineExceeded { elapsed: Duration },
}

/// A digit sequence that is not exactly six digits in `1..=9`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigitSequenceError {
    #[error("expected 6 digits, got {0}")]
    WrongLength(usize),

    #[error("digit {0} is outside 1..=9")]
    OutOfRange(u8),

    #[error("invalid digit character {0:?}")]
    InvalidChar(char),
}

/// Rule violations of the level and battle bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("complete level {current} first")]
    LevelLocked { requested: u64, current: u64 },

    #[error("level {requested} is not the current level ({current})")]
    WrongLevel { requested: u64, current: u64 },

    #[error("level {0} has not been generated")]
    LevelNotFound(u64),

    #[error("hint already used for level {0}")]
    HintAlreadyUsed(u64),

    #[error("battle is not active")]
    BattleNotActive,

    #[error("player {0:?} is not part of this battle")]
    NotAParticipant(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
