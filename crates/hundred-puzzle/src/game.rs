//! Single-player level progression.
//!
//! [`GameSession`] is the explicit state the backend keeps per player:
//! score, trophies, unlocked levels and one [`LevelState`] per generated
//! level. Storage is the caller's concern; every transition here is a
//! plain method over that state.

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::generator::Generator;
use crate::puzzle::{Difficulty, DigitSequence};

/// Attempts per level before the solution is revealed
pub const MAX_ATTEMPTS: u32 = 3;

/// Points deducted for a hint (never below zero)
pub const HINT_COST: u64 = 20;

const BASE_POINTS: u64 = 100;
const POINTS_PER_LEVEL: u64 = 20;
const RETRY_POINT_PENALTY: u64 = 10;
const MIN_POINTS: u64 = 10;
const FIRST_TRY_TROPHIES: u64 = 7;
const RETRY_TROPHY_BASE: u64 = 5;

/// Points for solving `level` on the given attempt (1-based)
pub fn points_for(level: u64, attempts: u32) -> u64 {
    let base = BASE_POINTS + level * POINTS_PER_LEVEL;
    let penalty = u64::from(attempts.saturating_sub(1)) * RETRY_POINT_PENALTY;
    base.saturating_sub(penalty).max(MIN_POINTS)
}

/// Trophies for solving on the given attempt (1-based)
pub fn trophies_for(attempts: u32) -> u64 {
    if attempts <= 1 {
        FIRST_TRY_TROPHIES
    } else {
        RETRY_TROPHY_BASE.saturating_sub(u64::from(attempts - 1))
    }
}

/// Split a solution into the fragments a hint may reveal: number runs and
/// `+ - * / ( )`.
pub fn hint_fragments(solution: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut chars = solution.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_ascii_digit() {
            let mut end = start + 1;
            while let Some(&(i, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                end = i + 1;
                chars.next();
            }
            fragments.push(&solution[start..end]);
        } else if matches!(c, '+' | '-' | '*' | '/' | '(' | ')') {
            fragments.push(&solution[start..start + 1]);
        }
    }

    fragments
}

/// Pick one random fragment of a solution
pub fn hint_fragment<R: Rng + ?Sized>(solution: &str, rng: &mut R) -> Option<String> {
    hint_fragments(solution).choose(rng).map(|s| s.to_string())
}

/// Per-level record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelState {
    pub digits: DigitSequence,
    pub solution: String,
    pub attempts: u32,
    pub solved: bool,
    pub best_score: u64,
    #[serde(default)]
    pub hint_used: bool,
    #[serde(default)]
    pub quit: bool,
}

/// Result of submitting an answer for the current level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubmitOutcome {
    /// Correct; the next level is unlocked
    #[serde(rename_all = "camelCase")]
    Solved {
        points_earned: u64,
        trophies_awarded: u64,
        current_level: u64,
    },
    /// Out of attempts; the level stays current
    Failed { solution: String },
    /// Wrong; one trophy deducted
    #[serde(rename_all = "camelCase")]
    Retry { attempts_remaining: u32 },
}

/// A revealed hint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub fragment: String,
    pub points_deducted: u64,
}

/// One player's progression state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub current_level: u64,
    pub unlocked_levels: Vec<u64>,
    pub score: u64,
    pub trophies: u64,
    pub is_paused: bool,
    pub levels: BTreeMap<u64, LevelState>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            current_level: 1,
            unlocked_levels: vec![1],
            score: 0,
            trophies: 0,
            is_paused: false,
            levels: BTreeMap::new(),
        }
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a level, generating its puzzle on first access.
    ///
    /// Levels above the current one are locked.
    pub fn level(&mut self, level: u64, generator: &mut Generator) -> Result<&LevelState, GameError> {
        if level > self.current_level {
            return Err(GameError::LevelLocked {
                requested: level,
                current: self.current_level,
            });
        }
        self.ensure_level(level, generator)
    }

    /// Submit an answer for the current level
    pub fn submit(
        &mut self,
        level: u64,
        expression: &str,
        generator: &mut Generator,
    ) -> Result<SubmitOutcome, GameError> {
        self.require_current(level)?;
        self.ensure_level(level, generator)?;

        let current_level = self.current_level;
        let state = self
            .levels
            .get_mut(&level)
            .ok_or(GameError::LevelNotFound(level))?;
        state.attempts += 1;
        let attempts = state.attempts;

        if crate::validator::check_answer(&state.digits, expression) {
            let points_earned = points_for(level, attempts);
            let trophies_awarded = trophies_for(attempts);
            state.solved = true;
            state.best_score = state.best_score.max(points_earned);

            let next = current_level + 1;
            self.current_level = next;
            self.unlocked_levels = (1..=next).collect();
            self.score += points_earned;
            self.trophies += trophies_awarded;

            tracing::info!(level, attempts, points_earned, trophies_awarded, "level solved");
            return Ok(SubmitOutcome::Solved {
                points_earned,
                trophies_awarded,
                current_level: next,
            });
        }

        if attempts >= MAX_ATTEMPTS {
            state.solved = false;
            tracing::info!(level, attempts, "level failed, revealing solution");
            return Ok(SubmitOutcome::Failed {
                solution: state.solution.clone(),
            });
        }

        self.trophies = self.trophies.saturating_sub(1);
        tracing::debug!(level, attempts, "wrong answer");
        Ok(SubmitOutcome::Retry {
            attempts_remaining: MAX_ATTEMPTS - attempts % MAX_ATTEMPTS,
        })
    }

    /// Reveal a fragment of the current level's solution, once per level.
    pub fn hint(&mut self, level: u64, generator: &mut Generator) -> Result<Hint, GameError> {
        self.require_current(level)?;
        let state = self
            .levels
            .get_mut(&level)
            .ok_or(GameError::LevelNotFound(level))?;
        if state.hint_used {
            return Err(GameError::HintAlreadyUsed(level));
        }

        let fragment = hint_fragment(&state.solution, generator.rng())
            .ok_or(GameError::LevelNotFound(level))?;
        let points_deducted = HINT_COST.min(self.score);
        self.score -= points_deducted;
        state.hint_used = true;

        Ok(Hint {
            fragment,
            points_deducted,
        })
    }

    /// Give up on the current level and reveal its solution
    pub fn quit(&mut self, level: u64) -> Result<String, GameError> {
        self.require_current(level)?;
        let state = self
            .levels
            .get_mut(&level)
            .ok_or(GameError::LevelNotFound(level))?;
        state.quit = true;
        Ok(state.solution.clone())
    }

    pub fn pause(&mut self) {
        self.is_paused = true;
    }

    pub fn resume(&mut self) {
        self.is_paused = false;
    }

    fn require_current(&self, level: u64) -> Result<(), GameError> {
        if level != self.current_level {
            return Err(GameError::WrongLevel {
                requested: level,
                current: self.current_level,
            });
        }
        Ok(())
    }

    fn ensure_level(&mut self, level: u64, generator: &mut Generator) -> Result<&LevelState, GameError> {
        if !self.levels.contains_key(&level) {
            let puzzle = generator.puzzle(Difficulty::from(level))?;
            self.levels.insert(
                level,
                LevelState {
                    digits: puzzle.digits,
                    solution: puzzle.solution,
                    attempts: 0,
                    solved: false,
                    best_score: 0,
                    hint_used: false,
                    quit: false,
                },
            );
        }
        self.levels.get(&level).ok_or(GameError::LevelNotFound(level))
    }
}
