//! Puzzle engine for the make-100 digit game.
//!
//! This crate generates six-digit puzzles together with one expression
//! over those digits worth exactly 100, and validates player answers
//! against the same rules. Level progression and timed battles are
//! modelled as explicit state on top of the engine.

pub mod battle;
pub mod builder;
pub mod error;
pub mod eval;
pub mod game;
pub mod generator;
pub mod puzzle;
pub mod search;
pub mod validator;

// Re-export main types
pub use battle::{Battle, BattleOutcome, BattleResult, BattleRewards, BattleStatus};
pub use builder::{build_expression, sanitize};
pub use error::{DigitSequenceError, EngineError, GameError};
pub use eval::{evaluate, EvalError};
pub use game::{GameSession, Hint, LevelState, SubmitOutcome};
pub use generator::{find_solution, generate, generate_with_rng, Generator, GeneratorConfig, Solution};
pub use puzzle::{
    allowed_operators, Difficulty, DigitSequence, OperatorPalette, OperatorToken, Puzzle,
    DIGIT_COUNT, OPERATOR_SLOTS, TARGET, TOLERANCE,
};
pub use search::{permutations, OperatorCombinations, Permutations};
pub use validator::{check_answer, hits_target, normalize_display_tokens, uses_digits};
