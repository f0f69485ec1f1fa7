//! Puzzle representation types.
//!
//! These types serialize to the JSON shape the game backend stores per
//! level and per battle, so callers can persist a [`Puzzle`] as-is.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DigitSequenceError;

/// Number of digits in every puzzle
pub const DIGIT_COUNT: usize = 6;

/// Number of operator slots between the digits
pub const OPERATOR_SLOTS: usize = DIGIT_COUNT - 1;

/// Value every solution must reach
pub const TARGET: f64 = 100.0;

/// Absolute tolerance when comparing against [`TARGET`]
pub const TOLERANCE: f64 = 1e-4;

/// Difficulty tier. Negative input clamps to the lowest tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(u64);

impl Difficulty {
    pub fn new(level: i64) -> Self {
        Self(level.max(0).unsigned_abs())
    }

    pub fn level(self) -> u64 {
        self.0
    }

    /// Operators available at this tier
    pub fn palette(self) -> OperatorPalette {
        allowed_operators(self)
    }
}

impl From<u64> for Difficulty {
    fn from(level: u64) -> Self {
        Self(level)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A token placed between two digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorToken {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Wraps everything built so far in parentheses
    Parenthesize,
    Power,
}

impl OperatorToken {
    /// Textual form used when building expressions
    pub fn symbol(self) -> &'static str {
        match self {
            OperatorToken::Add => "+",
            OperatorToken::Subtract => "-",
            OperatorToken::Multiply => "*",
            OperatorToken::Divide => "/",
            OperatorToken::Parenthesize => "()",
            OperatorToken::Power => "^",
        }
    }
}

const BASIC: &[OperatorToken] = &[
    OperatorToken::Add,
    OperatorToken::Subtract,
    OperatorToken::Multiply,
    OperatorToken::Divide,
];

const GROUPED: &[OperatorToken] = &[
    OperatorToken::Add,
    OperatorToken::Subtract,
    OperatorToken::Multiply,
    OperatorToken::Divide,
    OperatorToken::Parenthesize,
];

const FULL: &[OperatorToken] = &[
    OperatorToken::Add,
    OperatorToken::Subtract,
    OperatorToken::Multiply,
    OperatorToken::Divide,
    OperatorToken::Parenthesize,
    OperatorToken::Power,
];

/// The set of operator tokens allowed at some difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorPalette(&'static [OperatorToken]);

impl OperatorPalette {
    pub fn tokens(&self) -> &'static [OperatorToken] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, token: OperatorToken) -> bool {
        self.0.contains(&token)
    }

    pub fn is_subset_of(&self, other: &OperatorPalette) -> bool {
        self.0.iter().all(|&token| other.contains(token))
    }
}

/// Resolve the operator palette for a difficulty tier.
///
/// Tiers up to 10 get the four arithmetic operators, tiers up to 20 add
/// parenthesization, and anything above adds exponentiation.
pub fn allowed_operators(difficulty: Difficulty) -> OperatorPalette {
    match difficulty.level() {
        0..=10 => OperatorPalette(BASIC),
        11..=20 => OperatorPalette(GROUPED),
        _ => OperatorPalette(FULL),
    }
}

/// Six digits in `1..=9`, repeats allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DigitSequence([u8; DIGIT_COUNT]);

impl DigitSequence {
    pub fn new(digits: [u8; DIGIT_COUNT]) -> Result<Self, DigitSequenceError> {
        if let Some(&bad) = digits.iter().find(|d| !(1..=9).contains(*d)) {
            return Err(DigitSequenceError::OutOfRange(bad));
        }
        Ok(Self(digits))
    }

    /// Draw six independent digits uniformly from `1..=9`
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(std::array::from_fn(|_| rng.random_range(1..=9)))
    }

    pub fn digits(&self) -> &[u8; DIGIT_COUNT] {
        &self.0
    }

    /// The same digits in another order. `ordering` must be a permutation
    /// of these digits.
    pub(crate) fn reordered(&self, ordering: [u8; DIGIT_COUNT]) -> Self {
        debug_assert_eq!(Self(ordering).sorted(), self.sorted());
        Self(ordering)
    }

    /// The digits as a sorted multiset
    pub fn sorted(&self) -> [u8; DIGIT_COUNT] {
        let mut sorted = self.0;
        sorted.sort_unstable();
        sorted
    }
}

impl TryFrom<Vec<u8>> for DigitSequence {
    type Error = DigitSequenceError;

    fn try_from(digits: Vec<u8>) -> Result<Self, Self::Error> {
        let digits: [u8; DIGIT_COUNT] = digits
            .try_into()
            .map_err(|v: Vec<u8>| DigitSequenceError::WrongLength(v.len()))?;
        Self::new(digits)
    }
}

impl From<DigitSequence> for Vec<u8> {
    fn from(digits: DigitSequence) -> Self {
        digits.0.to_vec()
    }
}

/// Parses the compact form used on the command line, e.g. `"123456"`.
impl FromStr for DigitSequence {
    type Err = DigitSequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|d| d as u8)
                    .ok_or(DigitSequenceError::InvalidChar(c))
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Self::try_from(digits)
    }
}

impl fmt::Display for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.0 {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

/// A generated puzzle: the digits plus one expression over them worth 100.
///
/// `digits` are kept in the order the solution uses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub difficulty: Difficulty,
    pub digits: DigitSequence,
    pub solution: String,
}

impl Puzzle {
    /// Validate a player's answer against this puzzle's digits
    pub fn check(&self, candidate: &str) -> bool {
        crate::validator::check_answer(&self.digits, candidate)
    }
}
