//! Puzzle generation by exhaustive search over a random digit draw.
//!
//! Each draw is searched over all 720 digit orderings times every operator
//! combination from the difficulty's palette. The first expression within
//! tolerance of 100 wins. A draw without any solution is discarded and a
//! new one is made, up to a configurable cap and optional deadline.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::builder::build_expression;
use crate::error::EngineError;
use crate::eval::evaluate;
use crate::puzzle::{allowed_operators, Difficulty, DigitSequence, Puzzle, DIGIT_COUNT};
use crate::search::{can_evaluate, permutations, OperatorCombinations};
use crate::validator::hits_target;

/// Configuration for the generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Maximum number of digit sets drawn before giving up
    pub max_restarts: usize,
    /// Wall-clock budget for one generation call
    pub timeout: Option<Duration>,
    /// Seed for reproducible draws
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_restarts: 50,
            timeout: None,
            seed: None,
        }
    }
}

/// A solved ordering of some digit draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// The digits in the order the expression uses them
    pub digits: DigitSequence,
    pub expression: String,
    /// Candidate expressions evaluated before this one was found
    pub expressions_tested: usize,
}

/// Stateful puzzle source owning its random number generator.
///
/// Callers that generate many puzzles (one per level, one per battle)
/// keep a `Generator` around; a seeded config makes the sequence of
/// puzzles reproducible.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a puzzle at the given difficulty
    pub fn puzzle(&mut self, difficulty: Difficulty) -> Result<Puzzle, EngineError> {
        generate_with_rng(difficulty, &self.config, &mut self.rng)
    }

    /// Access the generator's RNG for related draws (hint selection)
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

/// Generate a puzzle, seeding from `config.seed` or the OS.
pub fn generate(difficulty: Difficulty, config: &GeneratorConfig) -> Result<Puzzle, EngineError> {
    Generator::new(config.clone()).puzzle(difficulty)
}

/// Generate a puzzle drawing digits from `rng`.
pub fn generate_with_rng<R: Rng + ?Sized>(
    difficulty: Difficulty,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Puzzle, EngineError> {
    let start_time = Instant::now();
    let deadline = config.timeout.map(|timeout| start_time + timeout);

    for draw in 1..=config.max_restarts {
        let digits = DigitSequence::random(rng);
        tracing::debug!(%difficulty, draw, %digits, "searching digit draw");

        match search(&digits, difficulty, deadline) {
            SearchOutcome::Found(solution) => {
                tracing::info!(
                    %difficulty,
                    draws = draw,
                    tested = solution.expressions_tested,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    solution = %solution.expression,
                    "generated puzzle"
                );
                return Ok(Puzzle {
                    difficulty,
                    digits: solution.digits,
                    solution: solution.expression,
                });
            }
            SearchOutcome::Exhausted => tracing::debug!(%digits, "digit draw has no solution"),
            SearchOutcome::TimedOut => {
                let elapsed = start_time.elapsed();
                tracing::warn!(%difficulty, draws = draw, ?elapsed, "puzzle search timed out");
                return Err(EngineError::DeadlineExceeded { elapsed });
            }
        }
    }

    tracing::warn!(%difficulty, draws = config.max_restarts, "puzzle search exhausted");
    Err(EngineError::ExhaustedSearch {
        draws: config.max_restarts,
    })
}

/// Search a fixed digit set for an expression worth 100.
///
/// Returns `None` when no ordering and operator combination from the
/// difficulty's palette hits the target.
pub fn find_solution(digits: &DigitSequence, difficulty: Difficulty) -> Option<Solution> {
    match search(digits, difficulty, None) {
        SearchOutcome::Found(solution) => Some(solution),
        SearchOutcome::Exhausted | SearchOutcome::TimedOut => None,
    }
}

enum SearchOutcome {
    Found(Solution),
    Exhausted,
    TimedOut,
}

fn search(digits: &DigitSequence, difficulty: Difficulty, deadline: Option<Instant>) -> SearchOutcome {
    let palette = allowed_operators(difficulty);
    let mut expressions_tested: usize = 0;
    let mut seen: HashSet<[u8; DIGIT_COUNT]> = HashSet::new();

    // Repeated digits yield repeated orderings; each is searched once
    for ordering in permutations(*digits.digits()).filter(|o| seen.insert(*o)) {
        // Checked once per ordering; one ordering is at most 5^5 candidates
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return SearchOutcome::TimedOut;
        }

        for operators in OperatorCombinations::new(palette.tokens()).filter(can_evaluate) {
            expressions_tested += 1;
            let expression = build_expression(&ordering, &operators, difficulty);
            if matches!(evaluate(&expression), Ok(value) if hits_target(value)) {
                return SearchOutcome::Found(Solution {
                    digits: digits.reordered(ordering),
                    expression,
                    expressions_tested,
                });
            }
        }
    }

    SearchOutcome::Exhausted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::check_answer;

    fn seeded(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_generated_solution_validates() {
        for level in [1, 11, 21] {
            let puzzle = generate(Difficulty::new(level), &seeded(level as u64)).unwrap();
            assert_eq!(puzzle.difficulty.level(), level as u64);
            assert!(
                check_answer(&puzzle.digits, &puzzle.solution),
                "{} does not solve {}",
                puzzle.solution,
                puzzle.digits
            );
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate(Difficulty::new(4), &seeded(42)).unwrap();
        let b = generate(Difficulty::new(4), &seeded(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generator_yields_a_sequence() {
        let mut generator = Generator::new(seeded(7));
        let first = generator.puzzle(Difficulty::new(2)).unwrap();
        let second = generator.puzzle(Difficulty::new(2)).unwrap();
        assert!(first.check(&first.solution));
        assert!(second.check(&second.solution));
    }

    #[test]
    fn test_find_solution_known_digits() {
        let digits: DigitSequence = "925911".parse().unwrap();
        let solution = find_solution(&digits, Difficulty::new(1)).unwrap();
        assert_eq!(solution.digits.sorted(), digits.sorted());
        assert!(check_answer(&digits, &solution.expression));
        assert!(solution.expressions_tested >= 1);
    }

    #[test]
    fn test_find_solution_unsolvable_digits() {
        // No ordering of 1..=6 with + - * / reaches 100 without grouping
        let digits: DigitSequence = "123456".parse().unwrap();
        assert_eq!(find_solution(&digits, Difficulty::new(1)), None);
    }

    #[test]
    fn test_zero_restarts_exhausts() {
        let config = GeneratorConfig {
            max_restarts: 0,
            ..seeded(1)
        };
        assert_eq!(
            generate(Difficulty::new(1), &config),
            Err(EngineError::ExhaustedSearch { draws: 0 })
        );
    }

    #[test]
    fn test_zero_timeout_is_exceeded() {
        let config = GeneratorConfig {
            timeout: Some(Duration::ZERO),
            ..seeded(1)
        };
        assert!(matches!(
            generate(Difficulty::new(1), &config),
            Err(EngineError::DeadlineExceeded { .. })
        ));
    }
}
