//! CLI entry point for the puzzle engine.
//!
//! Usage:
//!   hundred-puzzle generate --difficulty <n> [options]
//!   hundred-puzzle solve <digits> [--difficulty <n>]
//!   hundred-puzzle check <digits> <expression>
//!   hundred-puzzle hint <solution> [--seed <n>]
//!
//! Results are printed as JSON on stdout. Logs go to stderr and are
//! controlled with `RUST_LOG` (default: `warn`).

use std::process;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use hundred_puzzle::game::hint_fragment;
use hundred_puzzle::validator::reaches_target;
use hundred_puzzle::{
    check_answer, find_solution, generate, normalize_display_tokens, uses_digits, Difficulty,
    DigitSequence, GeneratorConfig, Puzzle,
};

#[derive(Parser)]
#[command(name = "hundred-puzzle")]
#[command(about = "Generate and check make-100 digit puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a puzzle with a known solution
    Generate {
        /// Difficulty tier (negative values count as the lowest tier)
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        difficulty: i64,

        /// Seed for reproducible puzzles
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum digit sets drawn before giving up
        #[arg(long, default_value = "50")]
        max_restarts: usize,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Search a fixed set of digits for a solution
    Solve {
        /// Six digits, e.g. 925911
        #[arg(value_name = "DIGITS")]
        digits: DigitSequence,

        /// Difficulty tier selecting the operator palette
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        difficulty: i64,
    },

    /// Check an answer against a set of digits
    Check {
        /// Six digits, e.g. 925911
        #[arg(value_name = "DIGITS")]
        digits: DigitSequence,

        /// Candidate expression; display operators (× ÷ −) are accepted
        #[arg(value_name = "EXPRESSION", allow_hyphen_values = true)]
        expression: String,
    },

    /// Pick a random fragment of a solution to reveal
    Hint {
        #[arg(value_name = "SOLUTION", allow_hyphen_values = true)]
        solution: String,

        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Output format for generation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateOutput {
    #[serde(flatten)]
    puzzle: Puzzle,
    time_elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    digits: DigitSequence,
    solvable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution_digits: Option<DigitSequence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expressions_tested: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput {
    valid: bool,
    uses_digits: bool,
    reaches_target: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HintOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    fragment: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorOutput {
    error: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let success = match cli.command {
        Commands::Generate {
            difficulty,
            seed,
            max_restarts,
            timeout,
        } => {
            let config = GeneratorConfig {
                max_restarts,
                timeout: timeout.map(Duration::from_secs),
                seed,
            };

            let start_time = Instant::now();
            match generate(Difficulty::new(difficulty), &config) {
                Ok(puzzle) => print_json(&GenerateOutput {
                    puzzle,
                    time_elapsed_ms: start_time.elapsed().as_millis() as u64,
                }),
                Err(e) => {
                    print_json(&ErrorOutput {
                        error: e.to_string(),
                    });
                    false
                }
            }
        }

        Commands::Solve { digits, difficulty } => {
            let solution = find_solution(&digits, Difficulty::new(difficulty));
            let solvable = solution.is_some();
            print_json(&SolveOutput {
                digits,
                solvable,
                solution: solution.as_ref().map(|s| s.expression.clone()),
                solution_digits: solution.as_ref().map(|s| s.digits),
                expressions_tested: solution.as_ref().map(|s| s.expressions_tested),
            }) && solvable
        }

        Commands::Check { digits, expression } => {
            let expression = normalize_display_tokens(&expression);
            let valid = check_answer(&digits, &expression);
            print_json(&CheckOutput {
                valid,
                uses_digits: uses_digits(&digits, &expression),
                reaches_target: reaches_target(&expression),
            }) && valid
        }

        Commands::Hint { solution, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let fragment = hint_fragment(&solution, &mut rng);
            let found = fragment.is_some();
            print_json(&HintOutput { fragment }) && found
        }
    };

    // Exit with appropriate code
    process::exit(if success { 0 } else { 1 });
}

/// Pretty-print `value` to stdout, returning whether that succeeded
fn print_json<T: Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            false
        }
    }
}
