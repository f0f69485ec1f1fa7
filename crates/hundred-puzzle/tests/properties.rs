//! End-to-end properties of the engine's public API.

use hundred_puzzle::{
    allowed_operators, check_answer, generate, Difficulty, DigitSequence, GeneratorConfig,
};

fn digits(s: &str) -> DigitSequence {
    s.parse().unwrap()
}

#[test]
fn generated_puzzles_round_trip() {
    for (level, seed) in [(1, 100), (11, 200), (21, 300), (0, 400), (-5, 500)] {
        let config = GeneratorConfig {
            seed: Some(seed),
            ..Default::default()
        };
        let puzzle = generate(Difficulty::new(level), &config).unwrap();
        assert!(
            check_answer(&puzzle.digits, &puzzle.solution),
            "level {level}: {} does not solve {}",
            puzzle.solution,
            puzzle.digits
        );
        assert!(puzzle.check(&puzzle.solution));
    }
}

#[test]
fn palettes_are_monotonic() {
    let low = allowed_operators(Difficulty::new(10));
    let mid = allowed_operators(Difficulty::new(11));
    let high = allowed_operators(Difficulty::new(21));
    assert!(low.is_subset_of(&mid));
    assert!(mid.is_subset_of(&high));
    assert!(!mid.is_subset_of(&low));
    assert!(!high.is_subset_of(&mid));
}

#[test]
fn wrong_digits_are_rejected_whatever_the_value() {
    let puzzle = digits("123456");
    assert!(!check_answer(&puzzle, "(7-2)*5*4*1^3"));
    assert!(!check_answer(&puzzle, "1+2+3+4+5+7"));
}

#[test]
fn division_by_zero_is_rejected() {
    assert!(!check_answer(&digits("123456"), "6/0+1+2+3+4+5"));
    assert!(!check_answer(&digits("612345"), "6/(1-1)+2+3+4+5"));
}

#[test]
fn known_answer_and_mutation() {
    let puzzle = digits("123456");
    assert!(!check_answer(&puzzle, "1+2+3+4+5+6"));
    assert!(check_answer(&puzzle, "5*4*(6-1)*(3-2)"));
    assert!(!check_answer(&puzzle, "5*4*(6+1)*(3-2)"));
}

#[test]
fn validator_is_pure() {
    let puzzle = digits("925911");
    for candidate in ["9*2*5+9+1*1", "9*2*5+9+1+1", "((", ""] {
        let first = check_answer(&puzzle, candidate);
        for _ in 0..3 {
            assert_eq!(check_answer(&puzzle, candidate), first);
        }
    }
    assert!(check_answer(&puzzle, "9*2*5+9+1*1"));
}
