//! Answer validation.
//!
//! A candidate passes when it uses exactly the puzzle's digits (as a
//! multiset, in any order) and evaluates to 100 within tolerance. Any
//! evaluation failure is a plain `false`.

use smallvec::SmallVec;

use crate::builder::sanitize;
use crate::eval::evaluate;
use crate::puzzle::{DigitSequence, TARGET, TOLERANCE};

/// Check a player's expression against the puzzle digits
pub fn check_answer(digits: &DigitSequence, candidate: &str) -> bool {
    uses_digits(digits, candidate) && reaches_target(candidate)
}

/// Check that the digit characters of `candidate` form the same multiset
/// as the puzzle digits. Order is not checked.
pub fn uses_digits(digits: &DigitSequence, candidate: &str) -> bool {
    let mut used: SmallVec<[u8; 8]> = candidate
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    used.sort_unstable();
    used.as_slice() == digits.sorted().as_slice()
}

/// Sanitize and evaluate `candidate`, then compare against the target
pub fn reaches_target(candidate: &str) -> bool {
    match evaluate(&sanitize(candidate)) {
        Ok(value) => hits_target(value),
        Err(err) => {
            tracing::trace!(candidate, %err, "candidate failed to evaluate");
            false
        }
    }
}

/// Whether `value` is within [`TOLERANCE`] of [`TARGET`]
pub fn hits_target(value: f64) -> bool {
    (value - TARGET).abs() < TOLERANCE
}

/// Map the UI's display operators (`×`, `÷`, `−`) to `*`, `/`, `-`
pub fn normalize_display_tokens(expr: &str) -> String {
    expr.chars()
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(s: &str) -> DigitSequence {
        s.parse().unwrap()
    }

    #[test]
    fn test_accepts_exact_solution() {
        let d = digits("123456");
        assert!(check_answer(&d, "5*4*(6-1)*(3-2)"));
    }

    #[test]
    fn test_rejects_one_character_mutation() {
        let d = digits("123456");
        assert!(!check_answer(&d, "5*4*(6-1)*(3+2)"));
    }

    #[test]
    fn test_rejects_wrong_value() {
        let d = digits("123456");
        assert!(!check_answer(&d, "1+2+3+4+5+6"));
    }

    #[test]
    fn test_rejects_wrong_digits() {
        let d = digits("123456");
        // Worth 100 but uses a 7 instead of the 6
        assert!(reaches_target("(7-2)*5*4*1^3"));
        assert!(!check_answer(&d, "(7-2)*5*4*1^3"));
        assert!(!uses_digits(&d, "1+2+3+4+5+7"));
        assert!(!uses_digits(&d, "1+2+3+4+5"));
        assert!(!uses_digits(&d, "1+2+3+4+5+6+6"));
    }

    #[test]
    fn test_digit_order_is_not_checked() {
        let d = digits("123456");
        assert!(uses_digits(&d, "6+5+4+3+2+1"));
        assert!(check_answer(&d, "(3-2)*(6-1)*4*5"));
    }

    #[test]
    fn test_tolerance_boundary() {
        assert!(hits_target(100.0));
        assert!(hits_target(100.00005));
        assert!(hits_target(99.99995));
        assert!(!hits_target(100.001));
        assert!(!hits_target(f64::NAN));
        assert!(!hits_target(f64::INFINITY));
    }

    #[test]
    fn test_division_by_zero_is_false() {
        let d = digits("123456");
        assert!(!check_answer(&d, "6/0+1+2+3+4+5"));
        assert!(!reaches_target("6/(1-1)+2+3+4+5"));
    }

    #[test]
    fn test_malformed_is_false() {
        let d = digits("123456");
        for candidate in ["", "(((", "1+2+3+4+5+6+", "12)3456", "1**2*3*4*5*6"] {
            assert!(!check_answer(&d, candidate), "{candidate:?} accepted");
        }
    }

    #[test]
    fn test_sanitizes_before_evaluating() {
        let d = digits("123456");
        assert!(check_answer(&d, " 5 * 4 * ( 6 - 1 ) * ( 3 - 2 ) "));
    }

    #[test]
    fn test_power() {
        let d = digits("221945");
        assert!(check_answer(&d, "5^2*4*(2-1)^9"));
        assert!(!check_answer(&d, "5^2*4*(2-1)*9"));
    }

    #[test]
    fn test_display_tokens() {
        assert_eq!(normalize_display_tokens("5×4÷2−1"), "5*4/2-1");
        let d = digits("123456");
        assert!(check_answer(&d, &normalize_display_tokens("5×4×(6−1)×(3−2)")));
    }

    #[test]
    fn test_validator_is_idempotent() {
        let d = digits("123456");
        let candidate = "5*4*(6-1)*(3-2)";
        let first = check_answer(&d, candidate);
        let second = check_answer(&d, candidate);
        assert_eq!(first, second);
    }
}
