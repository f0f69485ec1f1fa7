//! Textual expression construction from digits and operator tokens.

use crate::puzzle::{Difficulty, OperatorToken, DIGIT_COUNT, OPERATOR_SLOTS};

/// Difficulty above which a parenthesize token wraps the prefix
const GROUPING_MIN_LEVEL: u64 = 5;

/// Check whether a character may appear in an expression
pub fn is_expression_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '^')
}

/// Strip every character outside `[0-9+\-*/()^]`
pub fn sanitize(expr: &str) -> String {
    expr.chars().filter(|&c| is_expression_char(c)).collect()
}

/// Interleave digits with operator tokens: `d0 op0 d1 op1 ... op4 d5`.
///
/// A [`OperatorToken::Parenthesize`] slot wraps everything built so far
/// in parentheses and emits no operator of its own, so the next digit
/// directly follows the closing parenthesis. Below the grouping level the
/// marker is emitted literally as `()`. Either way the evaluator rejects
/// the juxtaposition, so only arithmetic slots produce valid candidates.
pub fn build_expression(
    digits: &[u8; DIGIT_COUNT],
    operators: &[OperatorToken; OPERATOR_SLOTS],
    difficulty: Difficulty,
) -> String {
    let mut expr = String::with_capacity(2 * DIGIT_COUNT + 4);

    for (&digit, &op) in digits.iter().zip(operators) {
        push_digit(&mut expr, digit);
        if op == OperatorToken::Parenthesize && difficulty.level() > GROUPING_MIN_LEVEL {
            expr = format!("({expr})");
        } else {
            expr.push_str(op.symbol());
        }
    }
    push_digit(&mut expr, digits[DIGIT_COUNT - 1]);

    sanitize(&expr)
}

fn push_digit(expr: &mut String, digit: u8) {
    if let Some(c) = char::from_digit(u32::from(digit), 10) {
        expr.push(c);
    }
}
