//! Search space enumeration for the generator.
//!
//! Both enumerators are lazy and yield owned copies, so a consumer can
//! keep any yielded ordering without it changing under it. Creating a new
//! enumerator over the same input restarts the same sequence.

use crate::puzzle::{OperatorToken, OPERATOR_SLOTS};

/// All orderings of a fixed-size array, in Heap's algorithm order.
///
/// Repeated elements yield repeated orderings; `N!` items are produced.
#[derive(Debug, Clone)]
pub struct Permutations<T, const N: usize> {
    items: [T; N],
    counters: [usize; N],
    index: usize,
    started: bool,
}

impl<T: Copy, const N: usize> Permutations<T, N> {
    pub fn new(items: [T; N]) -> Self {
        Self {
            items,
            counters: [0; N],
            index: 1,
            started: false,
        }
    }
}

impl<T: Copy, const N: usize> Iterator for Permutations<T, N> {
    type Item = [T; N];

    fn next(&mut self) -> Option<[T; N]> {
        if !self.started {
            self.started = true;
            return Some(self.items);
        }

        while self.index < N {
            let i = self.index;
            if self.counters[i] < i {
                if i % 2 == 0 {
                    self.items.swap(0, i);
                } else {
                    self.items.swap(self.counters[i], i);
                }
                self.counters[i] += 1;
                self.index = 1;
                return Some(self.items);
            }
            self.counters[i] = 0;
            self.index += 1;
        }
        None
    }
}

/// Lazily enumerate every ordering of `items`
pub fn permutations<T: Copy, const N: usize>(items: [T; N]) -> Permutations<T, N> {
    Permutations::new(items)
}

/// Every sequence of [`OPERATOR_SLOTS`] tokens drawn with repetition from
/// a palette (the palette's Cartesian power). The last slot varies
/// fastest.
#[derive(Debug, Clone)]
pub struct OperatorCombinations<'a> {
    palette: &'a [OperatorToken],
    indices: [usize; OPERATOR_SLOTS],
    done: bool,
}

impl<'a> OperatorCombinations<'a> {
    pub fn new(palette: &'a [OperatorToken]) -> Self {
        Self {
            palette,
            indices: [0; OPERATOR_SLOTS],
            done: palette.is_empty(),
        }
    }

    /// Total number of combinations for this palette
    pub fn total(&self) -> usize {
        self.palette.len().pow(OPERATOR_SLOTS as u32)
    }

    fn advance(&mut self) {
        for slot in (0..OPERATOR_SLOTS).rev() {
            self.indices[slot] += 1;
            if self.indices[slot] < self.palette.len() {
                return;
            }
            self.indices[slot] = 0;
        }
        self.done = true;
    }
}

impl Iterator for OperatorCombinations<'_> {
    type Item = [OperatorToken; OPERATOR_SLOTS];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let combination = self.indices.map(|i| self.palette[i]);
        self.advance();
        Some(combination)
    }
}

/// Whether an operator combination can produce a well-formed expression.
///
/// A parenthesize slot always leaves a group directly followed by a digit
/// (or a literal `()`), which never evaluates, so such combinations can be
/// skipped without changing which candidate is found first.
pub fn can_evaluate(operators: &[OperatorToken; OPERATOR_SLOTS]) -> bool {
    !operators.contains(&OperatorToken::Parenthesize)
}
