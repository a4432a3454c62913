//! The `(count, min)` pair and the scan that produces it.

use serde::{Deserialize, Serialize};

/// Count of divisible elements and the smallest of them.
///
/// Used both for a worker's local partial and for the final answer. `min` is
/// `None` when no element was divisible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reduction {
    /// Number of divisible elements
    pub count: u64,
    /// Smallest divisible element, if any
    pub min: Option<i32>,
}

impl Reduction {
    /// Fold one divisible value in.
    #[inline]
    pub fn absorb(&mut self, value: i32) {
        self.count += 1;
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
    }

    /// Combine two partials. Commutative and associative.
    pub fn merge(self, other: Self) -> Self {
        let min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self { count: self.count + other.count, min }
    }

    /// Whether no divisible element was found.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Divisibility predicate, total over all `i32` (`i32::MIN % -1` included).
#[inline]
pub const fn is_divisible(value: i32, divisor: i32) -> bool {
    value.wrapping_rem(divisor) == 0
}

/// Single pass over `values`. The caller guarantees `divisor != 0`.
pub(crate) fn scan(values: &[i32], divisor: i32) -> Reduction {
    let mut partial = Reduction::default();
    for &value in values {
        if is_divisible(value, divisor) {
            partial.absorb(value);
        }
    }
    partial
}
