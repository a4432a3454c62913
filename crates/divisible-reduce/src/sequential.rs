//! Single-threaded baseline.

use crate::{
    Reducer,
    constants::LOG_TARGET,
    error::{ReduceError, ReduceResult},
    reduction::{Reduction, scan},
};

/// Scans the whole sequence on the calling thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialReducer {
    divisor: i32,
}

impl SequentialReducer {
    /// Create a reducer for `divisor`, which must be non-zero.
    pub const fn new(divisor: i32) -> ReduceResult<Self> {
        if divisor == 0 {
            return Err(ReduceError::ZeroDivisor);
        }
        Ok(Self { divisor })
    }
}

impl Reducer for SequentialReducer {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn workers(&self) -> usize {
        1
    }

    fn reduce(&self, data: &[i32]) -> ReduceResult<Reduction> {
        if data.is_empty() {
            return Err(ReduceError::EmptyInput);
        }

        let result = scan(data, self.divisor);
        tracing::info!(
            target: LOG_TARGET,
            strategy = self.name(),
            len = data.len(),
            count = result.count,
            min = ?result.min,
            "Reduction finished"
        );
        Ok(result)
    }
}
