//! Parallel count-and-min reduction
//!
//! Counts the elements of an `i32` sequence divisible by a fixed divisor and
//! finds the smallest of them, with three interchangeable strategies:
//! - [`SequentialReducer`]: single pass on the calling thread
//! - [`LockBasedReducer`]: one worker per chunk, partials merged under a mutex
//! - [`LockFreeReducer`]: one worker per chunk, partials merged with atomics and CAS
//!
//! Parallel strategies fork one scoped thread per non-empty chunk and join all of
//! them before returning.

pub mod config;
pub mod constants;
pub mod data;
pub mod error;
mod fork_join;
pub mod lock_free;
pub mod locked;
pub mod partition;
pub mod reduction;
pub mod report;
pub mod sequential;

pub use config::{DataConfig, MinMergeGranularity, ReduceConfig};
pub use error::{ReduceError, ReduceResult};
pub use lock_free::LockFreeReducer;
pub use locked::LockBasedReducer;
pub use partition::{Chunk, Partition, partition};
pub use reduction::{Reduction, is_divisible};
pub use report::{ReportWriter, RunReport, time_reduction};
pub use sequential::SequentialReducer;

use std::{fmt, str::FromStr};

/// A count-and-min reduction over an immutable sequence.
///
/// Implementations never mutate `data` and may be called repeatedly.
pub trait Reducer: Send + Sync + fmt::Debug {
    /// Short strategy name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Number of workers the reducer forks per call.
    fn workers(&self) -> usize;

    /// Reduce `data` to its `(count, min)` pair.
    fn reduce(&self, data: &[i32]) -> ReduceResult<Reduction>;
}

/// Merge strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// No parallelism
    Sequential,
    /// Partials merged under a mutex
    Mutex,
    /// Partials merged with atomic add and CAS
    Atomic,
}

impl Strategy {
    /// Every strategy, baseline first.
    pub const ALL: [Self; 3] = [Self::Sequential, Self::Mutex, Self::Atomic];

    /// Returns the string representation of the strategy.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Mutex => "mutex",
            Self::Atomic => "atomic",
        }
    }

    /// Build the reducer for this strategy from `config`.
    pub fn build(&self, config: &ReduceConfig) -> ReduceResult<Box<dyn Reducer>> {
        config.validate()?;
        Ok(match self {
            Self::Sequential => Box::new(SequentialReducer::new(config.divisor)?),
            Self::Mutex => Box::new(LockBasedReducer::new(config.divisor, config.workers)?),
            Self::Atomic => Box::new(LockFreeReducer::new(
                config.divisor,
                config.workers,
                config.min_merge,
            )?),
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "mutex" => Ok(Self::Mutex),
            "atomic" => Ok(Self::Atomic),
            _ => Err(ReduceError::InvalidConfig { key: "REDUCE_STRATEGIES", value: s.to_string() }),
        }
    }
}
