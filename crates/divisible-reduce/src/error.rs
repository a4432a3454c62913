//! Errors surfaced by the reducers and their configuration.

/// Result alias used across the crate.
pub type ReduceResult<T> = Result<T, ReduceError>;

/// Everything that can make a reduction call fail.
///
/// Configuration problems are always reported before any worker is spawned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReduceError {
    /// The divisor was zero.
    #[error("divisor must be non-zero")]
    ZeroDivisor,
    /// The worker count was zero.
    #[error("worker count must be at least 1")]
    ZeroWorkers,
    /// The input sequence had no elements.
    #[error("input sequence is empty")]
    EmptyInput,
    /// A configuration value could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig {
        /// Environment key that was read
        key: &'static str,
        /// Raw value found
        value: String,
    },
    /// The operating system refused to start a worker thread.
    #[error("failed to spawn worker {worker}")]
    SpawnFailed {
        /// Index of the chunk that got no thread
        worker: usize,
    },
    /// A worker panicked before finishing its chunk.
    #[error("worker {worker} panicked during reduction")]
    WorkerPanicked {
        /// Index of the worker's chunk
        worker: usize,
    },
    /// The shared result lock was poisoned by another worker.
    #[error("shared result lock poisoned")]
    LockPoisoned,
}
