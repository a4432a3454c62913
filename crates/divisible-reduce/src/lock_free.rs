//! Parallel reducer that merges through atomics, never blocking on a lock.
//!
//! The count is merged with a single `fetch_add` per worker. The minimum is
//! merged with a compare-and-swap retry loop, either once per worker with the
//! chunk's local minimum or once per divisible element, see
//! [`MinMergeGranularity`].

use crate::{
    Reducer,
    config::MinMergeGranularity,
    constants::{LOG_TARGET, MIN_SENTINEL},
    error::{ReduceError, ReduceResult},
    fork_join::fork_join,
    reduction::{Reduction, is_divisible, scan},
};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Shared result as two independently atomic fields.
///
/// There is no cross-field atomicity; each field is only meaningful once all
/// workers have been joined.
#[derive(Debug)]
struct SharedResult {
    count: AtomicU64,
    /// Holds [`MIN_SENTINEL`] until some worker merges a value
    min: AtomicI64,
}

impl SharedResult {
    const fn new() -> Self {
        Self { count: AtomicU64::new(0), min: AtomicI64::new(MIN_SENTINEL) }
    }

    fn add_count(&self, count: u64) {
        if count > 0 {
            self.count.fetch_add(count, Ordering::Relaxed);
        }
    }

    /// Lower the shared minimum to `candidate` if it is smaller.
    ///
    /// Returns how many CAS attempts failed before the loop settled. The shared
    /// value only ever decreases, so every failure means another worker made
    /// progress and the loop ends once `candidate` is no longer smaller or the
    /// swap lands.
    fn lower_min(&self, candidate: i32) -> u64 {
        let candidate = i64::from(candidate);
        let mut current = self.min.load(Ordering::Relaxed);
        let mut retries = 0;

        while candidate < current {
            match self.min.compare_exchange_weak(
                current,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => {
                    current = observed;
                    retries += 1;
                }
            }
        }

        retries
    }

    /// Read the final pair. Thread joins order every merge before this load.
    fn into_reduction(self) -> Reduction {
        // The sentinel is the only stored value outside the i32 range.
        Reduction {
            count: self.count.into_inner(),
            min: i32::try_from(self.min.into_inner()).ok(),
        }
    }
}

/// One worker per chunk, merging into [`SharedResult`] with atomics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockFreeReducer {
    divisor: i32,
    workers: usize,
    min_merge: MinMergeGranularity,
}

impl LockFreeReducer {
    /// Create a reducer. Fails on a zero divisor or zero workers.
    pub const fn new(
        divisor: i32,
        workers: usize,
        min_merge: MinMergeGranularity,
    ) -> ReduceResult<Self> {
        if divisor == 0 {
            return Err(ReduceError::ZeroDivisor);
        }
        if workers == 0 {
            return Err(ReduceError::ZeroWorkers);
        }
        Ok(Self { divisor, workers, min_merge })
    }

    /// Scan `values`, merging the minimum after the whole chunk.
    fn merge_per_chunk(&self, shared: &SharedResult, values: &[i32]) -> (Reduction, u64) {
        let local = scan(values, self.divisor);
        shared.add_count(local.count);
        let retries = local.min.map_or(0, |min| shared.lower_min(min));
        (local, retries)
    }

    /// Scan `values`, merging the minimum every time a divisible value shows up.
    fn merge_per_element(&self, shared: &SharedResult, values: &[i32]) -> (Reduction, u64) {
        let mut local = Reduction::default();
        let mut retries = 0;
        for &value in values {
            if is_divisible(value, self.divisor) {
                local.absorb(value);
                retries += shared.lower_min(value);
            }
        }
        shared.add_count(local.count);
        (local, retries)
    }
}

impl Reducer for LockFreeReducer {
    fn name(&self) -> &'static str {
        match self.min_merge {
            MinMergeGranularity::PerChunk => "atomic",
            MinMergeGranularity::PerElement => "atomic-per-element",
        }
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn reduce(&self, data: &[i32]) -> ReduceResult<Reduction> {
        if data.is_empty() {
            return Err(ReduceError::EmptyInput);
        }

        let shared = SharedResult::new();

        fork_join(data, self.workers, |chunk, values| {
            let (local, retries) = match self.min_merge {
                MinMergeGranularity::PerChunk => self.merge_per_chunk(&shared, values),
                MinMergeGranularity::PerElement => self.merge_per_element(&shared, values),
            };

            tracing::debug!(
                target: LOG_TARGET,
                worker = chunk.index,
                start = chunk.start,
                end = chunk.end,
                count = local.count,
                min = ?local.min,
                cas_retries = retries,
                "Merged partial with atomics"
            );
            Ok(())
        })?;

        let result = shared.into_reduction();
        tracing::info!(
            target: LOG_TARGET,
            strategy = self.name(),
            workers = self.workers,
            min_merge = self.min_merge.as_str(),
            len = data.len(),
            count = result.count,
            min = ?result.min,
            "Reduction finished"
        );
        Ok(result)
    }
}
