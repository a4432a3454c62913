//! Parallel reducer that merges worker partials under a mutex.

use crate::{
    Reducer,
    constants::LOG_TARGET,
    error::{ReduceError, ReduceResult},
    fork_join::fork_join,
    reduction::{Reduction, scan},
};
use std::sync::Mutex;

/// One worker per chunk; each scans without touching shared state, then takes
/// the lock exactly once to fold its partial into the shared result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockBasedReducer {
    divisor: i32,
    workers: usize,
}

impl LockBasedReducer {
    /// Create a reducer. Fails on a zero divisor or zero workers.
    pub const fn new(divisor: i32, workers: usize) -> ReduceResult<Self> {
        if divisor == 0 {
            return Err(ReduceError::ZeroDivisor);
        }
        if workers == 0 {
            return Err(ReduceError::ZeroWorkers);
        }
        Ok(Self { divisor, workers })
    }
}

impl Reducer for LockBasedReducer {
    fn name(&self) -> &'static str {
        "mutex"
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn reduce(&self, data: &[i32]) -> ReduceResult<Reduction> {
        if data.is_empty() {
            return Err(ReduceError::EmptyInput);
        }

        let shared = Mutex::new(Reduction::default());

        fork_join(data, self.workers, |chunk, values| {
            let local = scan(values, self.divisor);

            let mut guard = shared.lock().map_err(|_| ReduceError::LockPoisoned)?;
            *guard = guard.merge(local);
            drop(guard);

            tracing::debug!(
                target: LOG_TARGET,
                worker = chunk.index,
                start = chunk.start,
                end = chunk.end,
                count = local.count,
                min = ?local.min,
                "Merged partial under lock"
            );
            Ok(())
        })?;

        let result = shared.into_inner().map_err(|_| ReduceError::LockPoisoned)?;
        tracing::info!(
            target: LOG_TARGET,
            strategy = self.name(),
            workers = self.workers,
            len = data.len(),
            count = result.count,
            min = ?result.min,
            "Reduction finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequential::SequentialReducer;

    #[test]
    fn test_concrete_scenarios() {
        let reducer = LockBasedReducer::new(19, 2).unwrap();
        assert_eq!(
            reducer.reduce(&[19, 38, 5, 57, 100]).unwrap(),
            Reduction { count: 3, min: Some(19) }
        );
        assert_eq!(reducer.reduce(&[1, 2, 3]).unwrap(), Reduction::default());
    }

    #[test]
    fn test_matches_sequential_for_any_worker_count() {
        let data: Vec<i32> = (0..50_000).map(|i| (i * 7919) % 100_003 - 50_000).collect();
        let expected = SequentialReducer::new(19).unwrap().reduce(&data).unwrap();

        for workers in [1, 2, 3, 16, 64, 100_000] {
            let reducer = LockBasedReducer::new(19, workers).unwrap();
            assert_eq!(reducer.reduce(&data).unwrap(), expected, "workers = {workers}");
        }
    }

    #[test]
    fn test_huge_worker_counts_only_cover_the_input() {
        for workers in [1 << 40, usize::MAX] {
            let reducer = LockBasedReducer::new(19, workers).unwrap();
            assert_eq!(
                reducer.reduce(&[19, 38]).unwrap(),
                Reduction { count: 2, min: Some(19) },
                "workers = {workers}"
            );
        }
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert_eq!(LockBasedReducer::new(0, 4), Err(ReduceError::ZeroDivisor));
        assert_eq!(LockBasedReducer::new(19, 0), Err(ReduceError::ZeroWorkers));
        assert_eq!(LockBasedReducer::new(19, 4).unwrap().reduce(&[]), Err(ReduceError::EmptyInput));
    }
}
