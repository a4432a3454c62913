//! Structured fork-join over the chunks of an input sequence.

use crate::{
    constants::LOG_TARGET,
    error::{ReduceError, ReduceResult},
    partition::{Chunk, partition},
};
use std::thread;

/// Run `work` once per non-empty chunk of `data`, each on its own scoped thread,
/// and block until every thread has been joined.
///
/// Empty chunks (only possible when `workers > data.len()`) get no thread, so at
/// most `min(workers, data.len())` threads are started. Every spawned handle is
/// joined even after a failure. Worker errors are returned first, in chunk order;
/// a panicking worker becomes [`ReduceError::WorkerPanicked`] and a thread the OS
/// refused to start becomes [`ReduceError::SpawnFailed`].
pub(crate) fn fork_join<F>(data: &[i32], workers: usize, work: F) -> ReduceResult<()>
where
    F: Fn(Chunk, &[i32]) -> ReduceResult<()> + Sync,
{
    fork_join_with(
        data,
        workers,
        |chunk| thread::Builder::new().name(format!("reduce-worker-{}", chunk.index)),
        work,
    )
}

fn fork_join_with<B, F>(data: &[i32], workers: usize, builder: B, work: F) -> ReduceResult<()>
where
    B: Fn(&Chunk) -> thread::Builder,
    F: Fn(Chunk, &[i32]) -> ReduceResult<()> + Sync,
{
    let chunks = partition(data.len(), workers)?.non_empty();

    thread::scope(|scope| {
        let work = &work;
        let mut handles = Vec::with_capacity(chunks.len());
        let mut spawn_error = None;
        for chunk in chunks {
            let values = &data[chunk.range()];
            match builder(&chunk).spawn_scoped(scope, move || work(chunk, values)) {
                Ok(handle) => handles.push((chunk.index, handle)),
                Err(e) => {
                    tracing::warn!(
                        target: LOG_TARGET,
                        worker = chunk.index,
                        error = %e,
                        "Failed to spawn worker"
                    );
                    spawn_error = Some(ReduceError::SpawnFailed { worker: chunk.index });
                    break;
                }
            }
        }

        let mut first_error = None;
        for (worker, handle) in handles {
            let outcome = handle.join().unwrap_or_else(|_| {
                tracing::warn!(target: LOG_TARGET, worker, "Worker panicked");
                Err(ReduceError::WorkerPanicked { worker })
            });
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }

        first_error.or(spawn_error).map_or(Ok(()), Err)
    })
}
