//! Splits an input sequence into contiguous per-worker chunks.

use crate::error::{ReduceError, ReduceResult};
use std::ops::Range;

/// Half-open index range `[start, end)` handed to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chunk {
    /// Position of this chunk among its siblings
    pub index: usize,
    /// First index covered
    pub start: usize,
    /// One past the last index covered
    pub end: usize,
}

impl Chunk {
    /// Number of elements covered.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the chunk covers no elements.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The chunk as a slice range.
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Lazy sequence of the chunks of `[0, len)`, in ascending order.
///
/// Chunks are computed on demand, so a huge worker count costs nothing until
/// iterated. Use [`Partition::non_empty`] to skip the empty leading chunks in
/// constant time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    len: usize,
    workers: usize,
    chunk_size: usize,
    next: usize,
}

impl Partition {
    /// Chunk at `index`. The caller guarantees `index < workers`.
    const fn chunk(&self, index: usize) -> Chunk {
        let start = index * self.chunk_size;
        let end = if index == self.workers - 1 { self.len } else { start + self.chunk_size };
        Chunk { index, start, end }
    }

    /// Drop the remaining empty chunks without visiting them.
    ///
    /// With `workers > len` the chunk size is zero and only the last chunk holds
    /// elements; otherwise every chunk is non-empty. At most `min(workers, len)`
    /// chunks are left to yield.
    pub fn non_empty(self) -> Self {
        let next = if self.len == 0 {
            self.workers
        } else if self.chunk_size == 0 {
            self.next.max(self.workers - 1)
        } else {
            self.next
        };
        Self { next, ..self }
    }
}

impl Iterator for Partition {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.next >= self.workers {
            return None;
        }
        let chunk = self.chunk(self.next);
        self.next += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.workers - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Partition {}

/// Divide `[0, len)` into `workers` ordered chunks.
///
/// Every chunk but the last has `len / workers` elements; the last one extends to
/// `len` and absorbs the remainder. When `workers > len` the leading chunks are
/// empty, and all of them are still yielded.
pub const fn partition(len: usize, workers: usize) -> ReduceResult<Partition> {
    if workers == 0 {
        return Err(ReduceError::ZeroWorkers);
    }

    Ok(Partition { len, workers, chunk_size: len / workers, next: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers_exactly_once(chunks: &[Chunk], len: usize) {
        let mut next = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.start, next, "gap or overlap before chunk {i}");
            assert!(chunk.start <= chunk.end);
            next = chunk.end;
        }
        assert_eq!(next, len);
    }

    #[test]
    fn test_even_split() {
        let chunks: Vec<_> = partition(100, 4).unwrap().collect();
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.len() == 25));
        assert_covers_exactly_once(&chunks, 100);
    }

    #[test]
    fn test_last_chunk_absorbs_remainder() {
        let chunks: Vec<_> = partition(10, 3).unwrap().collect();
        let lens: Vec<_> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(lens, vec![3, 3, 4]);
        assert_eq!(chunks[2].range(), 6..10);
    }

    #[test]
    fn test_more_workers_than_elements() {
        let chunks: Vec<_> = partition(3, 5).unwrap().collect();
        assert_eq!(chunks.len(), 5);
        assert!(chunks[..4].iter().all(Chunk::is_empty));
        assert_eq!(chunks[4].range(), 0..3);
        assert_covers_exactly_once(&chunks, 3);
    }

    #[test]
    fn test_single_worker() {
        let chunks: Vec<_> = partition(7, 1).unwrap().collect();
        assert_eq!(chunks, vec![Chunk { index: 0, start: 0, end: 7 }]);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert_eq!(partition(10, 0), Err(ReduceError::ZeroWorkers));
    }

    #[test]
    fn test_coverage_over_many_shapes() {
        for len in [0, 1, 2, 17, 64, 65, 1000, 10_007] {
            for workers in [1, 2, 3, 16, 64, 100] {
                let partition = partition(len, workers).unwrap();
                assert_eq!(partition.len(), workers);
                let chunks: Vec<_> = partition.collect();
                assert_covers_exactly_once(&chunks, len);
            }
        }
    }

    #[test]
    fn test_non_empty_matches_filtered_chunks() {
        for len in [0, 1, 2, 17, 64, 65, 1000] {
            for workers in [1, 2, 3, 16, 64, 100] {
                let expected: Vec<_> =
                    partition(len, workers).unwrap().filter(|c| !c.is_empty()).collect();
                let non_empty: Vec<_> = partition(len, workers).unwrap().non_empty().collect();
                assert_eq!(non_empty, expected, "len = {len}, workers = {workers}");
                assert!(non_empty.len() <= len.min(workers));
            }
        }
    }

    #[test]
    fn test_huge_worker_count_stays_lazy() {
        let partition = partition(2, usize::MAX).unwrap();
        assert_eq!(partition.len(), usize::MAX);

        let chunks: Vec<_> = partition.non_empty().collect();
        assert_eq!(chunks, vec![Chunk { index: usize::MAX - 1, start: 0, end: 2 }]);

        assert_eq!(super::partition(0, usize::MAX).unwrap().non_empty().count(), 0);
    }
}
