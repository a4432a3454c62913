/// Divisor used when none is configured
pub const DEFAULT_DIVISOR: i32 = 19;

/// Number of parallel workers used when none is configured
pub const DEFAULT_WORKERS: usize = 64;

/// Length of the generated input sequence
pub const DEFAULT_DATA_LEN: usize = 100_000_000;

/// Generated values fall in `[0, DEFAULT_VALUE_BOUND)`
pub const DEFAULT_VALUE_BOUND: i32 = 100_000;

/// Seed for the deterministic data generator
pub const DEFAULT_SEED: u64 = 42;

/// Shared minimum before any worker has merged.
///
/// Lies outside the `i32` range, so it never collides with a data value.
pub(crate) const MIN_SENTINEL: i64 = i64::MAX;

/// Tracing target for reduction events
pub(crate) const LOG_TARGET: &str = "reduce";
