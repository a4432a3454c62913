//! Deterministic input generation.

use crate::config::DataConfig;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Generate `config.len` pseudo-random values in `[0, config.value_bound)`.
///
/// The same config always yields the same sequence. Panics if `value_bound` is
/// not positive; [`DataConfig::from_env`] rejects such values.
pub fn generate(config: &DataConfig) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.len).map(|_| rng.gen_range(0..config.value_bound)).collect()
}
