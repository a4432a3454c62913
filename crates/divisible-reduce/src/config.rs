//! Configuration

use crate::{
    constants::{
        DEFAULT_DATA_LEN, DEFAULT_DIVISOR, DEFAULT_SEED, DEFAULT_VALUE_BOUND, DEFAULT_WORKERS,
    },
    error::{ReduceError, ReduceResult},
};
use serde::{Deserialize, Serialize};
use std::{
    env::{self, VarError},
    str::FromStr,
};

/// When the lock-free reducer merges its minimum into the shared value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinMergeGranularity {
    /// One CAS loop per worker, after the whole chunk is scanned
    #[default]
    PerChunk,
    /// One CAS loop per divisible element, as soon as it is found
    PerElement,
}

impl MinMergeGranularity {
    /// Returns the string representation used in configuration and reports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PerChunk => "chunk",
            Self::PerElement => "element",
        }
    }
}

impl FromStr for MinMergeGranularity {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chunk" | "per_chunk" => Ok(Self::PerChunk),
            "element" | "per_element" => Ok(Self::PerElement),
            _ => Err(ReduceError::InvalidConfig { key: "REDUCE_MIN_MERGE", value: s.to_string() }),
        }
    }
}

/// Reducer configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReduceConfig {
    /// Elements divisible by this value are counted
    pub divisor: i32,
    /// Number of parallel workers (chunks)
    pub workers: usize,
    /// Lock-free min merge granularity
    pub min_merge: MinMergeGranularity,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            divisor: DEFAULT_DIVISOR,
            workers: DEFAULT_WORKERS,
            min_merge: MinMergeGranularity::default(),
        }
    }
}

impl ReduceConfig {
    /// Load from environment variables, falling back to defaults for unset keys
    pub fn from_env() -> ReduceResult<Self> {
        let defaults = Self::default();
        let config = Self {
            divisor: env_parse("REDUCE_DIVISOR")?.unwrap_or(defaults.divisor),
            workers: env_parse("REDUCE_WORKERS")?.unwrap_or(defaults.workers),
            min_merge: env_parse("REDUCE_MIN_MERGE")?.unwrap_or(defaults.min_merge),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject a zero divisor or a zero worker count
    pub const fn validate(&self) -> ReduceResult<()> {
        if self.divisor == 0 {
            return Err(ReduceError::ZeroDivisor);
        }
        if self.workers == 0 {
            return Err(ReduceError::ZeroWorkers);
        }
        Ok(())
    }
}

/// Input data configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Number of elements to generate
    pub len: usize,
    /// Values are drawn from `[0, value_bound)`
    pub value_bound: i32,
    /// Generator seed
    pub seed: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { len: DEFAULT_DATA_LEN, value_bound: DEFAULT_VALUE_BOUND, seed: DEFAULT_SEED }
    }
}

impl DataConfig {
    /// Load from environment variables, falling back to defaults for unset keys
    pub fn from_env() -> ReduceResult<Self> {
        let defaults = Self::default();
        let value_bound: i32 = env_parse("REDUCE_VALUE_BOUND")?.unwrap_or(defaults.value_bound);
        if value_bound <= 0 {
            return Err(ReduceError::InvalidConfig {
                key: "REDUCE_VALUE_BOUND",
                value: value_bound.to_string(),
            });
        }
        Ok(Self {
            len: env_parse("REDUCE_DATA_LEN")?.unwrap_or(defaults.len),
            value_bound,
            seed: env_parse("REDUCE_SEED")?.unwrap_or(defaults.seed),
        })
    }
}

/// Parse an optional environment variable. Unset is `None`; set but unparsable is an error.
fn env_parse<T: FromStr>(key: &'static str) -> ReduceResult<Option<T>> {
    parse_var(key, env::var(key))
}

fn parse_var<T: FromStr>(
    key: &'static str,
    var: Result<String, VarError>,
) -> ReduceResult<Option<T>> {
    match var {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ReduceError::InvalidConfig { key, value: raw }),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(ReduceError::InvalidConfig {
            key,
            value: raw.to_string_lossy().into_owned(),
        }),
    }
}
