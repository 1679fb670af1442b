use serde::{Serialize, Deserialize};

use crate::engine::{partition, IntervalSet};
use crate::error::{KempnerResult, KempnerError};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub run: RunConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
}

/// Size of the problem: the range `[1, n]` and how many intervals to split it into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub n: u64,
    pub ntasks: u64,
}

/// Execution settings for the aggregator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    pub max_workers: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n: 100_000_000,
            ntasks: 1,
        }
    }
}

impl RunConfig {
    pub fn new(n: u64, ntasks: u64) -> Self {
        Self { n, ntasks }
    }

    /// Reject a range or task count below 1
    pub fn validate(&self) -> KempnerResult<()> {
        if self.n < 1 {
            return Err(KempnerError::InvalidConfiguration(format!("n must be at least 1, got {}", self.n)));
        }
        if self.ntasks < 1 {
            return Err(KempnerError::InvalidConfiguration(format!("ntasks must be at least 1, got {}", self.ntasks)));
        }
        Ok(())
    }

    pub fn partition(&self) -> KempnerResult<IntervalSet> {
        self.validate()?;
        partition(self.n, self.ntasks)
    }
}

impl ExecutorConfig {
    /// Configured worker count, or one per logical CPU
    pub fn worker_count(&self) -> usize {
        self.max_workers.unwrap_or_else(num_cpus::get)
    }
}
