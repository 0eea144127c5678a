//! Miner configuration
//!
//! Handed to the coordinator once at construction and never mutated.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::harden::Hardening;
use crate::params::HARDENING_ITERATIONS;

/// How the nonce budget is split between workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Worker `k` of `n` takes budget indices `k, k + n, k + 2n, ...`
    #[default]
    Stride,
    /// Worker `k` takes the `k`-th contiguous, near-equal chunk
    Range,
}

impl Partition {
    /// Budget indices owned by `worker` out of `workers`, over `budget` attempts
    ///
    /// The returned sequences of all workers are disjoint and together cover
    /// `0..budget` exactly.
    pub fn indices(
        self,
        worker: usize,
        workers: usize,
        budget: u64,
    ) -> Box<dyn Iterator<Item = u64> + Send> {
        let workers = workers.max(1) as u64;
        let worker = worker as u64;
        match self {
            Partition::Stride => {
                if worker >= budget {
                    return Box::new(core::iter::empty());
                }
                Box::new((worker..budget).step_by(workers as usize))
            }
            Partition::Range => {
                let base = budget / workers;
                let rem = budget % workers;
                let start = worker * base + worker.min(rem);
                let len = base + u64::from(worker < rem);
                Box::new(start..start + len)
            }
        }
    }
}

/// Miner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// PBKDF2 iterations per hardening call
    pub hardening_iterations: u32,
    /// Number of search workers
    pub workers: usize,
    /// Nonce partition scheme
    pub partition: Partition,
    /// Wall-clock budget for a single search, in milliseconds
    pub deadline_ms: Option<u64>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            hardening_iterations: HARDENING_ITERATIONS,
            workers: 1,
            partition: Partition::Stride,
            deadline_ms: None,
        }
    }
}

impl MinerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidWorkerCount);
        }
        self.hardening().map(|_| ())
    }

    pub fn hardening(&self) -> Result<Hardening> {
        Hardening::new(self.hardening_iterations)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
