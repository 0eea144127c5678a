//! Candidate evaluation: seed + (nonce, timestamp) -> digest
//!
//! Builds the initial working buffer, runs exactly `ROUND_COUNT` rounds and
//! returns `SHA256(final buffer)`.

use sha2::{Digest as _, Sha256};

use crate::axiom::Seed;
use crate::error::Result;
use crate::harden::Hardening;
use crate::params::{DIGEST_SIZE, ROUND_COUNT};
use crate::round::{RoundObserver, initial_buffer, step};

/// Final 32-byte candidate digest
pub type Digest = [u8; DIGEST_SIZE];

/// Anything the search coordinator can ask for candidate digests
///
/// Implementations must be deterministic in `(nonce, timestamp)`.
pub trait CandidateEvaluator: Sync {
    fn seed(&self) -> &Seed;

    fn digest(&self, nonce: u64, timestamp: i64) -> Result<Digest>;
}

/// The Tetra-PoW pipeline for one session seed
#[derive(Debug, Clone)]
pub struct TetraPow {
    seed: Seed,
    hardening: Hardening,
}

impl TetraPow {
    pub fn new(seed: Seed, hardening: Hardening) -> Self {
        Self { seed, hardening }
    }

    pub fn hardening(&self) -> &Hardening {
        &self.hardening
    }

    /// Evaluate one candidate, reporting every round to `observer`
    pub fn digest_observed<O: RoundObserver>(
        &self,
        nonce: u64,
        timestamp: i64,
        observer: &mut O,
    ) -> Result<Digest> {
        let mut buffer = initial_buffer(&self.seed, nonce, timestamp);
        for round in 0..ROUND_COUNT {
            buffer = step(&buffer, &self.seed, round, &self.hardening)?;
            observer.on_round(round, &buffer);
        }
        Ok(Sha256::digest(buffer).into())
    }
}

impl CandidateEvaluator for TetraPow {
    fn seed(&self) -> &Seed {
        &self.seed
    }

    #[inline]
    fn digest(&self, nonce: u64, timestamp: i64) -> Result<Digest> {
        self.digest_observed(nonce, timestamp, &mut ())
    }
}
