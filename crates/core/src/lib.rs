//! # Tetra-PoW Core Algorithm
//!
//! A deterministic, difficulty-gated proof-of-work engine. A 13-word axiom
//! is bound to a 32-byte seed; every `(nonce, timestamp)` candidate then runs
//! through 128 nonlinear rounds, hardened with PBKDF2 every 16th round, and
//! is accepted when its digest starts with `difficulty` zero bytes.
//!
//! ## Pipeline
//!
//! ```text
//! axiom ──bind──▶ seed
//! seed || le(nonce) || le(timestamp) ──128 rounds──▶ buffer ──SHA256──▶ digest
//! digest has `difficulty` leading zero bytes? ──▶ token = SHA256(digest || seed)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tetrapow_core::{CancelToken, MineRequest, Miner, MinerConfig, bind, CANONICAL_AXIOM};
//!
//! let seed = bind(CANONICAL_AXIOM).unwrap();
//!
//! // Reduced hardening keeps the example fast; the protocol value is 600,000.
//! let config = MinerConfig { hardening_iterations: 1, ..MinerConfig::default() };
//! let miner = Miner::new(config).unwrap();
//!
//! let request = MineRequest {
//!     difficulty: 1,
//!     max_attempts: 10_000,
//!     start_nonce: 0,
//!     start_timestamp: 1_700_000_000,
//! };
//! let report = miner.mine(&seed, &request, &CancelToken::new()).unwrap();
//! assert!(report.success());
//! ```

mod axiom;
mod config;
mod difficulty;
mod error;
mod harden;
mod params;
mod pipeline;
mod round;
mod search;
mod vault;

pub use axiom::{Axiom, Seed, bind, normalize};
pub use config::{MinerConfig, Partition};
pub use difficulty::{meets_difficulty, validate as validate_difficulty};
pub use error::{Error, Result};
pub use harden::{Hardening, harden};
pub use params::*;
pub use pipeline::{CandidateEvaluator, Digest, TetraPow};
pub use round::{RoundCounter, RoundObserver, WorkingBuffer, initial_buffer, step};
pub use search::{
    CancelToken, MineReport, MineRequest, Miner, SearchState, Solution, StatsSnapshot,
    Verification,
};
pub use vault::VaultToken;

/// Single-worker mining with protocol parameters
///
/// Fails with a configuration error, before any candidate is evaluated,
/// if `difficulty` is outside `[1, 8]`.
pub fn mine(
    seed: [u8; SEED_SIZE],
    difficulty: u32,
    max_attempts: u64,
    start_nonce: u64,
    start_timestamp: i64,
) -> Result<MineReport> {
    let miner = Miner::new(MinerConfig::default())?;
    let request = MineRequest {
        difficulty,
        max_attempts,
        start_nonce,
        start_timestamp,
    };
    miner.mine(&Seed::from_bytes(seed), &request, &CancelToken::new())
}
