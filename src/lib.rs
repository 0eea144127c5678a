//! Tetra-PoW Prover Library
//!
//! Thin adapter around the Tetra-PoW engine: re-exports the core algorithm
//! and owns the on-disk settings used by the `tetrapow` CLI.
//!
//! # Example
//!
//! ```rust
//! use tetrapow::algorithm::{bind, meets_difficulty, Hardening, TetraPow, CandidateEvaluator};
//!
//! let seed = bind("sword legend pull magic kingdom artist stone destroy forget fire steel honey question").unwrap();
//! let pow = TetraPow::new(seed, Hardening::new(1).unwrap());
//!
//! let digest = pow.digest(0, 1_700_000_000).unwrap();
//! if meets_difficulty(&digest, 1) {
//!     println!("Valid proof found!");
//! }
//! ```

// Re-export the core algorithm
pub use tetrapow_core as algorithm;

pub mod settings;

// Convenience re-exports
pub use algorithm::{bind, harden, mine, meets_difficulty, Miner, MinerConfig, Seed, TetraPow};
