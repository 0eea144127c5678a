//! Tetra-PoW Protocol Parameters
//!
//! These are protocol constants. Changing any of them changes every digest
//! the engine produces.

/// Number of nonlinear rounds per candidate
pub const ROUND_COUNT: usize = 128;

/// Hardening is applied on every round whose index is a multiple of this
pub const HARDENING_INTERVAL: usize = 16;

/// PBKDF2-HMAC-SHA256 iterations per hardening call
pub const HARDENING_ITERATIONS: u32 = 600_000;

/// Hardening output length (substituted back into the round digest)
pub const HARDENING_OUTPUT_LEN: usize = 32;

/// Required number of words in an axiom
pub const AXIOM_WORD_COUNT: usize = 13;

/// Seed size in bytes (SHA-256 of the normalized axiom)
pub const SEED_SIZE: usize = 32;

/// Working buffer size in bytes
pub const BUFFER_SIZE: usize = 64;

/// Digest size in bytes
pub const DIGEST_SIZE: usize = 32;

/// Lowest accepted difficulty (leading zero bytes)
pub const MIN_DIFFICULTY: u32 = 1;

/// Highest accepted difficulty (leading zero bytes)
pub const MAX_DIFFICULTY: u32 = 8;

/// Difficulty used when the caller does not choose one
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Reference axiom. Only ever used through its seed.
pub const CANONICAL_AXIOM: &str =
    "sword legend pull magic kingdom artist stone destroy forget fire steel honey question";
