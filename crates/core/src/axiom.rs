//! Axiom binding
//!
//! Turns the 13-word secret phrase into the 32-byte session seed:
//! lowercase, trim, collapse whitespace runs, join with single spaces,
//! then SHA-256. The normalized phrase is wiped as soon as it is hashed
//! and never leaves this module.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::params::{AXIOM_WORD_COUNT, SEED_SIZE};

/// Session seed: SHA-256 of the normalized axiom
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(#[serde(with = "hex::serde")] [u8; SEED_SIZE]);

impl Seed {
    /// Wrap raw seed bytes (e.g. a seed handed over by a collaborator)
    pub const fn from_bytes(bytes: [u8; SEED_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_SIZE] {
        &self.0
    }

    /// First 8 bytes in hex. Safe to log.
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({}..)", self.fingerprint())
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A validated, normalized 13-word axiom
pub struct Axiom {
    normalized: Zeroizing<String>,
}

impl Axiom {
    /// Normalize and validate a phrase
    pub fn parse(phrase: &str) -> Result<Self> {
        let normalized = normalize(phrase);
        let words = normalized.split(' ').filter(|w| !w.is_empty()).count();
        if words != AXIOM_WORD_COUNT {
            return Err(Error::InvalidAxiom {
                expected: AXIOM_WORD_COUNT,
                words,
            });
        }
        Ok(Self { normalized })
    }

    /// Hash the normalized phrase into the session seed
    pub fn seed(&self) -> Seed {
        Seed(Sha256::digest(self.normalized.as_bytes()).into())
    }
}

impl fmt::Debug for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Axiom(<redacted>)")
    }
}

/// Canonical form of a phrase. Idempotent.
pub fn normalize(phrase: &str) -> Zeroizing<String> {
    let lowered = Zeroizing::new(phrase.to_lowercase());
    let mut normalized = Zeroizing::new(String::with_capacity(lowered.len()));
    for word in lowered.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(word);
    }
    normalized
}

/// Bind a phrase to its seed, failing on anything but exactly 13 words
pub fn bind(phrase: &str) -> Result<Seed> {
    Axiom::parse(phrase).map(|axiom| axiom.seed())
}
