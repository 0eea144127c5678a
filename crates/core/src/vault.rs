//! OutputBinder: vault token derivation
//!
//! `token = SHA256(digest || seed)`. An opaque internal identifier; it makes
//! no claim to any external address format.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::axiom::Seed;
use crate::pipeline::Digest;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultToken(#[serde(with = "hex::serde")] [u8; 32]);

impl VaultToken {
    /// Bind an accepted digest to the session seed
    pub fn bind(digest: &Digest, seed: &Seed) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(seed.as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for VaultToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for VaultToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VaultToken({self})")
    }
}
