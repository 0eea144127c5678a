//! HardeningStage: PBKDF2-HMAC-SHA256
//!
//! The only deliberately expensive operation in the pipeline. Inside the
//! round loop it runs every `HARDENING_INTERVAL` rounds with the round
//! digest as password and the seed as salt.

use core::num::NonZeroU32;

use hmac::Hmac;
use sha2::Sha256;

use crate::axiom::Seed;
use crate::error::{Error, Result};
use crate::params::{HARDENING_ITERATIONS, HARDENING_OUTPUT_LEN};

type HmacSha256 = Hmac<Sha256>;

/// Validated iteration count for the in-loop hardening step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hardening {
    iterations: NonZeroU32,
}

impl Hardening {
    pub fn new(iterations: u32) -> Result<Self> {
        NonZeroU32::new(iterations)
            .map(|iterations| Self { iterations })
            .ok_or(Error::InvalidIterations)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// Whether this differs from the protocol constant
    pub fn is_protocol(&self) -> bool {
        self.iterations.get() == HARDENING_ITERATIONS
    }

    /// Replace a round digest with its hardened form
    pub fn apply(
        &self,
        round_digest: &[u8; HARDENING_OUTPUT_LEN],
        seed: &Seed,
    ) -> Result<[u8; HARDENING_OUTPUT_LEN]> {
        let mut out = [0u8; HARDENING_OUTPUT_LEN];
        derive(round_digest, seed.as_bytes(), self.iterations(), &mut out)?;
        Ok(out)
    }
}

impl Default for Hardening {
    fn default() -> Self {
        Self {
            iterations: NonZeroU32::new(HARDENING_ITERATIONS).unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// Standalone hardened derivation, e.g. for long-lived keys
///
/// Returns `out_len` bytes of PBKDF2-HMAC-SHA256(input, salt, iterations).
pub fn harden(input: &[u8], salt: &[u8], iterations: u32, out_len: usize) -> Result<Vec<u8>> {
    if iterations == 0 {
        return Err(Error::InvalidIterations);
    }
    if out_len == 0 {
        return Err(Error::InvalidOutputLength);
    }

    let mut out = vec![0u8; out_len];
    derive(input, salt, iterations, &mut out)?;
    Ok(out)
}

fn derive(password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) -> Result<()> {
    pbkdf2::pbkdf2::<HmacSha256>(password, salt, iterations, out)
        .map_err(|e| Error::Hardening(e.to_string()))
}
