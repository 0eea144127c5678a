//! RoundTransform: one nonlinear mixing step over the 64-byte working buffer
//!
//! Per round `r`:
//! 1. `d = SHA256(buffer)`
//! 2. `d[i] ^= seed[(i + r mod 32) mod 32]`
//! 3. if `r mod 16 == 0`: `d = Harden(d, seed)`
//! 4. for i in 0..32, in order:
//!    `buffer[i] = d[i] ^ buffer[(i + r) mod 64]`,
//!    `buffer[i + 32] = d[i] ^ r as u8`
//!
//! Step 4 writes in place, so a rotating read may observe a byte written
//! earlier in the same round. The step is still a pure function of
//! `(buffer, seed, r)`.

use sha2::{Digest as _, Sha256};

use crate::axiom::Seed;
use crate::error::Result;
use crate::harden::Hardening;
use crate::params::{BUFFER_SIZE, DIGEST_SIZE, HARDENING_INTERVAL, SEED_SIZE};

/// Per-candidate mining state
pub type WorkingBuffer = [u8; BUFFER_SIZE];

/// Initial buffer: `seed || le(nonce) || le(timestamp)`, zero padded
#[inline]
pub fn initial_buffer(seed: &Seed, nonce: u64, timestamp: i64) -> WorkingBuffer {
    let mut buffer = [0u8; BUFFER_SIZE];
    buffer[..SEED_SIZE].copy_from_slice(seed.as_bytes());
    buffer[SEED_SIZE..SEED_SIZE + 8].copy_from_slice(&nonce.to_le_bytes());
    buffer[SEED_SIZE + 8..SEED_SIZE + 16].copy_from_slice(&timestamp.to_le_bytes());
    buffer
}

/// Whether round `round` substitutes the hardened digest
#[inline(always)]
pub fn is_hardening_round(round: usize) -> bool {
    round % HARDENING_INTERVAL == 0
}

/// Apply one round to `buffer` and return the result
pub fn step(
    buffer: &WorkingBuffer,
    seed: &Seed,
    round: usize,
    hardening: &Hardening,
) -> Result<WorkingBuffer> {
    let mut round_digest: [u8; DIGEST_SIZE] = Sha256::digest(buffer).into();

    let offset = round % SEED_SIZE;
    let seed_bytes = seed.as_bytes();
    for (i, byte) in round_digest.iter_mut().enumerate() {
        *byte ^= seed_bytes[(i + offset) % SEED_SIZE];
    }

    if is_hardening_round(round) {
        round_digest = hardening.apply(&round_digest, seed)?;
    }

    let mut next = *buffer;
    let round_byte = round as u8;
    for (i, byte) in round_digest.iter().enumerate() {
        next[i] = byte ^ next[(i + round) % BUFFER_SIZE];
        next[i + DIGEST_SIZE] = byte ^ round_byte;
    }
    Ok(next)
}

/// Hook called after every round of a candidate evaluation
pub trait RoundObserver {
    fn on_round(&mut self, round: usize, buffer: &WorkingBuffer);
}

impl RoundObserver for () {
    #[inline(always)]
    fn on_round(&mut self, _round: usize, _buffer: &WorkingBuffer) {}
}

/// Counts rounds; used to check the round-count invariant
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundCounter {
    pub rounds: usize,
    pub last_round: Option<usize>,
}

impl RoundObserver for RoundCounter {
    fn on_round(&mut self, round: usize, _buffer: &WorkingBuffer) {
        self.rounds += 1;
        self.last_round = Some(round);
    }
}
