//! DifficultyValidator: leading-zero-byte target

use crate::error::{Error, Result};
use crate::params::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::pipeline::Digest;

/// Check a difficulty before any search starts
pub fn validate(difficulty: u32) -> Result<u32> {
    if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        Ok(difficulty)
    } else {
        Err(Error::DifficultyOutOfRange {
            difficulty,
            min: MIN_DIFFICULTY,
            max: MAX_DIFFICULTY,
        })
    }
}

/// Check if a digest meets the required difficulty
///
/// Difficulty is the number of leading zero *bytes*. Targets outside
/// `[MIN_DIFFICULTY, MAX_DIFFICULTY]` never pass.
///
/// # Example
///
/// ```rust
/// use tetrapow_core::meets_difficulty;
///
/// let mut digest = [0xFFu8; 32];
/// digest[0] = 0;
/// digest[1] = 0;
/// assert!(meets_difficulty(&digest, 2));
/// assert!(!meets_difficulty(&digest, 3));
/// assert!(!meets_difficulty(&[0u8; 32], 9));
/// ```
#[inline(always)]
pub fn meets_difficulty(digest: &Digest, difficulty: u32) -> bool {
    if validate(difficulty).is_err() {
        return false;
    }
    digest[..difficulty as usize].iter().all(|&b| b == 0)
}
