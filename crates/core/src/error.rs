//! Configuration errors
//!
//! Every variant is raised before the first candidate is evaluated, except
//! `Hardening`, which aborts a search that is already running.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid axiom: expected {expected} words, found {words}")]
    InvalidAxiom { expected: usize, words: usize },

    #[error("Difficulty {difficulty} out of range [{min}, {max}]")]
    DifficultyOutOfRange { difficulty: u32, min: u32, max: u32 },

    #[error("Hardening iteration count must be positive")]
    InvalidIterations,

    #[error("Hardening output length must be positive")]
    InvalidOutputLength,

    #[error("Worker count must be positive")]
    InvalidWorkerCount,

    #[error("Hardening failed: {0}")]
    Hardening(String),
}

pub type Result<T> = core::result::Result<T, Error>;
