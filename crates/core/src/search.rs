//! SearchCoordinator
//!
//! Enumerates nonces over a fixed budget, optionally split across worker
//! threads. Workers share exactly one found flag and one lock-guarded result
//! slot; everything else (buffers, digests, attempt counters) is private to
//! the worker. Stop conditions (found, cancelled, deadline) are checked once
//! per attempt, never inside a candidate's rounds.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::axiom::Seed;
use crate::config::{MinerConfig, Partition};
use crate::difficulty::{meets_difficulty, validate};
use crate::error::{Error, Result};
use crate::harden::Hardening;
use crate::params::HARDENING_ITERATIONS;
use crate::pipeline::{CandidateEvaluator, Digest, TetraPow};
use crate::vault::VaultToken;

/// Terminal state of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    /// A digest met the difficulty target
    Found,
    /// The attempt budget or the wall-clock deadline ran out
    Exhausted,
    /// The caller cancelled the search
    Cancelled,
}

/// Cooperative cancellation handle, observed between attempts
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One mining request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineRequest {
    /// Leading zero bytes required, in `[1, 8]`
    pub difficulty: u32,
    /// Attempt ceiling across all workers
    pub max_attempts: u64,
    /// First nonce of the budget
    pub start_nonce: u64,
    /// Timestamp mixed into every candidate of this search
    pub start_timestamp: i64,
}

/// An accepted candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub nonce: u64,
    pub timestamp: i64,
    #[serde(with = "hex::serde")]
    pub digest: Digest,
    pub token: VaultToken,
}

/// Result of `Miner::mine` / `Miner::search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineReport {
    pub state: SearchState,
    pub solution: Option<Solution>,
    pub attempts: u64,
    pub elapsed: Duration,
}

impl MineReport {
    pub fn success(&self) -> bool {
        self.state == SearchState::Found
    }

    /// Attempts per second over this search
    pub fn hashrate(&self) -> f64 {
        rate(self.attempts, self.elapsed)
    }
}

/// Result of checking a single candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub valid: bool,
    #[serde(with = "hex::serde")]
    pub digest: Digest,
    pub token: Option<VaultToken>,
}

/// Lifetime counters across every search run by one `Miner`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_attempts: u64,
    pub valid_blocks: u64,
    pub hashrate: f64,
}

#[derive(Debug)]
struct MinerStats {
    started: Instant,
    total_attempts: AtomicU64,
    valid_blocks: AtomicU64,
}

impl MinerStats {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            total_attempts: AtomicU64::new(0),
            valid_blocks: AtomicU64::new(0),
        }
    }

    fn record(&self, report: &MineReport) {
        self.total_attempts
            .fetch_add(report.attempts, Ordering::Relaxed);
        if report.success() {
            self.valid_blocks.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> StatsSnapshot {
        let total_attempts = self.total_attempts.load(Ordering::Relaxed);
        StatsSnapshot {
            total_attempts,
            valid_blocks: self.valid_blocks.load(Ordering::Relaxed),
            hashrate: rate(total_attempts, self.started.elapsed()),
        }
    }
}

fn rate(attempts: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { attempts as f64 / secs } else { 0.0 }
}

enum Verdict {
    Found(Solution),
    Fatal(Error),
}

/// The only state shared between workers
struct SearchSignal {
    found: AtomicBool,
    slot: Mutex<Option<Verdict>>,
}

impl SearchSignal {
    fn new() -> Self {
        Self {
            found: AtomicBool::new(false),
            slot: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Verdict>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// First writer wins; later verdicts are dropped
    fn publish(&self, verdict: Verdict) -> bool {
        let mut slot = self.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(verdict);
        self.found.store(true, Ordering::SeqCst);
        true
    }

    fn is_set(&self) -> bool {
        self.found.load(Ordering::Acquire)
    }

    fn take(&self) -> Option<Verdict> {
        self.lock().take()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerExit {
    Budget,
    Signalled,
    Cancelled,
    Deadline,
}

struct WorkerContext<'a, E> {
    evaluator: &'a E,
    request: MineRequest,
    partition: Partition,
    workers: usize,
    deadline: Option<Instant>,
    cancel: &'a CancelToken,
    signal: &'a SearchSignal,
}

impl<E: CandidateEvaluator> WorkerContext<'_, E> {
    fn check_stop(&self) -> Option<WorkerExit> {
        if self.signal.is_set() {
            return Some(WorkerExit::Signalled);
        }
        if self.cancel.is_cancelled() {
            return Some(WorkerExit::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(WorkerExit::Deadline),
            _ => None,
        }
    }

    fn run(&self, worker: usize) -> (WorkerExit, u64) {
        let MineRequest {
            difficulty,
            max_attempts,
            start_nonce,
            start_timestamp,
        } = self.request;
        let mut attempts = 0u64;

        for index in self.partition.indices(worker, self.workers, max_attempts) {
            if let Some(exit) = self.check_stop() {
                return (exit, attempts);
            }

            let nonce = start_nonce.wrapping_add(index);
            let digest = match self.evaluator.digest(nonce, start_timestamp) {
                Ok(digest) => digest,
                Err(e) => {
                    self.signal.publish(Verdict::Fatal(e));
                    return (WorkerExit::Signalled, attempts);
                }
            };
            attempts += 1;

            if meets_difficulty(&digest, difficulty) {
                let solution = Solution {
                    nonce,
                    timestamp: start_timestamp,
                    digest,
                    token: VaultToken::bind(&digest, self.evaluator.seed()),
                };
                if !self.signal.publish(Verdict::Found(solution)) {
                    debug!(worker, nonce, "solution discarded, another worker was first");
                }
                return (WorkerExit::Signalled, attempts);
            }
        }

        (WorkerExit::Budget, attempts)
    }
}

/// Search coordinator holding an immutable configuration
#[derive(Debug)]
pub struct Miner {
    config: MinerConfig,
    hardening: Hardening,
    stats: MinerStats,
}

impl Miner {
    pub fn new(config: MinerConfig) -> Result<Self> {
        config.validate()?;
        let hardening = config.hardening()?;
        if !hardening.is_protocol() {
            warn!(
                iterations = hardening.iterations(),
                protocol = HARDENING_ITERATIONS,
                "hardening iteration count overridden by configuration"
            );
        }
        Ok(Self {
            config,
            hardening,
            stats: MinerStats::new(),
        })
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// The Tetra-PoW pipeline for `seed` under this miner's hardening
    pub fn pipeline(&self, seed: Seed) -> TetraPow {
        TetraPow::new(seed, self.hardening)
    }

    /// Mine with the Tetra-PoW pipeline
    pub fn mine(
        &self,
        seed: &Seed,
        request: &MineRequest,
        cancel: &CancelToken,
    ) -> Result<MineReport> {
        self.search(&self.pipeline(*seed), request, cancel)
    }

    /// Run the search state machine over any evaluator
    pub fn search<E: CandidateEvaluator>(
        &self,
        evaluator: &E,
        request: &MineRequest,
        cancel: &CancelToken,
    ) -> Result<MineReport> {
        validate(request.difficulty)?;

        let workers = self.config.workers;
        info!(
            seed = %evaluator.seed().fingerprint(),
            difficulty = request.difficulty,
            max_attempts = request.max_attempts,
            start_nonce = request.start_nonce,
            workers,
            partition = ?self.config.partition,
            "search started"
        );

        let start = Instant::now();
        let signal = SearchSignal::new();
        let ctx = WorkerContext {
            evaluator,
            request: *request,
            partition: self.config.partition,
            workers,
            deadline: self.config.deadline().map(|d| start + d),
            cancel,
            signal: &signal,
        };

        let exits = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let ctx = &ctx;
                    thread::Builder::new()
                        .name(format!("tetrapow-worker-{worker}"))
                        .spawn_scoped(scope, move || ctx.run(worker))
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .filter_map(|(worker, handle)| {
                    let joined = match handle {
                        Ok(handle) => handle.join().map_err(|_| "worker panicked".to_string()),
                        Err(e) => Err(format!("worker failed to start: {e}")),
                    };
                    match joined {
                        Ok((exit, attempts)) => {
                            debug!(worker, ?exit, attempts, "worker finished");
                            Some((exit, attempts))
                        }
                        Err(reason) => {
                            error!(worker, %reason, "worker lost, its remaining nonces are skipped");
                            None
                        }
                    }
                })
                .collect::<Vec<_>>()
        });

        let attempts: u64 = exits.iter().map(|(_, attempts)| attempts).sum();
        let elapsed = start.elapsed();

        let (state, solution) = match signal.take() {
            Some(Verdict::Fatal(e)) => {
                error!(error = %e, "search aborted");
                return Err(e);
            }
            Some(Verdict::Found(solution)) => (SearchState::Found, Some(solution)),
            None if exits.iter().any(|(exit, _)| *exit == WorkerExit::Cancelled) => {
                (SearchState::Cancelled, None)
            }
            None => (SearchState::Exhausted, None),
        };

        let report = MineReport {
            state,
            solution,
            attempts,
            elapsed,
        };
        self.stats.record(&report);

        info!(
            state = ?report.state,
            attempts = report.attempts,
            elapsed_ms = report.elapsed.as_millis() as u64,
            hashrate = report.hashrate(),
            nonce = ?report.solution.as_ref().map(|s| s.nonce),
            "search finished"
        );
        Ok(report)
    }

    /// Recompute and check one candidate
    pub fn verify(
        &self,
        seed: &Seed,
        nonce: u64,
        timestamp: i64,
        difficulty: u32,
    ) -> Result<Verification> {
        validate(difficulty)?;
        let digest = self.pipeline(*seed).digest(nonce, timestamp)?;
        let valid = meets_difficulty(&digest, difficulty);
        Ok(Verification {
            valid,
            digest,
            token: valid.then(|| VaultToken::bind(&digest, seed)),
        })
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
