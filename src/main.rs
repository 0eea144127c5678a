//! Tetra-PoW Prover CLI
//!
//! A command-line adapter over the Tetra-PoW engine.
//!
//! # Commands
//!
//! - `mine` - Search for a nonce meeting the difficulty target
//! - `verify` - Check a single (nonce, timestamp) candidate
//! - `harden` - Standalone PBKDF2 hardened derivation
//! - `seed` - Print the seed bound to an axiom
//! - `benchmark` - Run performance benchmark
//! - `config` - Show or initialize the settings file

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tetrapow::algorithm::{
    self, CancelToken, CandidateEvaluator, MineRequest, Miner, MinerConfig, Partition, Seed,
};
use tetrapow::settings::{self, default_settings_path};
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "tetrapow")]
#[command(version = "0.1.0")]
#[command(about = "Tetra-PoW difficulty-gated proof-of-work miner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Custom settings file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Hardening iterations override (protocol: 600000)
    #[arg(long, global = true)]
    iterations: Option<u32>,

    /// Number of worker threads (default: settings file, else number of CPU cores)
    #[arg(short, long, global = true)]
    threads: Option<usize>,

    /// Nonce partition scheme across workers
    #[arg(long, global = true, value_enum)]
    partition: Option<PartitionArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PartitionArg {
    Stride,
    Range,
}

impl From<PartitionArg> for Partition {
    fn from(arg: PartitionArg) -> Self {
        match arg {
            PartitionArg::Stride => Partition::Stride,
            PartitionArg::Range => Partition::Range,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a nonce whose digest meets the difficulty target
    Mine {
        /// The 13-word axiom (will prompt if not provided)
        #[arg(long, env = "TETRAPOW_AXIOM", hide_env_values = true)]
        axiom: Option<String>,

        /// Target difficulty (number of leading zero bytes, 1-8)
        #[arg(short, long, default_value_t = algorithm::DEFAULT_DIFFICULTY)]
        difficulty: u32,

        /// Attempt ceiling across all workers
        #[arg(long, default_value_t = 1_000_000)]
        max_attempts: u64,

        /// First nonce of the search
        #[arg(long, default_value_t = 0)]
        start_nonce: u64,

        /// Timestamp mixed into every candidate (default: now, unix seconds)
        #[arg(long)]
        timestamp: Option<i64>,

        /// Wall-clock budget in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a single candidate
    Verify {
        /// The 13-word axiom (will prompt if not provided)
        #[arg(long, env = "TETRAPOW_AXIOM", hide_env_values = true)]
        axiom: Option<String>,

        /// The nonce used
        #[arg(long)]
        nonce: u64,

        /// The timestamp used (unix seconds)
        #[arg(long)]
        timestamp: i64,

        /// Target difficulty (number of leading zero bytes, 1-8)
        #[arg(short, long, default_value_t = algorithm::DEFAULT_DIFFICULTY)]
        difficulty: u32,
    },

    /// Standalone hardened key derivation (PBKDF2-HMAC-SHA256)
    Harden {
        /// Input bytes as hex
        #[arg(long)]
        input: String,

        /// Salt bytes as hex
        #[arg(long)]
        salt: String,

        /// Output length in bytes
        #[arg(long, default_value_t = algorithm::HARDENING_OUTPUT_LEN)]
        out_len: usize,
    },

    /// Print the seed bound to an axiom
    Seed {
        /// The 13-word axiom (will prompt if not provided)
        #[arg(long, env = "TETRAPOW_AXIOM", hide_env_values = true)]
        axiom: Option<String>,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of candidates to evaluate
        #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the settings file
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tetrapow=info,tetrapow_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings_path = cli.config.clone().unwrap_or_else(default_settings_path);
    let creating = matches!(cli.command, Commands::Config { init: true });
    let config = effective_config(&cli, &settings_path, creating)?;

    match cli.command {
        Commands::Mine {
            axiom,
            difficulty,
            max_attempts,
            start_nonce,
            timestamp,
            timeout_ms,
            json,
        } => {
            let config = MinerConfig {
                deadline_ms: timeout_ms.or(config.deadline_ms),
                ..config
            };
            let request = MineRequest {
                difficulty,
                max_attempts,
                start_nonce,
                start_timestamp: match timestamp {
                    Some(ts) => ts,
                    None => now_unix()?,
                },
            };
            cmd_mine(axiom, config, request, json)
        }
        Commands::Verify {
            axiom,
            nonce,
            timestamp,
            difficulty,
        } => cmd_verify(axiom, config, nonce, timestamp, difficulty),
        Commands::Harden {
            input,
            salt,
            out_len,
        } => cmd_harden(&input, &salt, config.hardening_iterations, out_len),
        Commands::Seed { axiom } => cmd_seed(axiom),
        Commands::Benchmark { count } => cmd_benchmark(config, count),
        Commands::Config { init } => cmd_config(config, init, &settings_path),
    }
}

/// Settings file, then command-line overrides
///
/// An explicit `--config` path must exist unless `allow_missing` is set,
/// which `config --init` uses to create it.
fn effective_config(cli: &Cli, path: &Path, allow_missing: bool) -> anyhow::Result<MinerConfig> {
    let exists = path.exists();
    if cli.config.is_some() && !exists && !allow_missing {
        anyhow::bail!("No settings file found at {}", path.display());
    }

    let mut config = settings::load_or_default(path)?;
    if !exists {
        config.workers = num_cpus::get();
    }
    if let Some(iterations) = cli.iterations {
        config.hardening_iterations = iterations;
    }
    if let Some(threads) = cli.threads {
        config.workers = threads;
    }
    if let Some(partition) = cli.partition {
        config.partition = partition.into();
    }
    config.validate()?;
    Ok(config)
}

fn now_unix() -> anyhow::Result<i64> {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    Ok(i64::try_from(secs)?)
}

/// Bind the axiom to its seed; the phrase itself is dropped here
fn read_seed(axiom: Option<String>) -> anyhow::Result<Seed> {
    let phrase = match axiom {
        Some(p) => Zeroizing::new(p),
        None => prompt_axiom(&mut io::stdin().lock(), &mut io::stderr())?,
    };
    Ok(algorithm::bind(&phrase)?)
}

/// Ask for the axiom on `prompt`, keeping stdout free for command output
fn prompt_axiom(input: &mut impl BufRead, prompt: &mut impl Write) -> io::Result<Zeroizing<String>> {
    writeln!(prompt, "Enter your 13-word axiom:")?;
    prompt.flush()?;
    let mut phrase = Zeroizing::new(String::new());
    input.read_line(&mut phrase)?;
    Ok(phrase)
}

fn cmd_mine(
    axiom: Option<String>,
    config: MinerConfig,
    request: MineRequest,
    json: bool,
) -> anyhow::Result<()> {
    let seed = read_seed(axiom)?;
    let miner = Miner::new(config)?;

    if !json {
        println!("\n=== Tetra-PoW Miner ===");
        println!("Seed:        {}", seed.fingerprint());
        println!("Difficulty:  {} bytes", request.difficulty);
        println!("Threads:     {}", miner.config().workers);
        println!("Iterations:  {}", miner.config().hardening_iterations);
        println!("Timestamp:   {}", request.start_timestamp);
        println!("Max attempts: {}", request.max_attempts);
        println!("=======================\n");
    }

    let report = miner.mine(&seed, &request, &CancelToken::new())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &report.solution {
        Some(solution) => {
            println!("Found valid proof!");
            println!("  Nonce:     {}", solution.nonce);
            println!("  Timestamp: {}", solution.timestamp);
            println!("  Digest:    {}", hex::encode(solution.digest));
            println!("  Token:     {}", solution.token);
        }
        None => println!("No proof found ({:?}).", report.state),
    }
    println!(
        "  Attempts:  {} ({:.2} H/s, {:.2}s)",
        report.attempts,
        report.hashrate(),
        report.elapsed.as_secs_f64()
    );

    if !report.success() {
        println!("\nTip: Try increasing --max-attempts or decreasing --difficulty");
    }

    Ok(())
}

fn cmd_verify(
    axiom: Option<String>,
    config: MinerConfig,
    nonce: u64,
    timestamp: i64,
    difficulty: u32,
) -> anyhow::Result<()> {
    let seed = read_seed(axiom)?;
    let miner = Miner::new(config)?;
    let verification = miner.verify(&seed, nonce, timestamp, difficulty)?;

    if verification.valid {
        println!("VALID proof");
    } else {
        println!("INVALID proof");
    }
    println!("Digest: {}", hex::encode(verification.digest));
    if let Some(token) = verification.token {
        println!("Token:  {}", token);
    }

    Ok(())
}

fn cmd_harden(input_hex: &str, salt_hex: &str, iterations: u32, out_len: usize) -> anyhow::Result<()> {
    let input = hex::decode(input_hex).map_err(|e| anyhow::anyhow!("Invalid input hex: {}", e))?;
    let salt = hex::decode(salt_hex).map_err(|e| anyhow::anyhow!("Invalid salt hex: {}", e))?;

    let start = Instant::now();
    let derived = algorithm::harden(&input, &salt, iterations, out_len)?;

    println!("{}", hex::encode(derived));
    eprintln!(
        "({} iterations in {:.2}s)",
        iterations,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn cmd_seed(axiom: Option<String>) -> anyhow::Result<()> {
    let seed = read_seed(axiom)?;
    println!("{}", seed);
    Ok(())
}

fn cmd_benchmark(config: MinerConfig, count: u32) -> anyhow::Result<()> {
    println!("Running benchmark with {} candidates...", count);

    let miner = Miner::new(config)?;
    let seed = algorithm::bind(algorithm::CANONICAL_AXIOM)?;
    let pow = miner.pipeline(seed);

    let start = Instant::now();

    for nonce in 0..u64::from(count) {
        pow.digest(nonce, 0)?;
    }

    let elapsed = start.elapsed();
    let secs = elapsed.as_secs_f64();
    let hashrate = if secs > 0.0 { f64::from(count) / secs } else { 0.0 };

    println!("\nResults:");
    println!("  Total candidates: {}", count);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s (single thread)", hashrate);

    println!("\nAlgorithm parameters:");
    println!("  Rounds: {}", algorithm::ROUND_COUNT);
    println!(
        "  Hardening: every {} rounds, {} iterations",
        algorithm::HARDENING_INTERVAL,
        pow.hardening().iterations()
    );
    println!("  Buffer: {} bytes", algorithm::BUFFER_SIZE);

    Ok(())
}

fn cmd_config(config: MinerConfig, init: bool, path: &Path) -> anyhow::Result<()> {
    if init {
        settings::save(&config, path)?;
        println!("Settings written to {}", path.display());
    } else {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tetrapow").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_config_init_creates_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("new.json");
        let path_arg = path.to_str().unwrap();

        run(parse(&["--config", path_arg, "--threads", "3", "config", "--init"])).unwrap();

        assert!(path.exists());
        let saved = settings::load_or_default(&path).unwrap();
        assert_eq!(saved.workers, 3);
    }

    #[test]
    fn test_missing_explicit_path_rejected_without_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let path_arg = path.to_str().unwrap();

        assert!(run(parse(&["--config", path_arg, "config"])).is_err());
        assert!(run(parse(&["--config", path_arg, "seed", "--axiom", algorithm::CANONICAL_AXIOM])).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_axiom_prompt_goes_to_prompt_writer() {
        let mut input = Cursor::new(format!("{}\n", algorithm::CANONICAL_AXIOM));
        let mut prompt = Vec::new();

        let phrase = prompt_axiom(&mut input, &mut prompt).unwrap();

        assert_eq!(String::from_utf8(prompt).unwrap(), "Enter your 13-word axiom:\n");
        assert_eq!(
            algorithm::bind(&phrase).unwrap(),
            algorithm::bind(algorithm::CANONICAL_AXIOM).unwrap()
        );
    }

    #[test]
    fn test_benchmark_rejects_zero_count() {
        let result = Cli::try_parse_from(["tetrapow", "benchmark", "--count", "0"]);
        assert!(result.is_err());

        let cli = parse(&["benchmark", "--count", "1"]);
        assert!(matches!(cli.command, Commands::Benchmark { count: 1 }));
    }
}
