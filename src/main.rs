//! # Main — CLI entry point
//!
//! Two subcommands over stdin/stdout:
//!
//! - `ntkit dlog` — read N and h, find the smallest prime n > N, a
//!   generator g of (Z/nZ)*, and the discrete log of h base g.
//! - `ntkit qsieve` — read a composite N and find a non-trivial factor
//!   with the quadratic sieve.
//!
//! Timeouts, Miller–Rabin rounds, and the RNG seed are global flags; a
//! fixed `--seed` makes a run fully reproducible. Timeout and no-solution
//! failures print a human-readable reason and exit 1.

mod cli;

use std::time::Duration;

use clap::{Parser, Subcommand};
use rug::rand::RandState;
use rug::Integer;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "ntkit",
    about = "Number-theoretic toolkit: Pohlig-Hellman discrete logs and quadratic-sieve factoring"
)]
struct Cli {
    /// Wall-clock budget in seconds for each potentially unbounded stage
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// Seed for the random state; omit for a time-based seed
    #[arg(long, env = "NTKIT_SEED")]
    seed: Option<u64>,

    /// Override the Miller-Rabin repetition count (default: max(10, digits))
    #[arg(long)]
    mr_rounds: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve g^x = h (mod n) for the smallest prime n > N; reads N and h from stdin
    Dlog,
    /// Find a non-trivial factor of N with the quadratic sieve; reads N from stdin
    Qsieve,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    let mut rng = RandState::new();
    rng.seed(&Integer::from(seed));
    debug!(seed, "random state seeded");

    let timeout = Duration::from_secs(cli.timeout);
    let result = match cli.command {
        Command::Dlog => cli::run_dlog(timeout, cli.mr_rounds, &mut rng),
        Command::Qsieve => cli::run_qsieve(timeout, &mut rng),
    };

    if let Err(err) = result {
        // The generator escape path reports its best witness before failing.
        if let Some(ntkit::Error::GeneratorTimeout { witness, order, .. }) =
            err.downcast_ref::<ntkit::Error>()
        {
            println!("Highest-order element found: g' = {witness}");
            println!("Order of g': {order}");
        }
        println!("{err:#}");
        std::process::exit(1);
    }
}
