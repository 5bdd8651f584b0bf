//! Subcommand runners for the `ntkit` binary.
//!
//! Both drivers read whitespace-separated integers from stdin, print their
//! results and per-stage wall-clock milliseconds to stdout, and propagate
//! library errors up to `main` (which maps them to exit code 1). All
//! diagnostics go through `tracing` on stderr so stdout stays parseable.

use std::io::Read;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rug::rand::RandState;
use rug::Integer;
use tracing::info;

use ntkit::dlog::pohlig_hellman;
use ntkit::factor::pollard_rho_prime_power_decomposition;
use ntkit::generator::find_generator;
use ntkit::primality::{eratosthenes_sieve, next_prime_above};
use ntkit::qsieve::{find_B, quadratic_sieve};
use ntkit::SMALL_PRIME_LIMIT;

fn read_stdin_integers(expected: usize) -> Result<Vec<Integer>> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading stdin")?;
    let mut values = Vec::with_capacity(expected);
    for token in input.split_whitespace().take(expected) {
        let value: Integer = token
            .parse()
            .with_context(|| format!("expected an integer on stdin, got {token:?}"))?;
        values.push(value);
    }
    if values.len() < expected {
        anyhow::bail!(
            "expected {expected} integer(s) on stdin, got {}",
            values.len()
        );
    }
    Ok(values)
}

/// The discrete-log pipeline: prime above N, factorization of n − 1,
/// generator, Pohlig–Hellman.
pub fn run_dlog(timeout: Duration, mr_rounds: Option<u32>, rng: &mut RandState) -> Result<()> {
    let inputs = read_stdin_integers(2)?;
    let (lower, h) = (&inputs[0], &inputs[1]);
    let sieve = eratosthenes_sieve(SMALL_PRIME_LIMIT);

    let stage = Instant::now();
    let (n, rounds) = next_prime_above(lower, &sieve, mr_rounds, rng)?;
    println!("Smallest prime n greater than N: {n}");
    println!("Miller-Rabin rounds used: {rounds}");
    println!("Computed in {}ms.", stage.elapsed().as_millis());
    println!();

    let phi = Integer::from(&n - 1u32);
    let stage = Instant::now();
    let f = pollard_rho_prime_power_decomposition(&phi, &sieve, timeout, rng)?;
    println!("Prime-power decomposition of n - 1: {f}");
    println!("Computed in {}ms.", stage.elapsed().as_millis());
    println!();

    let stage = Instant::now();
    let g = find_generator(&n, &phi, &f, timeout, rng)?;
    println!("Generator: g = {g}");
    println!("Computed in {}ms.", stage.elapsed().as_millis());
    println!();

    let stage = Instant::now();
    let x = pohlig_hellman(&g, h, &n, &f, timeout)?;
    println!("Discrete log of h base g: {x}");
    println!("Computed in {}ms.", stage.elapsed().as_millis());

    info!(%n, %g, %x, "discrete log pipeline finished");
    Ok(())
}

/// The quadratic-sieve driver: print B, then the discovered factor.
pub fn run_qsieve(timeout: Duration, _rng: &mut RandState) -> Result<()> {
    let inputs = read_stdin_integers(1)?;
    let n = &inputs[0];

    let stage = Instant::now();
    let bound = find_B(n)?;
    println!("Running the quadratic sieve with primes up to B = {bound}");
    let d = quadratic_sieve(n, timeout)?;
    println!("Found factor of n: {d}");
    println!("Computed in {}ms.", stage.elapsed().as_millis());

    info!(%n, %d, "quadratic sieve finished");
    Ok(())
}
