//! # ntkit — Number-Theoretic Primitives for Public-Key Experiments
//!
//! Building blocks for two end-to-end computations over arbitrary-precision
//! integers:
//!
//! 1. **Discrete logarithm**: given a lower bound N and a target h, find the
//!    smallest prime n > N, a generator g of (Z/nZ)*, and the x with
//!    g^x ≡ h (mod n) via Pohlig–Hellman reduction.
//! 2. **Factoring**: given a composite N, find a non-trivial factor with the
//!    quadratic sieve.
//!
//! ## Module Organization
//!
//! **Foundation:**
//! - [`arith`] — integer square root, base-10 logarithm, GCD and extended
//!   GCD, polynomial evaluation (Pollard's iteration functions).
//! - [`modular`] — modular exponentiation and inverse, CRT, Legendre-symbol
//!   residue test, Tonelli–Shanks square roots, order and subgroup helpers.
//! - [`primality`] — Miller test, randomized Miller–Rabin, the sieve of
//!   Eratosthenes, next-prime search.
//! - [`linalg`] — dense vectors and matrices of big integers, GF(2)
//!   elimination, null-space extraction.
//!
//! **Engines:**
//! - [`factor`] — `factor_out`, limited-prime trial factorization, Pollard's
//!   rho, recursive prime-power decomposition.
//! - [`generator`] — probabilistic primitive-root search with a
//!   maximal-order-witness escape path.
//! - [`dlog`] — baby-step/giant-step and Pohlig–Hellman.
//! - [`qsieve`] — B-smooth relation collection and the quadratic sieve.
//! - [`rsa`] — toy RSA keygen on top of the primality test (experiments
//!   only; no padding).
//!
//! ## Shared Conventions
//!
//! All values are [`rug::Integer`]; residues are the non-negative
//! representative for positive moduli. Routines that sample (Miller–Rabin
//! bases, rho restarts, generator draws) take an explicit
//! [`rug::rand::RandState`] so a fixed seed reproduces a run exactly.
//! Routines that can run unbounded take a [`Duration`] budget and surface
//! [`Error::Timeout`] when it expires.

pub mod arith;
pub mod dlog;
pub mod error;
pub mod factor;
pub mod generator;
pub mod linalg;
pub mod modular;
pub mod primality;
pub mod qsieve;
pub mod rsa;

use std::time::{Duration, Instant};

pub use error::{Error, Result};

/// Default wall-clock budget for the loops that can diverge on hostile
/// inputs (Pollard's rho, BSGS, generator search, sieve collection).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Sieve bound for the small-prime table the drivers feed into trial
/// division and recursive factorization.
pub const SMALL_PRIME_LIMIT: u64 = 1000;

/// A started wall-clock budget.
///
/// Cancellation is cooperative: loops call [`Deadline::check`] at their
/// checkpoints and propagate [`Error::Timeout`] upward. Nested budgets
/// compose by construction — an inner routine simply starts its own.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn start(limit: Duration) -> Self {
        Deadline {
            started: Instant::now(),
            limit,
        }
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.started.elapsed() >= self.limit
    }

    /// Error out with the stage name if the budget is spent.
    #[inline]
    pub fn check(&self, stage: &'static str) -> Result<()> {
        if self.expired() {
            Err(Error::Timeout {
                stage,
                limit: self.limit,
            })
        } else {
            Ok(())
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}
