//! Library error type.
//!
//! One enum for the failure kinds the engine can produce, so the driver can
//! map them onto exit codes without string matching: contract violations,
//! missing modular inverses, genuinely unsolvable instances, and cooperative
//! deadline expiry. Generator search gets its own timeout variant because it
//! carries the best maximal-order witness found so far as a diagnostic.

use std::time::Duration;

use rug::Integer;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A caller broke a documented contract (e.g. Pollard's rho on a prime,
    /// mismatched CRT list lengths, a modulus with |n| < 2).
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A negative exponent required an inverse that does not exist.
    #[error("{value} has no inverse modulo {modulus}")]
    NoInverse { value: Integer, modulus: Integer },

    /// The instance has no answer to give (BSGS target outside the subgroup,
    /// quadratic sieve out of useful congruences).
    #[error("no solution: {0}")]
    NoSolution(&'static str),

    /// A wall-clock deadline expired inside an unbounded loop.
    #[error("timed out after {limit:?} in {stage}")]
    Timeout {
        stage: &'static str,
        limit: Duration,
    },

    /// Generator search hit its deadline. Carries the highest-order element
    /// seen and its order so the driver can report how close the search got.
    #[error(
        "timed out after {limit:?} searching for a generator; \
         best witness {witness} has order {order}"
    )]
    GeneratorTimeout {
        witness: Integer,
        order: Integer,
        limit: Duration,
    },
}
