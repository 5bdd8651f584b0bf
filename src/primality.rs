//! Primality testing and prime generation.
//!
//! The Miller test with a single base, randomized Miller–Rabin on top of a
//! small-prime trial division pass, the sieve of Eratosthenes, and the
//! next-prime search the discrete-log pipeline starts with.
//!
//! Miller–Rabin here answers "probably prime" / "certainly composite": it
//! never calls an even n > 2 prime and never calls a true prime composite.

use rug::ops::RemRounding;
use rug::rand::RandState;
use rug::Integer;

use crate::arith::{gcd, ilog10};
use crate::error::Result;
use crate::modular::pow_mod;

/// Split n = 2^s · t with t odd. `oddify(40) = (3, 5)`.
pub fn oddify(n: &Integer) -> (u32, Integer) {
    let s = n.find_one(0).unwrap_or(0);
    (s, Integer::from(n >> s))
}

/// Default Miller–Rabin repetition count: max(10, ⌊log₁₀ n⌋ + 1).
pub fn default_rounds(n: &Integer) -> u32 {
    (ilog10(n) + 1).max(10)
}

/// One Miller round with base b, where n − 1 = 2^k · q and q is odd.
///
/// Returns true when n is possibly prime under this base: bases sharing a
/// factor with n are inconclusive, as is b^q ≡ ±1 or any squaring
/// b^(q·2^i) ≡ −1. Returns false when n is certainly composite. Even n is
/// composite except ±2.
pub fn miller_test(n: &Integer, b: &Integer, k: u32, q: &Integer) -> Result<bool> {
    if n.cmp_abs(&Integer::from(2)) == std::cmp::Ordering::Equal {
        return Ok(true);
    }
    if n.is_even() {
        return Ok(false);
    }
    if gcd(n, b) != 1 {
        return Ok(true);
    }
    let minus_one = Integer::from(n - 1u32);
    let mut r = pow_mod(b, q, n)?;
    if r == 1 || r == minus_one {
        return Ok(true);
    }
    for _ in 0..k {
        r.square_mut();
        r = r.rem_euc(n);
        if r == minus_one {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Randomized Miller–Rabin.
///
/// Takes |n| first, rejects n < 2, accepts 2, then trial-divides by the
/// provided small primes — a hit means composite unless n *is* that prime.
/// Survivors face `rep` Miller rounds (default [`default_rounds`]) with
/// bases drawn uniformly from [2, n − 1].
pub fn prime_miller_rabin(
    n: &Integer,
    small_primes: &[u64],
    rep: Option<u32>,
    rng: &mut RandState,
) -> Result<bool> {
    let n = Integer::from(n.abs_ref());
    if n < 2 {
        return Ok(false);
    }
    if n == 2 {
        return Ok(true);
    }
    for &p in small_primes {
        let p = Integer::from(p);
        if n.is_divisible(&p) {
            return Ok(n == p);
        }
    }
    let rep = rep.unwrap_or_else(|| default_rounds(&n));
    let (k, q) = oddify(&Integer::from(&n - 1u32));
    for _ in 0..rep {
        let b = Integer::from(&n - 2u32).random_below(rng) + 2u32;
        if !miller_test(&n, &b, k, &q)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// All primes in [2, n] by the sieve of Eratosthenes, O(n log log n).
pub fn eratosthenes_sieve(n: u64) -> Vec<u64> {
    if n < 2 {
        return Vec::new();
    }
    let n = n as usize;
    let mut is_prime = vec![true; n + 1];
    is_prime[0] = false;
    is_prime[1] = false;
    let mut i = 2usize;
    while i * i <= n {
        if is_prime[i] {
            let mut j = i * i;
            while j <= n {
                is_prime[j] = false;
                j += i;
            }
        }
        i += 1;
    }
    let mut primes = Vec::with_capacity(estimate_prime_count(n));
    for (v, &keep) in is_prime.iter().enumerate() {
        if keep {
            primes.push(v as u64);
        }
    }
    primes
}

/// Capacity hint from the prime counting function, π(n) ≈ n / ln n.
fn estimate_prime_count(n: usize) -> usize {
    if n < 10 {
        return 4;
    }
    let nf = n as f64;
    (1.3 * nf / nf.ln()) as usize
}

/// The smallest probable prime strictly greater than `lower`: start at
/// (lower + 1) | 1 and step by 2 until Miller–Rabin accepts. Returns the
/// prime together with the repetition count used for every candidate.
pub fn next_prime_above(
    lower: &Integer,
    small_primes: &[u64],
    rep: Option<u32>,
    rng: &mut RandState,
) -> Result<(Integer, u32)> {
    let mut n = Integer::from(lower + 1u32) | 1u32;
    let rounds = rep.unwrap_or_else(|| default_rounds(&n));
    while !prime_miller_rabin(&n, small_primes, Some(rounds), rng)? {
        n += 2u32;
    }
    Ok((n, rounds))
}
