//! Integer factorization: prime-power bookkeeping, trial division against a
//! fixed factor base, Pollard's rho, and the recursive prime-power
//! decomposition the discrete-log pipeline runs on n − 1.
//!
//! Pollard's rho is Floyd's tortoise-and-hare over a pseudorandom
//! polynomial, initially x² + 1; whenever the cycle collapses (gcd = n) the
//! walk restarts from a fresh random point with fresh random coefficients.
//! Restarts repeat until the wall-clock budget runs out.

use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt;
use std::time::Duration;

use rug::ops::{Pow, RemRounding};
use rug::rand::RandState;
use rug::Integer;

use crate::arith::Poly;
use crate::error::{Error, Result};
use crate::primality::prime_miller_rabin;
use crate::Deadline;

/// How often the rho inner loop looks at the wall clock.
const DEADLINE_STRIDE: u32 = 256;

/// A prime-power decomposition: prime → exponent.
///
/// Keys are positive primes, except the sentinel −1 which carries the sign
/// of a factored signed value with exponent 0 or 1. When the sign key is
/// absent, ∏ p^e reproduces the decomposed absolute value. Zero exponents
/// are stored deliberately — the quadratic sieve reads a full row per
/// factor-base prime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrimePowers {
    powers: BTreeMap<Integer, u32>,
}

impl PrimePowers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single entry p^e.
    pub fn from_prime(p: Integer, e: u32) -> Self {
        let mut powers = BTreeMap::new();
        powers.insert(p, e);
        PrimePowers { powers }
    }

    /// Build from (prime, exponent) pairs; exponents of repeated primes add.
    pub fn from_pairs(pairs: &[(i64, u32)]) -> Self {
        let mut out = PrimePowers::new();
        for &(p, e) in pairs {
            out.add(Integer::from(p), e);
        }
        out
    }

    /// Set the exponent of p, inserting it if new.
    pub fn set(&mut self, p: Integer, e: u32) {
        self.powers.insert(p, e);
    }

    /// Add e to the exponent of p (multiset union semantics).
    pub fn add(&mut self, p: Integer, e: u32) {
        match self.powers.entry(p) {
            Entry::Occupied(mut slot) => *slot.get_mut() += e,
            Entry::Vacant(slot) => {
                slot.insert(e);
            }
        }
    }

    /// Exponent of p, 0 when absent.
    pub fn get(&self, p: &Integer) -> u32 {
        self.powers.get(p).copied().unwrap_or(0)
    }

    /// Multiset sum with another decomposition.
    pub fn merge(&mut self, other: PrimePowers) {
        for (p, e) in other.powers {
            self.add(p, e);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Integer, u32)> {
        self.powers.iter().map(|(p, &e)| (p, e))
    }

    /// The prime keys, sign sentinel excluded.
    pub fn primes(&self) -> impl Iterator<Item = &Integer> {
        self.powers.keys().filter(|p| **p >= 2)
    }

    pub fn len(&self) -> usize {
        self.powers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }

    /// ∏ p^e over every key, the −1 sentinel included (so a sign exponent
    /// of 1 makes the product negative).
    pub fn product(&self) -> Integer {
        let mut acc = Integer::from(1);
        for (p, &e) in &self.powers {
            acc *= Integer::from(p.pow(e));
        }
        acc
    }

    /// Halve every exponent, for turning an even exponent-sum row into the
    /// square root of its product. Odd exponents are a contract violation.
    pub fn halved(&self) -> Result<PrimePowers> {
        let mut out = BTreeMap::new();
        for (p, &e) in &self.powers {
            if e % 2 != 0 {
                return Err(Error::Precondition(format!(
                    "cannot halve exponents: {p} appears with odd exponent {e}"
                )));
            }
            out.insert(p.clone(), e / 2);
        }
        Ok(PrimePowers { powers: out })
    }
}

impl fmt::Display for PrimePowers {
    /// `{2: 3, 5: 1}`, ascending by key.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (p, e)) in self.powers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}: {e}")?;
        }
        write!(f, "}}")
    }
}

/// Strip all p-powers out of n: returns (u, α) with n = p^α · u and p ∤ u.
///
/// Requires n ≠ 0 and |p| ≥ 2; both hold at every call site (the trial
/// loops skip the sign sentinel and reject zero up front).
pub fn factor_out(n: &Integer, p: &Integer) -> (Integer, u32) {
    debug_assert!(*n != 0 && p.cmp_abs(&Integer::from(1)) == std::cmp::Ordering::Greater);
    let mut u = n.clone();
    let mut alpha = 0u32;
    while u.is_divisible(p) {
        u /= p;
        alpha += 1;
    }
    (u, alpha)
}

/// Factor n against a fixed ordered prime list, recording an exponent for
/// every listed prime (zero included) and returning the unfactored residue.
///
/// A leading −1 in the list is treated as a sign column: it gets exponent 1
/// for negative n and 0 otherwise, and the remaining primes divide |n|.
/// The residue is 1 exactly when n is smooth over the list. Rejects n = 0.
pub fn factor_with_limited_primes(
    n: &Integer,
    primes: &[Integer],
) -> Result<(PrimePowers, Integer)> {
    if *n == 0 {
        return Err(Error::Precondition(
            "factor_with_limited_primes: n must be non-zero".into(),
        ));
    }
    let mut powers = PrimePowers::new();
    let mut rest = primes;
    if let Some(first) = primes.first() {
        if *first == -1 {
            powers.set(Integer::from(-1), u32::from(*n < 0));
            rest = &primes[1..];
        }
    }
    let mut u = Integer::from(n.abs_ref());
    for p in rest {
        let (next, alpha) = factor_out(&u, p);
        u = next;
        powers.set(p.clone(), alpha);
    }
    Ok((powers, u))
}

/// Euler's totient of x from its factorization: x · ∏ (p − 1)/p.
/// The −1 sign sentinel, if present, is ignored.
pub fn totient(x: &Integer, f: &PrimePowers) -> Integer {
    let mut phi = x.clone();
    for p in f.primes() {
        phi = Integer::from(&phi * &Integer::from(p - 1u32)) / p;
    }
    phi
}

/// Pollard's rho with Floyd cycle detection.
///
/// Walks T ← f(T) mod n against H ← f(f(H)) mod n and tests
/// d = gcd(T − H, n) each step; 1 < d < n is a hit. d = n collapses the
/// walk, which then restarts with a random starting value and random
/// polynomial coefficients in [0, n). The caller guarantees n is composite
/// — a probable prime is rejected up front.
pub fn pollard_rho_factor(
    n: &Integer,
    timeout: Duration,
    rng: &mut RandState,
) -> Result<Integer> {
    if prime_miller_rabin(n, &[], None, rng)? {
        return Err(Error::Precondition(format!(
            "pollard_rho_factor called on {n}, which looks prime"
        )));
    }
    let deadline = Deadline::start(timeout);
    let mut start = Integer::from(2);
    let mut poly = Poly::new(vec![Integer::from(1), Integer::new(), Integer::from(1)]);
    let mut tick = 0u32;
    while !deadline.expired() {
        let mut tortoise = start.clone();
        let mut hare = start.clone();
        let mut steps = Integer::new();
        'walk: while steps < *n {
            tortoise = poly.evaluate(&tortoise).rem_euc(n);
            hare = poly.evaluate(&poly.evaluate(&hare).rem_euc(n)).rem_euc(n);
            let d = Integer::from(&tortoise - &hare).gcd(n);
            if d > 1 && d < *n {
                return Ok(d);
            }
            if d == *n {
                start = n.clone().random_below(rng);
                poly = Poly::new(vec![
                    n.clone().random_below(rng),
                    n.clone().random_below(rng),
                    n.clone().random_below(rng),
                ]);
                break 'walk;
            }
            steps += 1u32;
            tick = tick.wrapping_add(1);
            if tick % DEADLINE_STRIDE == 0 {
                deadline.check("pollard_rho_factor")?;
            }
        }
    }
    Err(Error::Timeout {
        stage: "pollard_rho_factor",
        limit: timeout,
    })
}

/// Full prime-power decomposition of n ≥ 1 via Pollard's rho.
///
/// 1 decomposes to the empty map; a probable prime n contributes its
/// accumulated multiplicity; otherwise a factor is taken from the supplied
/// small primes when one divides n, from rho when none does, and both the
/// factor and its cofactor recurse. The multiplicity bookkeeping passes
/// `count + α − 1` into the factor branch when the factor occurs α times,
/// so repeated factors end up with the right exponent at the prime leaves.
pub fn pollard_rho_prime_power_decomposition(
    n: &Integer,
    small_primes: &[u64],
    timeout: Duration,
    rng: &mut RandState,
) -> Result<PrimePowers> {
    if *n < 1 {
        return Err(Error::Precondition(format!(
            "prime-power decomposition requires n >= 1, got {n}"
        )));
    }
    decompose(n, small_primes, 1, timeout, rng)
}

fn decompose(
    n: &Integer,
    small_primes: &[u64],
    count: u32,
    timeout: Duration,
    rng: &mut RandState,
) -> Result<PrimePowers> {
    if *n == 1 {
        return Ok(PrimePowers::new());
    }
    if prime_miller_rabin(n, small_primes, None, rng)? {
        return Ok(PrimePowers::from_prime(n.clone(), count));
    }
    let mut factor = None;
    for &p in small_primes {
        let p = Integer::from(p);
        if n.is_divisible(&p) {
            factor = Some(p);
            break;
        }
    }
    let x = match factor {
        Some(p) => p,
        None => pollard_rho_factor(n, timeout, rng)?,
    };
    let (y, alpha) = factor_out(n, &x);
    let mut decomposition = decompose(&x, small_primes, count + alpha - 1, timeout, rng)?;
    decomposition.merge(decompose(&y, small_primes, count, timeout, rng)?);
    Ok(decomposition)
}
