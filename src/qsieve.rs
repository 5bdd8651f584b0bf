//! The quadratic sieve.
//!
//! Factors a composite n by hunting for congruences a² ≡ b² (mod n):
//!
//! 1. Pick the smoothness bound B from the classic L-function heuristic.
//! 2. Sieve primes up to B and keep those with (n/p) = 1 (Euler pre-sieve);
//!    prepend −1 as a sign column. This is the factor base.
//! 3. Walk x outward from ⌈√n⌉ in both directions, keeping every x whose
//!    x² − n is fully smooth over the base, until |base| + 5 relations are
//!    banked or the candidates run out.
//! 4. Assemble the exponent matrix (rows = base entries, columns =
//!    relations), extract a GF(2) null-space basis, and try every subset
//!    combination: each one multiplies into a² ≡ b² (mod n), and
//!    gcd(a − b, n) strictly between 1 and n is a factor.
//!
//! Inputs are capped at 10^120 — beyond that the f64 bound computation and
//! the dense matrix both stop being honest.

use std::collections::HashSet;
use std::time::Duration;

use rug::Integer;

use crate::arith::{ilog10, isqrt_ceil};
use crate::error::{Error, Result};
use crate::factor::{factor_with_limited_primes, PrimePowers};
use crate::linalg::{kernel, Matrix};
use crate::modular::is_square;
use crate::primality::eratosthenes_sieve;
use crate::Deadline;

/// Largest supported input magnitude, as a power of ten.
const MAX_MAGNITUDE: u32 = 120;

/// Extra relations collected beyond the factor-base size, so the kernel
/// has dimension to spare.
const RELATION_SURPLUS: usize = 5;

/// The smoothness bound B = ⌈exp(√(ln n · ln ln n))^(1/√2)⌉ + 1.
///
/// Evaluation order matters for f64 parity with the reference table
/// (`find_B(87463) = 43`, `find_B(100) = 8`, `find_B(10) = 4`): the inner
/// exponential is computed first, then raised to 1/√2, then rounded.
#[allow(non_snake_case)]
pub fn find_B(n: &Integer) -> Result<u64> {
    if *n < 3 {
        return Err(Error::Precondition(format!(
            "find_B requires n >= 3, got {n}"
        )));
    }
    let ln = n.to_f64().ln();
    let u = (ln * ln.ln()).sqrt().exp();
    let b = u.powf(1.0 / std::f64::consts::SQRT_2);
    Ok(b.ceil() as u64 + 1)
}

/// Euler pre-sieve: keep the primes p for which n is a quadratic residue
/// mod p — only those can ever divide x² − n.
pub fn euler_presieve(n: &Integer, primes: &[u64]) -> Result<Vec<u64>> {
    let mut kept = Vec::with_capacity(primes.len());
    for &p in primes {
        if is_square(n, &Integer::from(p))? {
            kept.push(p);
        }
    }
    Ok(kept)
}

/// Sieve parameters: the bound B, the relation target M = |base| + 5, and
/// the factor base with its −1 sign column.
#[derive(Clone, Debug)]
pub struct SieveParams {
    pub bound: u64,
    pub target: usize,
    pub base: Vec<Integer>,
}

/// Compute B, build and pre-sieve the factor base, fix the relation target.
pub fn setup(n: &Integer) -> Result<SieveParams> {
    let bound = find_B(n)?;
    let kept = euler_presieve(n, &eratosthenes_sieve(bound))?;
    let mut base = Vec::with_capacity(kept.len() + 1);
    base.push(Integer::from(-1));
    base.extend(kept.into_iter().map(Integer::from));
    let target = base.len() + RELATION_SURPLUS;
    Ok(SieveParams {
        bound,
        target,
        base,
    })
}

/// One banked smooth value: x, x² − n, and the full exponent row of
/// x² − n over the factor base (residue 1 by construction).
#[derive(Clone, Debug)]
pub struct SmoothRelation {
    pub x: Integer,
    pub value: Integer,
    pub powers: PrimePowers,
}

enum Collection {
    /// x² hit n exactly — x is a factor, no sieving needed.
    ExactRoot(Integer),
    Relations(Vec<SmoothRelation>),
}

/// Walk x = x₀ ± j outward from x₀ = ⌈√n⌉, banking smooth relations until
/// the target count is reached, both directions are exhausted (x ≤ 0 on
/// the left, x > n on the right), or the deadline expires.
fn collect_relations(
    n: &Integer,
    params: &SieveParams,
    deadline: &Deadline,
) -> Result<Collection> {
    let x0 = isqrt_ceil(n)?;
    let mut relations: Vec<SmoothRelation> = Vec::with_capacity(params.target);
    let mut seen: HashSet<Integer> = HashSet::new();
    let mut j = Integer::new();
    loop {
        let right = Integer::from(&x0 + &j);
        let left = Integer::from(&x0 - &j);
        if relations.len() >= params.target || (left <= 0 && right > *n) {
            return Ok(Collection::Relations(relations));
        }
        for x in [right, left] {
            if x <= 0 || x > *n || seen.contains(&x) {
                continue;
            }
            let square = Integer::from(&x * &x);
            if square == *n {
                return Ok(Collection::ExactRoot(x));
            }
            let value = square - n;
            let (powers, residue) = factor_with_limited_primes(&value, &params.base)?;
            if residue == 1 {
                relations.push(SmoothRelation {
                    x: x.clone(),
                    value,
                    powers,
                });
            }
            seen.insert(x);
        }
        j += 1u32;
        deadline.check("quadratic sieve relation collection")?;
    }
}

/// The exponent matrix: one row per factor-base entry, one column per
/// relation, entries the exponent of that base entry in x² − n.
pub fn power_matrix(relations: &[SmoothRelation], base: &[Integer]) -> Matrix {
    base.iter()
        .map(|p| {
            relations
                .iter()
                .map(|r| Integer::from(r.powers.get(p)))
                .collect()
        })
        .collect()
}

/// Try every {0,1}-combination of the kernel basis. Each combination
/// selects a subset T of relations with coordinate-wise even exponent
/// sums; a = ∏ x over T, b = ∏ p^(Σe/2) over the base, and any
/// gcd(a − b, n) strictly inside (1, n) wins.
fn combine(
    n: &Integer,
    relations: &[SmoothRelation],
    basis: &[Vec<Integer>],
) -> Result<Integer> {
    let dim = basis.len();
    if dim >= u64::BITS as usize {
        // 2^64 combinations will never be walked anyway; log that the
        // enumeration is truncated instead of pretending it is complete.
        tracing::warn!(dim, "kernel dimension exceeds enumerable range");
    }
    let dim = dim.min(u64::BITS as usize - 1);
    for mask in 1u64..(1u64 << dim) {
        let mut selected = vec![false; relations.len()];
        for (bit, vector) in basis.iter().take(dim).enumerate() {
            if mask & (1 << bit) == 0 {
                continue;
            }
            for (slot, coord) in selected.iter_mut().zip(vector) {
                if coord.is_odd() {
                    *slot = !*slot;
                }
            }
        }
        let mut a = Integer::from(1);
        let mut combined = PrimePowers::new();
        let mut any = false;
        for (rel, &keep) in relations.iter().zip(&selected) {
            if keep {
                a *= &rel.x;
                combined.merge(rel.powers.clone());
                any = true;
            }
        }
        if !any {
            continue;
        }
        let b = combined.halved()?.product();
        let d = Integer::from(&a - &b).gcd(n);
        if d > 1 && d < *n {
            return Ok(d);
        }
    }
    Err(Error::NoSolution(
        "quadratic sieve: every kernel combination produced a trivial divisor",
    ))
}

/// Find a non-trivial factor of the composite n with the quadratic sieve.
pub fn quadratic_sieve(n: &Integer, timeout: Duration) -> Result<Integer> {
    if *n < 3 {
        return Err(Error::Precondition(format!(
            "quadratic_sieve requires n >= 3, got {n}"
        )));
    }
    if ilog10(n) > MAX_MAGNITUDE {
        return Err(Error::Precondition(format!(
            "quadratic_sieve supports n up to 10^{MAX_MAGNITUDE}, got a {}-digit input",
            ilog10(n) + 1
        )));
    }
    let deadline = Deadline::start(timeout);
    let params = setup(n)?;
    tracing::debug!(bound = params.bound, base = params.base.len(), "sieve set up");
    let relations = match collect_relations(n, &params, &deadline)? {
        Collection::ExactRoot(x) => return Ok(x),
        Collection::Relations(relations) => relations,
    };
    if relations.is_empty() {
        return Err(Error::NoSolution(
            "quadratic sieve: no smooth relations near sqrt(n)",
        ));
    }
    tracing::debug!(relations = relations.len(), "collection finished");
    let basis = kernel(&power_matrix(&relations, &params.base));
    combine(n, &relations, &basis)
}
