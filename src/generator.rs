//! Probabilistic generator search in (Z/nZ)*.
//!
//! Draw g uniformly from [2, φ − 1] and test it against every prime p of
//! the factorization of φ: g^(φ/p) ≡ 1 means g lives in a proper subgroup.
//! Each rejection folds g^(φ/p^e) into a running witness h, which climbs
//! toward maximal order; if the deadline expires before a generator shows
//! up, the witness and its order travel out in the error so the driver can
//! report how close the search got. Success probability per draw is
//! φ(φ)/φ.

use std::time::Duration;

use rug::ops::{Pow, RemRounding};
use rug::rand::RandState;
use rug::Integer;

use crate::error::{Error, Result};
use crate::factor::PrimePowers;
use crate::modular::{is_generator, order, pow_mod};
use crate::Deadline;

/// Find a generator of (Z/nZ)* for prime n, given φ = n − 1 and the
/// factorization f of φ.
pub fn find_generator(
    n: &Integer,
    phi: &Integer,
    f: &PrimePowers,
    timeout: Duration,
    rng: &mut RandState,
) -> Result<Integer> {
    // Sampling needs a non-empty range [2, φ − 1]; below that, the group is
    // small enough to test every candidate directly.
    if *phi < 4 {
        let mut g = Integer::from(2);
        while g < *n {
            if is_generator(&g, n, phi, f)? {
                return Ok(g);
            }
            g += 1u32;
        }
        return Err(Error::NoSolution("no generator in [2, n)"));
    }

    let deadline = Deadline::start(timeout);
    let mut witness = Integer::from(1);
    loop {
        if deadline.expired() {
            let order = order(&witness, n, phi, f)?;
            return Err(Error::GeneratorTimeout {
                witness,
                order,
                limit: timeout,
            });
        }
        let g = Integer::from(phi - 2u32).random_below(rng) + 2u32;
        let mut rejected = false;
        for (p, e) in f.iter() {
            if *p < 2 {
                continue;
            }
            let d = Integer::from(phi / p);
            if pow_mod(&g, &d, n)? == 1 {
                let cofactor = Integer::from(phi / &Integer::from(p.pow(e)));
                witness = Integer::from(&witness * &pow_mod(&g, &cofactor, n)?).rem_euc(n);
                rejected = true;
                break;
            }
        }
        if !rejected {
            return Ok(g);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> RandState<'static> {
        let mut r = RandState::new();
        r.seed(&Integer::from(0x5eed_cafeu64));
        r
    }

    #[test]
    fn finds_primitive_roots_of_small_primes() {
        let mut rng = rng();
        for (n, f) in [
            (11i64, PrimePowers::from_pairs(&[(2, 1), (5, 1)])),
            (13, PrimePowers::from_pairs(&[(2, 2), (3, 1)])),
            (17, PrimePowers::from_pairs(&[(2, 4)])),
            (19, PrimePowers::from_pairs(&[(2, 1), (3, 2)])),
            (101, PrimePowers::from_pairs(&[(2, 2), (5, 2)])),
        ] {
            let n = Integer::from(n);
            let phi = Integer::from(&n - 1u32);
            let g = find_generator(&n, &phi, &f, Duration::from_secs(15), &mut rng).unwrap();
            // No proper power of a generator is 1 before the full period.
            let mut i = Integer::from(1);
            while i < phi {
                assert_ne!(pow_mod(&g, &i, &n).unwrap(), 1, "g = {g} mod {n}");
                i += 1u32;
            }
        }
    }

    #[test]
    fn tiny_group_falls_back_to_scan() {
        let mut rng = rng();
        let f = PrimePowers::from_pairs(&[(2, 1)]);
        let g = find_generator(
            &Integer::from(3),
            &Integer::from(2),
            &f,
            Duration::from_secs(5),
            &mut rng,
        )
        .unwrap();
        assert_eq!(g, 2);
    }

    #[test]
    fn deadline_escape_carries_witness() {
        let mut rng = rng();
        let f = PrimePowers::from_pairs(&[(2, 2), (5, 2)]);
        let err = find_generator(
            &Integer::from(101),
            &Integer::from(100),
            &f,
            Duration::from_secs(0),
            &mut rng,
        )
        .unwrap_err();
        match err {
            Error::GeneratorTimeout { order, .. } => assert!(order >= 1),
            other => panic!("expected GeneratorTimeout, got {other}"),
        }
    }
}
