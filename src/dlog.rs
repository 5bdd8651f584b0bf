//! Discrete logarithms: baby-step/giant-step and Pohlig–Hellman.
//!
//! BSGS is the O(√order) meet-in-the-middle: tabulate g^i for i < m =
//! ⌈√order⌉ + 1, then walk h·(g^(−m))^i through the table. The giant
//! stride is computed as g^(m·(n−2)) — Fermat's inverse when n is prime,
//! and still a valid stride for composite n whenever ord(g) divides
//! m·(n−1).
//!
//! Pohlig–Hellman reduces a discrete log in a group of composite order to
//! one log per prime-power subgroup, lifted digit by digit and recombined
//! with the CRT. The exponents n/p^k use floor division of the modulus
//! itself; since n ≡ 1 (mod p^k) for every p^k dividing n − 1, the floor
//! equals (n−1)/p^k exactly.

use std::collections::HashMap;
use std::time::Duration;

use rug::ops::{Pow, RemRounding};
use rug::Integer;

use crate::arith::isqrt;
use crate::error::{Error, Result};
use crate::factor::PrimePowers;
use crate::modular::{congruence_system, pow_mod};
use crate::Deadline;

/// How many table operations happen between wall-clock checks.
const DEADLINE_STRIDE: u32 = 1024;

/// Baby-step/giant-step: the x in [0, order) with g^x ≡ h (mod n), for h
/// in the subgroup generated by g. `order` is an upper bound on ord(g);
/// passing the exact order makes the table as small as possible.
pub fn baby_step_giant_step(
    g: &Integer,
    h: &Integer,
    n: &Integer,
    order: &Integer,
    timeout: Duration,
) -> Result<Integer> {
    let deadline = Deadline::start(timeout);
    let m = isqrt(order)? + 1u32;

    let mut table: HashMap<Integer, Integer> = HashMap::new();
    let mut power = Integer::from(1).rem_euc(n);
    let mut i = Integer::new();
    let mut tick = 0u32;
    while i < m {
        table.insert(power.clone(), i.clone());
        power = Integer::from(&power * g).rem_euc(n);
        i += 1u32;
        tick = tick.wrapping_add(1);
        if tick % DEADLINE_STRIDE == 0 {
            deadline.check("baby_step_giant_step")?;
        }
    }

    let stride_exp = Integer::from(&m * &Integer::from(n - 2u32));
    let c = pow_mod(g, &stride_exp, n)?;
    let mut gamma = h.clone().rem_euc(n);
    let mut i = Integer::new();
    while i < m {
        if let Some(j) = table.get(&gamma) {
            return Ok(Integer::from(&i * &m) + j);
        }
        gamma = Integer::from(&gamma * &c).rem_euc(n);
        i += 1u32;
        tick = tick.wrapping_add(1);
        if tick % DEADLINE_STRIDE == 0 {
            deadline.check("baby_step_giant_step")?;
        }
    }
    Err(Error::NoSolution(
        "baby-step/giant-step: target is not in the subgroup generated by g",
    ))
}

/// Discrete log in the order-p^e subgroup of (Z/nZ)* generated by g.
///
/// Standard digit lifting: at step k, aₖ = g^(−x)·h isolates the unknown
/// digits, hₖ = aₖ^(n/p^(k+1)) projects them into the order-p subgroup,
/// and one BSGS against gₖ = g^(n/p) recovers digit dₖ; x accumulates
/// dₖ·p^k. Each inner BSGS runs with its own fresh budget.
pub fn pohlig_hellman_prime_power_order(
    g: &Integer,
    h: &Integer,
    p: &Integer,
    e: u32,
    n: &Integer,
    timeout: Duration,
) -> Result<Integer> {
    let g_k = pow_mod(g, &Integer::from(n / p), n)?;
    let mut x = Integer::new();
    for k in 0..e {
        let a_k = Integer::from(&pow_mod(g, &Integer::from(-&x), n)? * h).rem_euc(n);
        let e_k = Integer::from(n / &Integer::from(p.pow(k + 1)));
        let h_k = pow_mod(&a_k, &e_k, n)?;
        let d_k = baby_step_giant_step(&g_k, &h_k, n, p, timeout)?;
        x += d_k * Integer::from(p.pow(k));
    }
    Ok(x)
}

/// Pohlig–Hellman over the full group: one prime-power subgroup log per
/// entry of f (the factorization of the group order), recombined with the
/// CRT modulo ∏ p^e and reduced mod n.
pub fn pohlig_hellman(
    g: &Integer,
    h: &Integer,
    n: &Integer,
    f: &PrimePowers,
    timeout: Duration,
) -> Result<Integer> {
    let mut residues = Vec::with_capacity(f.len());
    let mut moduli = Vec::with_capacity(f.len());
    for (p, e) in f.iter() {
        if *p < 2 {
            continue;
        }
        let pe = Integer::from(p.pow(e));
        let e_i = Integer::from(n / &pe);
        let g_i = pow_mod(g, &e_i, n)?;
        let h_i = pow_mod(h, &e_i, n)?;
        residues.push(pohlig_hellman_prime_power_order(&g_i, &h_i, p, e, n, timeout)?);
        moduli.push(pe);
    }
    Ok(congruence_system(&residues, &moduli)?.rem_euc(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_TIMEOUT;

    fn int(v: i64) -> Integer {
        Integer::from(v)
    }

    #[test]
    fn bsgs_examples() {
        let x =
            baby_step_giant_step(&int(7), &int(2), &int(41), &int(40), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(x, 14);
        // Composite modulus: ord(2) mod 9 divides m·(n−1), so the stride
        // g^(m(n−2)) still behaves as g^(−m).
        let x = baby_step_giant_step(&int(2), &int(7), &int(9), &int(6), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(x, 4);
    }

    #[test]
    fn bsgs_within_order_bound() {
        let x =
            baby_step_giant_step(&int(3), &int(5), &int(7), &int(6), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(pow_mod(&int(3), &x, &int(7)).unwrap(), 5);
        assert!(x < 6);
    }

    #[test]
    fn bsgs_identity_is_zero() {
        let x =
            baby_step_giant_step(&int(2), &int(1), &int(7), &int(3), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(x, 0);
    }

    #[test]
    fn bsgs_misses_outside_subgroup() {
        // 4 generates {4, 2, 1} mod 7; 3 is unreachable.
        let err = baby_step_giant_step(&int(4), &int(3), &int(7), &int(3), DEFAULT_TIMEOUT)
            .unwrap_err();
        assert!(matches!(err, Error::NoSolution(_)));
    }

    #[test]
    fn prime_power_subgroup_pinned() {
        // 27 generates the order-8 subgroup of Z_41; 27^4 ≡ 40 (mod 41).
        let x = pohlig_hellman_prime_power_order(
            &int(27),
            &int(40),
            &int(2),
            3,
            &int(41),
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        assert_eq!(x, 4);
    }

    #[test]
    fn pohlig_hellman_pinned() {
        let f = PrimePowers::from_pairs(&[(2, 2), (5, 2)]);
        let x = pohlig_hellman(&int(15), &int(100), &int(101), &f, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(x, 50);
    }

    #[test]
    fn pohlig_hellman_round_trip() {
        let n = int(1019); // prime, n − 1 = 2 · 509
        let f = PrimePowers::from_pairs(&[(2, 1), (509, 1)]);
        let g = int(2);
        for x in [1i64, 2, 17, 508, 509, 777, 1017] {
            let h = pow_mod(&g, &int(x), &n).unwrap();
            let got = pohlig_hellman(&g, &h, &n, &f, DEFAULT_TIMEOUT).unwrap();
            assert_eq!(got, x, "round trip for x = {x}");
        }
    }
}
