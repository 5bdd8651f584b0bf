//! Modular arithmetic over arbitrary-precision integers.
//!
//! Exponentiation, inverses, the Chinese Remainder Theorem, Euler-criterion
//! residue tests, Tonelli–Shanks square roots, and the order/subgroup
//! helpers the generator search and Pohlig–Hellman lean on.
//!
//! Residues are always reduced into [0, |n|). `inv_mod` keeps its historical
//! 0-as-no-inverse sentinel; `pow_mod` is the checked boundary — a negative
//! exponent with no inverse surfaces [`Error::NoInverse`] instead of letting
//! the sentinel flow into later arithmetic.

use rug::ops::RemRounding;
use rug::Integer;

use crate::arith::{gcd, gcd_extended, product};
use crate::error::{Error, Result};
use crate::factor::PrimePowers;
use crate::primality::oddify;

fn check_modulus(n: &Integer, who: &str) -> Result<()> {
    if n.cmp_abs(&Integer::from(1)) == std::cmp::Ordering::Greater {
        Ok(())
    } else {
        Err(Error::Precondition(format!(
            "{who} requires a modulus with |n| >= 2, got {n}"
        )))
    }
}

/// b^e mod n by binary exponentiation, |n| ≥ 2.
///
/// A negative exponent is rewritten as (b⁻¹)^|e|; if b has no inverse
/// modulo n the caller's contract is already broken and the failure is
/// reported as [`Error::NoInverse`] rather than smuggled out as 0.
pub fn pow_mod(base: &Integer, exp: &Integer, modulus: &Integer) -> Result<Integer> {
    check_modulus(modulus, "pow_mod")?;
    let m = Integer::from(modulus.abs_ref());
    if *exp < 0 {
        let inv = inv_mod(base, &m);
        if inv == 0 {
            return Err(Error::NoInverse {
                value: base.clone(),
                modulus: modulus.clone(),
            });
        }
        let e = Integer::from(exp.abs_ref());
        return pow_mod(&inv, &e, &m);
    }
    // Exponent is non-negative and the modulus non-zero, so GMP cannot fail.
    base.clone().pow_mod(exp, &m).map_err(|_| Error::NoInverse {
        value: base.clone(),
        modulus: m,
    })
}

/// Modular inverse of a mod n via extended Euclid.
///
/// Returns the α in [0, n) with a·α ≡ 1 (mod n) when gcd(a, n) = 1, and the
/// 0 sentinel when no inverse exists or |n| < 2 (kept for compatibility;
/// `pow_mod` is the checked entry point).
pub fn inv_mod(a: &Integer, n: &Integer) -> Integer {
    if n.cmp_abs(&Integer::from(1)) != std::cmp::Ordering::Greater {
        return Integer::new();
    }
    let (d, alpha, _beta) = gcd_extended(a, n);
    if d != 1 {
        return Integer::new();
    }
    alpha.rem_euc(n)
}

/// Chinese Remainder Theorem: the unique x in [0, ∏nᵢ) with x ≡ aᵢ (mod nᵢ)
/// for pairwise-coprime moduli. The lists must have equal length.
pub fn congruence_system(residues: &[Integer], moduli: &[Integer]) -> Result<Integer> {
    if residues.len() != moduli.len() {
        return Err(Error::Precondition(format!(
            "congruence_system called with {} residues but {} moduli",
            residues.len(),
            moduli.len()
        )));
    }
    let big_n = product(moduli);
    let mut result = Integer::new();
    for (a_i, n_i) in residues.iter().zip(moduli) {
        let p = Integer::from(&big_n / n_i);
        let x = inv_mod(&p, n_i);
        result += Integer::from(a_i * &x) * &p;
    }
    Ok(result.rem_euc(&big_n))
}

/// Euler's criterion: is a a quadratic residue mod the odd prime p?
/// Computes a^((p−1)/2) mod p and compares against 1.
pub fn is_square(a: &Integer, p: &Integer) -> Result<bool> {
    let half = Integer::from(p - 1u32) >> 1;
    Ok(pow_mod(a, &half, p)? == 1)
}

/// Smallest i ≥ 2 that is a quadratic non-residue mod p.
pub fn find_non_square(p: &Integer) -> Result<Integer> {
    let mut i = Integer::from(2);
    while i < *p {
        if !is_square(&i, p)? {
            return Ok(i);
        }
        i += 1u32;
    }
    Err(Error::NoSolution("no quadratic non-residue below p"))
}

/// Tonelli–Shanks: a square root of the quadratic residue a modulo the odd
/// prime p, given any quadratic non-residue d mod p.
///
/// With p − 1 = 2^s·t (t odd), A = a^t and D = d^t, the even cofactor
/// m = Σ mⱼ·2^j is read off bit by bit: bit j is set exactly when
/// (A·D^m)^(2^(s−1−j)) ≡ −1 (mod p). The root is a^((t+1)/2) · D^(m/2).
pub fn msqrt(a: &Integer, p: &Integer, d: &Integer) -> Result<Integer> {
    if *p < 3 || p.is_even() {
        return Err(Error::Precondition(format!(
            "msqrt requires an odd prime modulus, got {p}"
        )));
    }
    let (s, t) = oddify(&Integer::from(p - 1u32));
    let a_t = pow_mod(a, &t, p)?;
    let d_t = pow_mod(d, &t, p)?;
    let minus_one = Integer::from(p - 1u32);
    let mut m = Integer::new();
    for j in 1..s {
        let probe = Integer::from(&a_t * &pow_mod(&d_t, &m, p)?).rem_euc(p);
        let e = Integer::from(1) << (s - 1 - j);
        if pow_mod(&probe, &e, p)? == minus_one {
            m += Integer::from(1) << j;
        }
    }
    let half_t = Integer::from(&t + 1u32) >> 1;
    let root = pow_mod(a, &half_t, p)? * pow_mod(&d_t, &Integer::from(&m >> 1), p)?;
    Ok(root.rem_euc(p))
}

/// Order of g mod n given φ = φ(n) and the factorization f of φ: start at
/// φ and strip each prime of f while g^(o/p) stays 1.
pub fn order(g: &Integer, n: &Integer, phi: &Integer, f: &PrimePowers) -> Result<Integer> {
    if *g == 1 {
        return Ok(Integer::from(1));
    }
    let mut o = phi.clone();
    for p in f.primes() {
        while o.is_divisible(p) && pow_mod(g, &Integer::from(&o / p), n)? == 1 {
            o /= p;
        }
    }
    Ok(o)
}

/// The cyclic subgroup ⟨b⟩ mod n as the list [b, b², …, 1], stopping as
/// soon as 1 reappears; never longer than φ entries.
pub fn subgroup(b: &Integer, n: &Integer, phi: &Integer) -> Result<Vec<Integer>> {
    check_modulus(n, "subgroup")?;
    let mut powers = Vec::new();
    let mut pi = Integer::from(1);
    let mut count = Integer::new();
    while count < *phi {
        pi = Integer::from(&pi * b).rem_euc(n);
        powers.push(pi.clone());
        if pi == 1 {
            break;
        }
        count += 1u32;
    }
    Ok(powers)
}

/// Does g generate all of (Z/nZ)*? Requires φ = φ(n) and the factorization
/// f of φ; g fails on the first prime p of f with g^(φ/p) ≡ 1.
pub fn is_generator(g: &Integer, n: &Integer, phi: &Integer, f: &PrimePowers) -> Result<bool> {
    if gcd(g, n) != 1 {
        return Ok(false);
    }
    for p in f.primes() {
        let k = Integer::from(phi / p);
        if pow_mod(g, &k, n)? == 1 {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Integer {
        Integer::from(v)
    }

    #[test]
    fn pow_mod_examples() {
        assert_eq!(pow_mod(&int(2), &int(5), &int(7)).unwrap(), 4);
        assert_eq!(pow_mod(&int(2), &int(10), &int(1000)).unwrap(), 24);
        assert_eq!(pow_mod(&int(5), &int(0), &int(7)).unwrap(), 1);
    }

    #[test]
    fn pow_mod_negative_exponent() {
        assert_eq!(pow_mod(&int(2), &int(-1), &int(7)).unwrap(), 4);
        assert_eq!(pow_mod(&int(2), &int(-2), &int(7)).unwrap(), 2);
        assert_eq!(pow_mod(&int(3), &int(-1), &int(13)).unwrap(), 9);
        assert_eq!(pow_mod(&int(3), &int(-2), &int(13)).unwrap(), 3);
    }

    #[test]
    fn pow_mod_rejects_tiny_modulus() {
        assert!(matches!(
            pow_mod(&int(2), &int(3), &int(1)),
            Err(Error::Precondition(_))
        ));
        assert!(matches!(
            pow_mod(&int(2), &int(3), &int(0)),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn pow_mod_surfaces_missing_inverse() {
        // gcd(4, 8) != 1, so 4^-1 mod 8 does not exist.
        assert!(matches!(
            pow_mod(&int(4), &int(-1), &int(8)),
            Err(Error::NoInverse { .. })
        ));
    }

    #[test]
    fn inv_mod_examples() {
        assert_eq!(inv_mod(&int(2), &int(7)), 4);
        assert_eq!(inv_mod(&int(4), &int(8)), 0); // gcd != 1 sentinel
        assert_eq!(inv_mod(&int(3), &int(1)), 0); // |n| < 2 sentinel
    }

    #[test]
    fn congruence_system_pinned() {
        let a: Vec<Integer> = [2, 3, 2].iter().map(|&v| int(v)).collect();
        let n: Vec<Integer> = [3, 5, 7].iter().map(|&v| int(v)).collect();
        assert_eq!(congruence_system(&a, &n).unwrap(), 23);
    }

    #[test]
    fn congruence_system_residue_property() {
        let a: Vec<Integer> = [1, 2, 3].iter().map(|&v| int(v)).collect();
        let n: Vec<Integer> = [5, 7, 11].iter().map(|&v| int(v)).collect();
        let x = congruence_system(&a, &n).unwrap();
        for (a_i, n_i) in a.iter().zip(&n) {
            assert_eq!(Integer::from(&x % n_i), *a_i);
        }
    }

    #[test]
    fn congruence_system_rejects_mismatched_lengths() {
        let a = vec![int(1)];
        let n = vec![int(3), int(5)];
        assert!(matches!(
            congruence_system(&a, &n),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn is_square_examples() {
        assert!(is_square(&int(4), &int(13)).unwrap());
        assert!(!is_square(&int(2), &int(5)).unwrap());
        assert!(is_square(&int(3), &int(11)).unwrap());
    }

    #[test]
    fn find_non_square_is_never_a_square() {
        for p in [3i64, 5, 7, 11, 13] {
            let p = int(p);
            let d = find_non_square(&p).unwrap();
            let mut i = int(2);
            while i < p {
                assert_ne!(Integer::from(&i * &i).rem_euc(&p), d);
                i += 1u32;
            }
        }
    }

    #[test]
    fn msqrt_squares_back() {
        for (a, p, d) in [(2i64, 7i64, 3i64), (4, 7, 3), (5, 11, 2), (2, 41, 3)] {
            let (a, p, d) = (int(a), int(p), int(d));
            let r = msqrt(&a, &p, &d).unwrap();
            assert_eq!(Integer::from(&r * &r).rem_euc(&p), a, "msqrt({a}, {p})");
        }
    }

    #[test]
    fn msqrt_rejects_even_modulus() {
        assert!(matches!(
            msqrt(&int(1), &int(2), &int(3)),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn order_examples() {
        let f = PrimePowers::from_pairs(&[(2, 1), (3, 1)]);
        assert_eq!(order(&int(2), &int(7), &int(6), &f).unwrap(), 3);
        assert_eq!(order(&int(3), &int(7), &int(6), &f).unwrap(), 6);

        let f = PrimePowers::from_pairs(&[(11, 1), (2, 1), (5, 1)]);
        assert_eq!(order(&int(3), &int(121), &int(110), &f).unwrap(), 5);

        let f = PrimePowers::from_pairs(&[(2, 2), (3, 1)]);
        assert_eq!(order(&int(13), &int(40), &int(12), &f).unwrap(), 4);
    }

    #[test]
    fn subgroup_examples() {
        let g: Vec<Integer> = subgroup(&int(2), &int(5), &int(4)).unwrap();
        assert_eq!(g, [2, 4, 3, 1].map(int).to_vec());
        let g: Vec<Integer> = subgroup(&int(4), &int(5), &int(4)).unwrap();
        assert_eq!(g, [4, 1].map(int).to_vec());
    }

    #[test]
    fn is_generator_examples() {
        let f = PrimePowers::from_pairs(&[(2, 2)]);
        assert!(!is_generator(&int(4), &int(5), &int(4), &f).unwrap());
        assert!(is_generator(&int(2), &int(5), &int(4), &f).unwrap());
    }
}
