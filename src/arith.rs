//! Elementary integer arithmetic: square roots, base-10 logarithm, GCD,
//! extended GCD, products, and polynomial evaluation.
//!
//! Everything here is total arithmetic on [`rug::Integer`] — no entropy, no
//! deadlines. The extended GCD is the iterative transcription of the classic
//! recursion (depth-free, same Bézout coefficients), and [`Poly`] is the
//! coefficient form of the pseudorandom iteration functions Pollard's rho
//! cycles through.

use rug::Integer;

use crate::error::{Error, Result};

/// Floor integer square root: the largest x with x² ≤ n.
///
/// `isqrt(101) = 10`, `isqrt(9) = 3`. Fails on negative input.
pub fn isqrt(n: &Integer) -> Result<Integer> {
    if *n < 0 {
        return Err(Error::Precondition(format!(
            "isqrt requires n >= 0, got {n}"
        )));
    }
    Ok(n.clone().sqrt())
}

/// Ceiling integer square root: the smallest x with x² ≥ n.
pub fn isqrt_ceil(n: &Integer) -> Result<Integer> {
    let root = isqrt(n)?;
    if Integer::from(&root * &root) < *n {
        Ok(root + 1u32)
    } else {
        Ok(root)
    }
}

/// Integer base-10 logarithm of |n|: `ilog10(1031) = 3`. Zero maps to 0.
pub fn ilog10(n: &Integer) -> u32 {
    let digits = n.clone().abs().to_string_radix(10).len() as u32;
    digits.saturating_sub(1)
}

/// Greatest common divisor, always non-negative.
pub fn gcd(a: &Integer, b: &Integer) -> Integer {
    a.clone().gcd(b)
}

/// Extended Euclid: returns (d, x, y) with a·x + b·y = d = gcd(a, b).
///
/// Iterative with floor-division quotients, so it produces the same
/// coefficients as the textbook recursion without the O(log n) stack:
/// `gcd_extended(7178655232, 1426532525) = (997, -39329, 197913)`.
pub fn gcd_extended(a: &Integer, b: &Integer) -> (Integer, Integer, Integer) {
    let (mut r0, mut r1) = (a.clone(), b.clone());
    let (mut x0, mut x1) = (Integer::from(1), Integer::new());
    let (mut y0, mut y1) = (Integer::new(), Integer::from(1));
    while r1 != 0 {
        let (q, rem) = r0.div_rem_floor(r1.clone());
        r0 = r1;
        r1 = rem;
        let x2 = x0 - Integer::from(&q * &x1);
        x0 = x1;
        x1 = x2;
        let y2 = y0 - Integer::from(&q * &y1);
        y0 = y1;
        y1 = y2;
    }
    (r0, x0, y0)
}

/// Product of a slice; the empty product is 1.
pub fn product(values: &[Integer]) -> Integer {
    let mut total = Integer::from(1);
    for v in values {
        total *= v;
    }
    total
}

/// A polynomial in coefficient form, highest degree first, evaluated by
/// Horner's rule. Pollard's rho uses these as its iteration functions,
/// starting from x² + 1 and re-rolling the coefficients on each restart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly {
    coefficients: Vec<Integer>,
}

impl Poly {
    pub fn new(coefficients: Vec<Integer>) -> Self {
        Poly { coefficients }
    }

    /// Horner evaluation: for coefficients [a, b, c] this is a·x² + b·x + c.
    pub fn evaluate(&self, x: &Integer) -> Integer {
        let mut acc = match self.coefficients.first() {
            Some(first) => first.clone(),
            None => return Integer::new(),
        };
        for c in &self.coefficients[1..] {
            acc *= x;
            acc += c;
        }
        acc
    }
}
