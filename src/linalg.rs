//! Dense linear algebra over big integers.
//!
//! Row-major matrices of [`rug::Integer`] with the elementwise helpers,
//! transpose, products, and three eliminations:
//!
//! - [`echelon_mod_2`] / [`solve_mod_2`] — the historical two-phase GF(2)
//!   reduction (echelon, transpose, echelon again, return the carried
//!   right-hand side), kept bit-for-bit for regression parity.
//! - [`rref`] — Gaussian forward elimination over exact rationals.
//! - [`kernel`] — a right null-space basis over GF(2), which is what the
//!   quadratic sieve consumes.

use rug::ops::RemRounding;
use rug::{Integer, Rational};

pub type Vector = Vec<Integer>;
pub type Matrix = Vec<Vector>;

/// Elementwise sum of two equal-length vectors.
pub fn vector_sum(u: &[Integer], v: &[Integer]) -> Vector {
    debug_assert_eq!(u.len(), v.len());
    u.iter().zip(v).map(|(x, y)| Integer::from(x + y)).collect()
}

/// Scale a vector by α.
pub fn vector_scale(u: &[Integer], alpha: &Integer) -> Vector {
    u.iter().map(|x| Integer::from(x * alpha)).collect()
}

/// Elementwise (Hadamard) product.
pub fn vector_prod(u: &[Integer], v: &[Integer]) -> Vector {
    debug_assert_eq!(u.len(), v.len());
    u.iter().zip(v).map(|(x, y)| Integer::from(x * y)).collect()
}

/// Elementwise non-negative residue mod m.
pub fn vector_mod(u: &[Integer], m: &Integer) -> Vector {
    u.iter().map(|x| x.clone().rem_euc(m)).collect()
}

/// Apply [`vector_mod`] to every row.
pub fn matrix_mod(a: &Matrix, m: &Integer) -> Matrix {
    a.iter().map(|row| vector_mod(row, m)).collect()
}

/// Transpose an N×M matrix into M×N.
pub fn transpose(a: &Matrix) -> Matrix {
    let n = a.len();
    let m = a.first().map_or(0, Vec::len);
    let mut t = vec![vec![Integer::new(); n]; m];
    for (i, row) in a.iter().enumerate() {
        for (j, x) in row.iter().enumerate() {
            t[j][i] = x.clone();
        }
    }
    t
}

/// Naive matrix product A·B.
pub fn matrix_prod(a: &Matrix, b: &Matrix) -> Matrix {
    let bt = transpose(b);
    a.iter()
        .map(|row| {
            bt.iter()
                .map(|col| {
                    let mut acc = Integer::new();
                    for (x, y) in row.iter().zip(col) {
                        acc += Integer::from(x * y);
                    }
                    acc
                })
                .collect()
        })
        .collect()
}

/// Starting at row j, the index of the first row with a non-zero entry in
/// column j — searching no further than the smaller matrix dimension, so a
/// pivot past min(rows, cols) reports as absent.
pub fn find_pivot(a: &Matrix, j: usize) -> Option<usize> {
    let n = a.len();
    let m = a.first().map_or(0, Vec::len);
    let mut i = j;
    while i < n && i < m && a[i][j] == 0 {
        i += 1;
    }
    if i >= n || i >= m {
        None
    } else {
        Some(i)
    }
}

/// Forward reduction over GF(2), with the right-hand side b carried along.
///
/// Entries are first reduced mod 2. For each pivot column the pivot row is
/// swapped up, then every lower row with a 1 in that column gets the pivot
/// row XOR-added (columns ≥ pivot) and its b entry XORed.
pub fn echelon_mod_2(a: &Matrix, b: &[Integer]) -> (Matrix, Vector) {
    let two = Integer::from(2);
    let mut a = matrix_mod(a, &two);
    let mut b = vector_mod(b, &two);
    let cols = a.first().map_or(0, Vec::len);
    for j in 0..cols {
        let Some(p) = find_pivot(&a, j) else { continue };
        a.swap(j, p);
        b.swap(j, p);
        for r in j + 1..a.len() {
            if a[r][j] == 0 {
                continue;
            }
            for c in j..cols {
                let bit = Integer::from(&a[r][c] + &a[j][c]).rem_euc(&two);
                a[r][c] = bit;
            }
            let bit = Integer::from(&b[r] + &b[j]).rem_euc(&two);
            b[r] = bit;
        }
    }
    (a, b)
}

/// The historical two-phase GF(2) solve: echelon the system, transpose the
/// reduced matrix, echelon again, and return the carried right-hand side.
/// Expects a square system. Kept verbatim for regression parity — new code
/// wanting an actual null-space should use [`kernel`].
pub fn solve_mod_2(a: &Matrix, b: &[Integer]) -> Vector {
    let (a, b) = echelon_mod_2(a, b);
    let (_, b) = echelon_mod_2(&transpose(&a), &b);
    b
}

/// Gaussian forward elimination over exact rationals.
///
/// Pivot search per column uses the same bounded scan as [`find_pivot`],
/// and a pivot row whose diagonal entry is zero is skipped rather than
/// repaired. Rows below each pivot are cleared in column order; the result
/// is upper-triangular up to the skipped columns.
pub fn rref(a: &Matrix) -> Vec<Vec<Rational>> {
    let mut m: Vec<Vec<Rational>> = a
        .iter()
        .map(|row| row.iter().map(Rational::from).collect())
        .collect();
    let nrows = m.len();
    let ncols = m.first().map_or(0, Vec::len);
    for i in 0..nrows {
        // Bounded pivot scan, mirroring find_pivot over the rational rows.
        let mut p = i;
        while p < nrows && p < ncols && m[p][i] == 0 {
            p += 1;
        }
        if p >= nrows || p >= ncols || m[p][p] == 0 {
            continue;
        }
        m.swap(i, p);
        for r in i + 1..nrows {
            let scale = Rational::from(&m[r][i] / &m[i][i]);
            for c in 0..ncols {
                let delta = Rational::from(&scale * &m[i][c]);
                m[r][c] -= delta;
            }
        }
    }
    m
}

/// A basis of the right null-space of A over GF(2).
///
/// Reduces a copy of A mod 2 to reduced row-echelon form, then emits one
/// basis vector per free column: the free column itself set to 1 plus the
/// pivot-column entries that cancel it. Every returned v satisfies
/// A·v ≡ 0 (mod 2).
pub fn kernel(a: &Matrix) -> Vec<Vector> {
    let two = Integer::from(2);
    let mut m = matrix_mod(a, &two);
    let nrows = m.len();
    let ncols = m.first().map_or(0, Vec::len);

    // (column, row) of each pivot after full reduction.
    let mut pivots: Vec<(usize, usize)> = Vec::new();
    let mut rank = 0usize;
    for col in 0..ncols {
        let Some(pivot_row) = (rank..nrows).find(|&r| m[r][col] == 1) else {
            continue;
        };
        m.swap(rank, pivot_row);
        for r in 0..nrows {
            if r != rank && m[r][col] == 1 {
                for c in col..ncols {
                    let bit = Integer::from(&m[r][c] + &m[rank][c]).rem_euc(&two);
                    m[r][c] = bit;
                }
            }
        }
        pivots.push((col, rank));
        rank += 1;
    }

    let pivot_cols: Vec<usize> = pivots.iter().map(|&(c, _)| c).collect();
    let mut basis = Vec::new();
    for free in (0..ncols).filter(|c| !pivot_cols.contains(c)) {
        let mut v = vec![Integer::new(); ncols];
        v[free] = Integer::from(1);
        for &(col, row) in &pivots {
            if m[row][free] == 1 {
                v[col] = Integer::from(1);
            }
        }
        basis.push(v);
    }
    basis
}
