//! Toy RSA on top of the primality test and modular inverse.
//!
//! Keygen draws two random probable primes, picks a public exponent
//! coprime to φ, and inverts it. Encryption and decryption are bare
//! modular exponentiation — no padding, no encoding, no constant-time
//! anything. Strictly an experiment harness for the rest of the crate.

use rug::rand::RandState;
use rug::Integer;

use crate::arith::gcd;
use crate::error::{Error, Result};
use crate::modular::{inv_mod, pow_mod};
use crate::primality::prime_miller_rabin;

/// A random probable prime of at most `bits` bits: odd random candidates
/// filtered through Miller–Rabin, giving up after `max_attempts` draws.
pub fn random_prime(bits: u32, max_attempts: u32, rng: &mut RandState) -> Result<Integer> {
    if bits < 2 {
        return Err(Error::Precondition(format!(
            "random_prime needs at least 2 bits, got {bits}"
        )));
    }
    for _ in 0..max_attempts {
        let candidate = Integer::from(Integer::random_bits(bits, rng)) | 1u32;
        if prime_miller_rabin(&candidate, &[], None, rng)? {
            return Ok(candidate);
        }
    }
    Err(Error::NoSolution(
        "random_prime: no prime found within the attempt budget",
    ))
}

/// An RSA key pair: n = p·q, e public, d = e⁻¹ mod φ(n).
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub modulus: Integer,
    pub public_exponent: Integer,
    pub private_exponent: Integer,
}

/// Generate a key pair from two fresh `bits`-bit probable primes.
pub fn generate_keys(bits: u32, rng: &mut RandState) -> Result<KeyPair> {
    let p = random_prime(bits, 1000, rng)?;
    let q = random_prime(bits, 1000, rng)?;
    let modulus = Integer::from(&p * &q);
    let phi = Integer::from(&p - 1u32) * Integer::from(&q - 1u32);
    let public_exponent = loop {
        let e = Integer::from(&phi - 2u32).random_below(rng) + 2u32;
        if gcd(&e, &phi) == 1 {
            break e;
        }
    };
    let private_exponent = inv_mod(&public_exponent, &phi);
    Ok(KeyPair {
        modulus,
        public_exponent,
        private_exponent,
    })
}

/// C = M^e mod n.
pub fn encrypt(message: &Integer, e: &Integer, n: &Integer) -> Result<Integer> {
    pow_mod(message, e, n)
}

/// M = C^d mod n.
pub fn decrypt(ciphertext: &Integer, d: &Integer, n: &Integer) -> Result<Integer> {
    pow_mod(ciphertext, d, n)
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
    fn random_prime_is_probably_prime() {
        let mut rng = rng();
        let p = random_prime(32, 1000, &mut rng).unwrap();
        assert!(prime_miller_rabin(&p, &[], None, &mut rng).unwrap());
        assert!(p.is_odd());
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let mut rng = rng();
        let keys = generate_keys(64, &mut rng).unwrap();
        for m in [0u64, 1, 42, 0xdead_beef] {
            let m = Integer::from(m);
            let c = encrypt(&m, &keys.public_exponent, &keys.modulus).unwrap();
            let back = decrypt(&c, &keys.private_exponent, &keys.modulus).unwrap();
            assert_eq!(back, m);
        }
    }

    #[test]
    fn random_prime_rejects_degenerate_sizes() {
        let mut rng = rng();
        assert!(matches!(
            random_prime(1, 10, &mut rng),
            Err(Error::Precondition(_))
        ));
    }
}
