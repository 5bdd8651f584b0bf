use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rug::rand::RandState;
use rug::Integer;

use ntkit::dlog::baby_step_giant_step;
use ntkit::factor::pollard_rho_prime_power_decomposition;
use ntkit::modular::pow_mod;
use ntkit::primality::{eratosthenes_sieve, prime_miller_rabin};
use ntkit::qsieve::quadratic_sieve;
use ntkit::DEFAULT_TIMEOUT;

fn seeded_rng() -> RandState<'static> {
    let mut rng = RandState::new();
    rng.seed(&Integer::from(0x5eed_cafeu64));
    rng
}

fn bench_eratosthenes(c: &mut Criterion) {
    c.bench_function("eratosthenes_sieve(100_000)", |b| {
        b.iter(|| eratosthenes_sieve(black_box(100_000)));
    });
}

fn bench_pow_mod(c: &mut Criterion) {
    // 2^(M61) mod M61-ish sizes exercise the GMP path end to end.
    let base = Integer::from(2u32);
    let exp = Integer::from(2305843009213693950u64);
    let modulus = Integer::from(2305843009213693951u64);
    c.bench_function("pow_mod(2, M61-1, M61)", |b| {
        b.iter(|| pow_mod(black_box(&base), black_box(&exp), black_box(&modulus)).unwrap());
    });
}

fn bench_miller_rabin(c: &mut Criterion) {
    let m61 = Integer::from(2305843009213693951u64);
    let sieve = eratosthenes_sieve(1000);
    c.bench_function("prime_miller_rabin(M61)", |b| {
        let mut rng = seeded_rng();
        b.iter(|| prime_miller_rabin(black_box(&m61), &sieve, None, &mut rng).unwrap());
    });
}

fn bench_rho_decomposition(c: &mut Criterion) {
    let n = Integer::from(717967279050961u64); // 12657973 · 56720557
    let sieve = eratosthenes_sieve(1000);
    c.bench_function("pollard_rho_decomposition(717967279050961)", |b| {
        let mut rng = seeded_rng();
        b.iter(|| {
            pollard_rho_prime_power_decomposition(
                black_box(&n),
                &sieve,
                Duration::from_secs(120),
                &mut rng,
            )
            .unwrap()
        });
    });
}

fn bench_bsgs(c: &mut Criterion) {
    let p = Integer::from(1000003u64);
    let g = Integer::from(5u32);
    let h = pow_mod(&g, &Integer::from(777_777u64), &p).unwrap();
    let order = Integer::from(&p - 1u32);
    c.bench_function("bsgs(mod 1000003)", |b| {
        b.iter(|| {
            baby_step_giant_step(
                black_box(&g),
                black_box(&h),
                &p,
                &order,
                DEFAULT_TIMEOUT,
            )
            .unwrap()
        });
    });
}

fn bench_quadratic_sieve(c: &mut Criterion) {
    let n = Integer::from(87463u64);
    c.bench_function("quadratic_sieve(87463)", |b| {
        b.iter(|| quadratic_sieve(black_box(&n), DEFAULT_TIMEOUT).unwrap());
    });
}

criterion_group!(
    benches,
    bench_eratosthenes,
    bench_pow_mod,
    bench_miller_rabin,
    bench_rho_decomposition,
    bench_bsgs,
    bench_quadratic_sieve
);
criterion_main!(benches);
