use std::hint::black_box;

use alloy_primitives::U256;
use criterion::{criterion_group, criterion_main, Criterion};

use clmm_pool::math::swap_math::compute_swap_step;
use clmm_pool::math::tick_bitmap::{flip_tick, next_initialized_tick_within_one_word};
use clmm_pool::math::tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio};
use clmm_pool::FastMap;

fn bench_tick_math(c: &mut Criterion) {
    c.bench_function("get_sqrt_ratio_at_tick", |b| {
        b.iter(|| get_sqrt_ratio_at_tick(black_box(85176)).unwrap())
    });

    let ratio = get_sqrt_ratio_at_tick(85176).unwrap();
    c.bench_function("get_tick_at_sqrt_ratio", |b| {
        b.iter(|| get_tick_at_sqrt_ratio(black_box(ratio)).unwrap())
    });
}

fn bench_swap_math(c: &mut Criterion) {
    let current = get_sqrt_ratio_at_tick(85176).unwrap();
    let target = get_sqrt_ratio_at_tick(86129).unwrap();
    let liquidity = 1518129116516325614066u128;
    let amount = U256::from(42u128 * 10u128.pow(18));

    c.bench_function("compute_swap_step", |b| {
        b.iter(|| {
            compute_swap_step(
                black_box(current),
                black_box(target),
                black_box(liquidity),
                black_box(amount),
                false,
            )
            .unwrap()
        })
    });
}

fn bench_tick_bitmap(c: &mut Criterion) {
    let mut bitmap: FastMap<i16, U256> = FastMap::default();
    for tick in [-887220, -200, -55, -4, 70, 84222, 85176, 86129, 887220] {
        flip_tick(&mut bitmap, tick);
    }

    c.bench_function("next_initialized_tick_within_one_word", |b| {
        b.iter(|| {
            next_initialized_tick_within_one_word(black_box(&bitmap), black_box(85176), true)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_tick_math, bench_swap_math, bench_tick_bitmap);
criterion_main!(benches);
