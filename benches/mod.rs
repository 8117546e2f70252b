use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    pricing::bench_black_scholes,
    pricing::bench_binomial_steps,
    solver::bench_solve_iv,
);
criterion_main!(benches);
