use cbandits::{
    Algorithm, AlgorithmParams, ArmConfig, BudgetedPolicy, CostRewardEnv, Environment, Variant,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn arms(k: usize) -> Vec<ArmConfig> {
    (0..k)
        .map(|i| {
            let r = 1.0 + 0.1 * i as f64;
            ArmConfig::bounded_uniform((0.5, 1.5), (r - 0.5, r + 0.5), 0.4).unwrap()
        })
        .collect()
}

/// An algorithm after `pulls_per_arm` round-robin pulls.
fn warmed(variant: Variant, k: usize, pulls_per_arm: usize) -> Algorithm {
    let arms = arms(k);
    let mut env = CostRewardEnv::with_seed(arms.clone(), 0).unwrap();
    let mut algo = Algorithm::construct(variant, k, &arms, &AlgorithmParams::default()).unwrap();
    for _ in 0..pulls_per_arm {
        for arm in 0..k {
            let (x, r) = env.pull_arm(arm).unwrap();
            algo.update_state(arm, x, r).unwrap();
        }
    }
    algo
}

fn bench_select(c: &mut Criterion) {
    let k = 8;
    let mut group = c.benchmark_group("select_arm");
    for variant in Variant::ALL {
        for &pulls in &[100usize, 1_000, 10_000] {
            let algo = warmed(variant, k, pulls);
            let epoch = (k * pulls) as u64 + 1;
            group.bench_with_input(BenchmarkId::new(variant.name(), pulls), &pulls, |b, _| {
                b.iter(|| black_box(algo.select_arm(0.0, black_box(epoch))));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_select);
criterion_main!(benches);
