//! Criterion benchmarks for u-moea.
//!
//! Uses synthetic fronts and the ZDT1 problem to measure indicator and
//! algorithm overhead independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_moea::abyss::{AbyssConfig, AbyssRunner};
use u_moea::core::{Problem, Solution};
use u_moea::density::assign_crowding_distance;
use u_moea::indicators::{Front, WfgHypervolume};
use u_moea::smpso::{SmpsoConfig, SmpsoRunner};
use u_moea::Result;

// ===========================================================================
// ZDT1: f1 = x0, f2 = g·(1 − √(x0 / g))
// ===========================================================================

struct Zdt1 {
    n: usize,
}

impl Problem for Zdt1 {
    fn name(&self) -> &str {
        "ZDT1"
    }
    fn number_of_variables(&self) -> usize {
        self.n
    }
    fn number_of_objectives(&self) -> usize {
        2
    }
    fn lower_limit(&self, _i: usize) -> f64 {
        0.0
    }
    fn upper_limit(&self, _i: usize) -> f64 {
        1.0
    }
    fn evaluate(&self, s: &mut Solution) -> Result<()> {
        let f1 = s.real_value(0);
        let tail: f64 = (1..self.n).map(|i| s.real_value(i)).sum();
        let g = 1.0 + 9.0 * tail / (self.n - 1) as f64;
        s.objectives = vec![f1, g * (1.0 - (f1 / g).sqrt())];
        Ok(())
    }
}

/// Random points on the positive unit sphere: mutually non-dominated.
fn sphere_front(points: usize, objectives: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..points)
        .map(|_| {
            let raw: Vec<f64> = (0..objectives).map(|_| rng.random_range(0.01..1.0)).collect();
            let norm = raw.iter().map(|v| v * v).sum::<f64>().sqrt();
            raw.into_iter().map(|v| v / norm).collect()
        })
        .collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_wfg_hypervolume(c: &mut Criterion) {
    let mut group = c.benchmark_group("wfg_hypervolume");
    group.sample_size(10);

    for (points, objectives) in [(100usize, 2usize), (50, 3), (30, 4)] {
        let front = Front::from_matrix(sphere_front(points, objectives, 42));
        let wfg = WfgHypervolume::new(vec![1.1; objectives]);
        group.bench_with_input(
            BenchmarkId::new(format!("m{}", objectives), points),
            &(wfg, front),
            |b, (w, f)| b.iter(|| black_box(w.compute(black_box(f)))),
        );
    }
    group.finish();
}

fn bench_crowding_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("crowding_distance");

    for &n in &[100usize, 1000] {
        let solutions: Vec<Solution> = sphere_front(n, 3, 7)
            .into_iter()
            .map(Solution::from_objectives)
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &solutions, |b, s| {
            b.iter(|| {
                let mut set = s.clone();
                assign_crowding_distance(&mut set);
                black_box(set)
            })
        });
    }
    group.finish();
}

fn bench_smpso_zdt1(c: &mut Criterion) {
    let mut group = c.benchmark_group("smpso_zdt1");
    group.sample_size(10);

    for &n in &[10usize, 30] {
        let problem = Zdt1 { n };
        let config = SmpsoConfig::default()
            .with_max_iterations(20)
            .with_parallel(false)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(problem, config), |b, (p, c)| {
            b.iter(|| black_box(SmpsoRunner::run(black_box(p), black_box(c))))
        });
    }
    group.finish();
}

fn bench_abyss_zdt1(c: &mut Criterion) {
    let mut group = c.benchmark_group("abyss_zdt1");
    group.sample_size(10);

    for &n in &[10usize, 30] {
        let problem = Zdt1 { n };
        let config = AbyssConfig::default()
            .with_max_evaluations(2_000)
            .with_parallel(false)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(problem, config), |b, (p, c)| {
            b.iter(|| black_box(AbyssRunner::run(black_box(p), black_box(c))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_wfg_hypervolume,
    bench_crowding_distance,
    bench_smpso_zdt1,
    bench_abyss_zdt1
);
criterion_main!(benches);
