use std::path::Path;
use std::time::Duration;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use num::Complex;
use ptolemy::algebra::Precision;
use ptolemy::ptolemy::ptolemy_varieties;
use ptolemy::solver::to_numeric;
use ptolemy::solver::Solver;
use ptolemy::triangulation::Triangulation;

fn read_triangulation(name: &str) -> Triangulation {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("triangulations")
        .join(name);
    Triangulation::from_file(&path).unwrap()
}

pub fn ordering_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_orderings");
    group.measurement_time(Duration::from_secs(5));
    for name in ["m003.trig", "m004.trig"] {
        let mut triangulation = read_triangulation(name);
        triangulation.orient();
        group.bench_with_input(BenchmarkId::from_parameter(name), &triangulation, |b, t| {
            b.iter(|| t.find_orderings().unwrap())
        });
    }
    group.finish();
}

pub fn solver_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.measurement_time(Duration::from_secs(5));
    let precision = Precision::default();
    let triangulation = read_triangulation("m004.trig").order().unwrap();
    for variety in ptolemy_varieties(&triangulation, 2).unwrap() {
        let equations = to_numeric::<_, Complex<f64>>(&variety.equations, &precision);
        group.bench_with_input(
            BenchmarkId::from_parameter(variety.class_index()),
            &equations,
            |b, equations| b.iter(|| Solver::new(&precision, 0, 0).solve(equations).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, ordering_benchmark, solver_benchmark);
criterion_main!(benches);
