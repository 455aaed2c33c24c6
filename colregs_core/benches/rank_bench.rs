use colregs_core::geometry::heading_to_velocity;
use colregs_core::{Position, RiskAssessor, TargetId, TargetKinematics};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn make_targets(n: usize) -> Vec<TargetKinematics> {
    (0..n)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / n as f64;
            let r = 500.0 + (i % 10) as f64 * 300.0;
            TargetKinematics {
                id: TargetId(i as u64),
                position: Position::new(r * angle.sin(), r * angle.cos()),
                velocity: heading_to_velocity((i * 37 % 360) as f64, 8.0).unwrap(),
            }
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let assessor = RiskAssessor::default();
    let os_pos = Position::new(0.0, 0.0);
    let os_vel = heading_to_velocity(0.0, 10.0).unwrap();

    for n in [10, 100, 1000, 10000] {
        let targets = make_targets(n);
        group.bench_function(format!("{n}_targets"), |b| {
            b.iter(|| black_box(assessor.rank(&os_pos, &os_vel, &targets).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
