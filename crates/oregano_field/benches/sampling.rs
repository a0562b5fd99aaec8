mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use oregano_field::sampling::PoissonDiskSampler;
use rand::rngs::StdRng;
use rand::SeedableRng;

const RADII: [f32; 6] = [64.0, 32.0, 16.0, 8.0, 4.0, 2.0];

fn drain(radius: f32, extent: Vec2, rng: &mut StdRng) -> usize {
    let mut sampler = PoissonDiskSampler::new(radius, extent);
    sampler.seed(Vec2::ZERO);
    while sampler.next(rng).is_some() {}
    sampler.point_count()
}

fn sampling_poisson_drain_benches(c: &mut Criterion) {
    let extent = Vec2::new(1024.0, 1024.0);

    let mut group = c.benchmark_group("sampling/poisson_disk/drain");

    for &radius in &RADII {
        let mut rng_est = StdRng::seed_from_u64(0xBEEFu64 ^ (radius as u64));
        let expected = drain(radius, extent, &mut rng_est);
        group.throughput(common::points_throughput(expected));

        let mut rng = StdRng::seed_from_u64(0xC0FFEEu64 ^ (radius as u64));

        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &r| {
            b.iter(|| black_box(drain(r, extent, &mut rng)));
        });
    }

    group.finish();
}

fn sampling_rebuild_benches(c: &mut Criterion) {
    let extent = Vec2::new(1024.0, 1024.0);
    let mut rng = StdRng::seed_from_u64(0xA11CE);
    let mut source = PoissonDiskSampler::new(16.0, extent);
    source.seed(Vec2::ZERO);
    while source.next(&mut rng).is_some() {}
    let occupants = source.points().to_vec();

    let mut group = c.benchmark_group("sampling/poisson_disk/rebuild");
    group.throughput(common::points_throughput(occupants.len()));
    group.bench_function("insert_occupants", |b| {
        b.iter(|| {
            let mut sampler = PoissonDiskSampler::new(12.0, extent);
            for p in &occupants {
                sampler.insert(*p);
            }
            black_box(sampler.point_count());
        });
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = sampling_poisson_drain_benches, sampling_rebuild_benches
}
criterion_main!(benches);
