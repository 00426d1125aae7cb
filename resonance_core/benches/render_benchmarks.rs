//! Performance benchmarks for the simulation, resampling and transform stages
//!
//! Run with: cargo bench --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use resonance_field_core::{
    analyze, resample_knot_map, simulate, PixelTransformer, SimulationConfig, WavePhase,
};
use resonance_shared::{PixelBuffer, RngSource};

/// Benchmark a full simulation at different grid sizes
fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");

    for size in [32usize, 64, 128].iter() {
        let config = SimulationConfig {
            width: *size,
            height: *size,
            duration: 60,
            ..SimulationConfig::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(size), &config, |b, config| {
            let mut rng = RngSource::seeded(42);
            b.iter(|| black_box(simulate(*config, &mut rng).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark resampling and transforming a 512x512 image
fn bench_transform(c: &mut Criterion) {
    let config = SimulationConfig::default();
    let run = simulate(config, &mut RngSource::seeded(7)).unwrap();
    let stats = analyze(&run.event_log, config.scale);
    let image = PixelBuffer::from_fn(512, 512, |x, y| [(x % 256) as u8, (y % 256) as u8, 128, 255]);

    c.bench_function("resample_512", |b| {
        b.iter(|| black_box(resample_knot_map(&run.knot_map, 512, 512).unwrap()));
    });

    let knots = resample_knot_map(&run.knot_map, 512, 512).unwrap();
    let transformer = PixelTransformer::new(&[0.5; 5], 0.0, 1.0, stats.harmony).unwrap();
    let phase = WavePhase { x: 0.3, y: 1.7 };
    c.bench_function("transform_512", |b| {
        b.iter(|| black_box(transformer.apply(&image, &knots, phase).unwrap()));
    });
}

criterion_group!(benches, bench_simulation, bench_transform);
criterion_main!(benches);
