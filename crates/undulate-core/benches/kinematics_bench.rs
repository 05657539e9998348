// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Per-Step Kinematics Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the two calls the host makes every step,
//! at reference and fine mesh resolutions.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use undulate_core::{
    BodyDiscretizer, KinematicsBuilder, KinematicsModel, MeshSpacing, SilentSink,
    StructureParameters, UndulatingFoilKinematics,
};
use undulate_physics::{ParameterSet, WaveKinematics};
use undulate_types::{KinematicsConfig, RigidFrame};

fn generator(h: f64) -> UndulatingFoilKinematics {
    let mut config = KinematicsConfig::new("0012", 0.12);
    config.write_validation_data = false;
    KinematicsBuilder::new(
        "bench_foil",
        config,
        StructureParameters::single_level(0),
        MeshSpacing::uniform(h),
    )
    .diagnostics(Arc::new(SilentSink))
    .build()
    .unwrap()
}

// ── WaveKinematics closed form ──────────────────────────────────────

fn bench_wave_eval(c: &mut Criterion) {
    let wave = WaveKinematics::from_params(&ParameterSet::prescribed(0.06, 0.4));
    c.bench_function("wave_displacement_velocity", |b| {
        b.iter(|| {
            let x = black_box(0.73);
            let t = black_box(1.21);
            wave.displacement(x, t) + wave.velocity(x, t)
        })
    });
}

// ── BodyDiscretizer ─────────────────────────────────────────────────

fn bench_discretize_h256(c: &mut Criterion) {
    let d = BodyDiscretizer::new(1.0, MeshSpacing::uniform(1.0 / 256.0), 0.12);
    let structure = StructureParameters::single_level(0);
    c.bench_function("discretize_h256", |b| {
        b.iter(|| d.discretize(black_box(&structure)).unwrap())
    });
}

// ── Full step: set_velocity + set_shape ─────────────────────────────

fn bench_step_h64(c: &mut Criterion) {
    let mut kin = generator(1.0 / 64.0);
    let mut t = 0.0;
    c.bench_function("step_h64", |b| {
        b.iter(|| {
            t += 1e-3;
            kin.set_velocity(black_box(t), RigidFrame::default()).unwrap();
            kin.set_shape(black_box(t), 0.0).unwrap();
        })
    });
}

fn bench_step_h512(c: &mut Criterion) {
    let mut kin = generator(1.0 / 512.0);
    let mut t = 0.0;
    c.bench_function("step_h512", |b| {
        b.iter(|| {
            t += 1e-3;
            kin.set_velocity(black_box(t), RigidFrame::default()).unwrap();
            kin.set_shape(black_box(t), 0.0).unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_wave_eval,
    bench_discretize_h256,
    bench_step_h64,
    bench_step_h512,
);
criterion_main!(benches);
