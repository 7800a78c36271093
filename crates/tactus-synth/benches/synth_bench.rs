//! Criterion benchmarks for the envelope engine
//!
//! Run with: cargo bench -p tactus-synth
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tactus_synth::{Envelope, EnvelopeMode, EnvelopeSettings};

const SAMPLE_RATE: f32 = 44100.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 512, 1024];

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("Envelope");

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(BenchmarkId::new("adsr_cycle", block_size), &block_size, |b, &n| {
            let mut env = Envelope::new(
                EnvelopeMode::Adsr,
                SAMPLE_RATE,
                EnvelopeSettings::adsr(20.0, 120.0, 0.7, 400.0),
            );
            let trigger = env.trigger_handle();
            b.iter(|| {
                trigger.note_on();
                black_box(env.advance(n));
                trigger.note_off();
                black_box(env.advance(n));
            });
        });

        group.bench_with_input(BenchmarkId::new("ar_tap", block_size), &block_size, |b, &n| {
            let mut env = Envelope::new(EnvelopeMode::Ar, SAMPLE_RATE, EnvelopeSettings::ar(5.0, 250.0));
            let trigger = env.trigger_handle();
            b.iter(|| {
                trigger.trigger(true);
                trigger.trigger(false);
                black_box(env.advance(n));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_envelope);
criterion_main!(benches);
