//! Criterion benchmarks for the processing stages
//!
//! Run with: cargo bench -p tactus-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tactus_core::{AudioBlock, BlockContext, Effect, PITCH, ParamRegistry};
use tactus_effects::{LowPass, ProcessorChain, TimeStretch};

const SAMPLE_RATE: f32 = 44100.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 512, 1024];

fn fill_sine(block: &mut AudioBlock) {
    for ch in 0..block.channels() {
        for (i, s) in block.channel_mut(ch).iter_mut().enumerate() {
            *s = (2.0 * std::f32::consts::PI * 440.0 * i as f32 / SAMPLE_RATE).sin() * 0.5;
        }
    }
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stages");
    let ctx = BlockContext::new(1.0, SAMPLE_RATE);

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(BenchmarkId::new("stretch_octave_up", block_size), &block_size, |b, &size| {
            let mut registry = ParamRegistry::with_defaults();
            let mut stretch = TimeStretch::from_registry(&mut registry, 2).unwrap();
            registry.get(PITCH).unwrap().set(1.0);
            let mut block = AudioBlock::new(2, size);
            b.iter(|| {
                fill_sine(&mut block);
                stretch.process_block(black_box(&mut block), &ctx);
            });
        });

        group.bench_with_input(BenchmarkId::new("lowpass", block_size), &block_size, |b, &size| {
            let mut registry = ParamRegistry::with_defaults();
            let mut lp = LowPass::from_registry(&mut registry, 2, SAMPLE_RATE).unwrap();
            let mut block = AudioBlock::new(2, size);
            b.iter(|| {
                fill_sine(&mut block);
                lp.process_block(black_box(&mut block), &ctx);
            });
        });
    }
    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("Chain");
    let ctx = BlockContext::new(0.8, SAMPLE_RATE);
    for &block_size in BLOCK_SIZES {
        group.bench_with_input(BenchmarkId::new("full", block_size), &block_size, |b, &size| {
            let mut registry = ParamRegistry::with_defaults();
            let mut chain = ProcessorChain::from_registry(&mut registry, 2, SAMPLE_RATE).unwrap();
            let mut block = AudioBlock::new(2, size);
            b.iter(|| {
                fill_sine(&mut block);
                chain.process(black_box(&mut block), &ctx);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stages, bench_chain);
criterion_main!(benches);
