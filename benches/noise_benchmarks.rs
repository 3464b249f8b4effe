use calmwave::noise::NoiseColor;
use calmwave::nodes::{Oscillator, RtrbSink};
use calmwave::{AudioEngine, EngineConfig, SoundId};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub fn criterion_benchmark(c: &mut Criterion) {
    for color in [NoiseColor::White, NoiseColor::Brown, NoiseColor::Pink] {
        c.bench_function(&format!("{:?} noise, 4s @ 48k", color), |b| {
            let mut rng = SmallRng::seed_from_u64(1);
            b.iter(|| black_box(color.generate_with(&mut rng, 4.0, 48_000)))
        });
    }

    c.bench_function("Oscillator.process() with vibrato", |b| {
        use calmwave::{AudioNode, ProcessContext, BLOCK_SIZE};
        use dasp_graph::Buffer;

        let ctx = ProcessContext { sample_rate: 48_000, buffer_size: BLOCK_SIZE };
        let mut osc = Oscillator::sine(196.0).with_vibrato(5.5, 2.0);
        let mut output = [Buffer::default()];

        b.iter(|| osc.process(&ctx, std::iter::empty(), &[], &mut output))
    });

    for sound in SoundId::ALL {
        c.bench_function(&format!("{} engine block", sound), |b| {
            let (producer, mut consumer) = rtrb::RingBuffer::new(4096);
            let mut engine = AudioEngine::new(EngineConfig::default())
                .unwrap()
                .with_output(RtrbSink::stereo(producer));
            engine.spawn(sound.generator()).unwrap();

            b.iter(|| {
                engine.process();
                while consumer.pop().is_ok() {}
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
