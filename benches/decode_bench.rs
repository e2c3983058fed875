//! 解码器性能基准测试.
//!
//! 覆盖多相合成滤波器与整帧 Layer I/III 解码.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use mpa::codec::mpa::synthesis::{SubbandSamples, SynthesisFilter};
use mpa::codec::{DecoderOptions, MpaDecoder, decode_all};

/// MPEG-1 Layer III 128 kbps 44.1 kHz 立体声静音帧
fn layer3_stream(frames: usize) -> Vec<u8> {
    (0..frames)
        .flat_map(|_| {
            let mut frame = 0xFFFB_9000u32.to_be_bytes().to_vec();
            frame.resize(417, 0);
            frame
        })
        .collect()
}

/// MPEG-1 Layer I 32 kbps 单声道静音帧
fn layer1_stream(frames: usize) -> Vec<u8> {
    (0..frames)
        .flat_map(|_| {
            let mut frame = 0xFFFF_10C0u32.to_be_bytes().to_vec();
            frame.resize(32, 0);
            frame
        })
        .collect()
}

fn bench_synthesis(c: &mut Criterion) {
    c.bench_function("synthesis_stereo_36_slots", |b| {
        let mut block = SubbandSamples {
            channels: 2,
            slots: 36,
            ..Default::default()
        };
        for (ch, plane) in block.data.iter_mut().enumerate() {
            for (slot, row) in plane.iter_mut().enumerate() {
                for (sb, v) in row.iter_mut().enumerate() {
                    *v = (((slot * 32 + sb + ch) % 17) as f32 - 8.0) / 64.0;
                }
            }
        }
        let mut filters = [SynthesisFilter::new(), SynthesisFilter::new()];
        let mut out = vec![0i16; 2304];
        b.iter(|| {
            black_box(block.render(&mut filters, &mut out));
        });
    });
}

fn bench_layer3_frames(c: &mut Criterion) {
    let data = layer3_stream(40);
    c.bench_function("layer3_decode_40_frames", |b| {
        b.iter(|| {
            let pcm = decode_all(black_box(&data)).unwrap();
            black_box(pcm.samples_per_channel());
        });
    });
}

fn bench_layer1_chunked(c: &mut Criterion) {
    let data = layer1_stream(200);
    c.bench_function("layer1_decode_chunked_256", |b| {
        b.iter_batched(
            || MpaDecoder::new(DecoderOptions::default()),
            |mut decoder| {
                for chunk in data.chunks(256) {
                    black_box(decoder.decode_frames(chunk).unwrap());
                }
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_synthesis,
    bench_layer3_frames,
    bench_layer1_chunked
);
criterion_main!(benches);
