//! Layer III 流式解码: 分块等价、数据不足、静音帧、声道选择、储备库与 CRC

mod common;

use common::*;
use mpa::codec::{
    ChannelSelect, DecodeStatus, DecoderOptions, FrameStage, MAX_FRAME_SAMPLES, MpaDecoder,
    decode_all,
};
use mpa::core::{MpaError, SampleFormat};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn decode_or_panic(data: &[u8]) -> Vec<Vec<i16>> {
    match decode_all(data) {
        Ok(pcm) => pcm.channels,
        Err(err) => panic!("解码失败: {err}"),
    }
}

#[test]
fn test_chunked_feeding_matches_one_shot() {
    init_logger();
    let data = tone_stream(6, 40);
    let reference = decode_or_panic(&data);
    assert_eq!(reference.len(), 2);
    assert_eq!(reference[0].len(), 6 * 1152);
    assert!(reference[0].iter().any(|&s| s != 0), "单音解码结果不应为静音");

    for chunk in [1, 7, 64, 417, 1000] {
        let (decoder, planes) = decode_chunked(DecoderOptions::default(), &data, chunk);
        assert_eq!(planes, reference, "分块大小 {chunk} 的结果与一次性解码不一致");
        assert_eq!(decoder.stats().frames_decoded, 6);
        assert_eq!(decoder.stats().huffman_overruns, 0);
        assert_eq!(decoder.stats().reservoir_underflows, 0);
    }
}

#[test]
fn test_need_more_progression() {
    const SENTINEL: i16 = 0x1234;
    let data = zero_stream(L3_STEREO_HEADER, L3_STEREO_FRAME_LEN, 2);
    let mut decoder = MpaDecoder::new(DecoderOptions {
        detect_vbr_tag: false,
        ..Default::default()
    });
    let mut pcm = vec![SENTINEL; MAX_FRAME_SAMPLES];
    let untouched = |pcm: &[i16]| pcm.iter().all(|&s| s == SENTINEL);

    assert!(matches!(decoder.decode(&data[..3], &mut pcm), Ok(DecodeStatus::NeedMore)));
    assert_eq!(decoder.stage(), FrameStage::AwaitHeader);
    assert_eq!(decoder.buffered_len(), 3);

    // 第一帧只解析帧头
    assert!(matches!(decoder.decode(&data[3..4], &mut pcm), Ok(DecodeStatus::NeedMore)));
    assert!(decoder.header_parsed());
    assert!(!decoder.side_parsed());
    assert_eq!(decoder.buffered_len(), 0);

    assert!(matches!(decoder.decode(&data[4..20], &mut pcm), Ok(DecodeStatus::NeedMore)));
    assert_eq!(decoder.stage(), FrameStage::AwaitSideInfo);
    assert_eq!(decoder.buffered_len(), 16);
    assert!(untouched(&pcm), "数据不足时不应写输出");

    let status = decoder.decode(&data[20..L3_STEREO_FRAME_LEN], &mut pcm);
    assert!(matches!(
        status,
        Ok(DecodeStatus::Decoded { samples: 1152, channels: 2, .. })
    ));
    assert_eq!(decoder.stage(), FrameStage::AwaitHeader);
    assert_eq!(decoder.buffered_len(), 0);
    assert!(pcm[..2304].iter().all(|&s| s == 0));

    // 已解码的帧在之后的 NEED_MORE 中保持不变
    let decoded = pcm.clone();
    assert!(matches!(decoder.decode(&[], &mut pcm), Ok(DecodeStatus::NeedMore)));
    assert!(matches!(
        decoder.decode(&data[L3_STEREO_FRAME_LEN..L3_STEREO_FRAME_LEN + 20], &mut pcm),
        Ok(DecodeStatus::NeedMore)
    ));
    assert_eq!(pcm, decoded);
}

#[test]
fn test_first_sync_waits_for_tag_window() {
    let data = zero_stream(L3_STEREO_HEADER, L3_STEREO_FRAME_LEN, 2);
    let mut decoder = MpaDecoder::default();
    let mut pcm = vec![0i16; MAX_FRAME_SAMPLES];

    assert!(matches!(decoder.decode(&data[..100], &mut pcm), Ok(DecodeStatus::NeedMore)));
    assert!(!decoder.header_parsed());
    assert_eq!(decoder.buffered_len(), 100);

    assert!(matches!(decoder.decode(&data[100..], &mut pcm), Ok(DecodeStatus::NeedMore)));
    assert!(decoder.header_parsed());
}

#[test]
fn test_silence_frame() {
    let data = zero_stream(L3_STEREO_HEADER, L3_STEREO_FRAME_LEN, 2);
    let mut decoder = MpaDecoder::default();
    let mut pcm = vec![1i16; MAX_FRAME_SAMPLES];

    assert!(matches!(decoder.decode(&data, &mut pcm), Ok(DecodeStatus::NeedMore)));
    for _ in 0..2 {
        pcm.fill(1);
        let status = decoder.decode(&[], &mut pcm);
        assert!(matches!(
            status,
            Ok(DecodeStatus::Decoded { samples: 1152, channels: 2, .. })
        ));
        assert!(pcm.iter().all(|&s| s == 0));
    }
    assert!(matches!(decoder.decode(&[], &mut pcm), Ok(DecodeStatus::NeedMore)));

    let stats = decoder.stats();
    assert_eq!(stats.frames_decoded, 2);
    assert_eq!(stats.clipped_samples, 0);
    assert_eq!(stats.skipped_bytes, 0);
}

#[test]
fn test_single_channel_selection_matches_stereo_planes() {
    let data = tone_stream(4, 40);
    let reference = decode_or_panic(&data);

    for (select, plane) in [(ChannelSelect::Left, 0), (ChannelSelect::Right, 1)] {
        let options = DecoderOptions {
            channel_select: select,
            ..Default::default()
        };
        let (_, planes) = decode_chunked(options, &data, data.len());
        assert_eq!(planes.len(), 1);
        assert_eq!(planes[0], reference[plane], "{select:?}");
    }

    let options = DecoderOptions {
        channel_select: ChannelSelect::Mix,
        ..Default::default()
    };
    let (_, planes) = decode_chunked(options, &data, data.len());
    assert_eq!(planes.len(), 1);
    assert_eq!(planes[0].len(), reference[0].len());
}

#[test]
fn test_unclipped_output_rounds_to_clipped() {
    let data = tone_stream(3, 40);
    let mut clipped = MpaDecoder::default();
    let mut unclipped = MpaDecoder::default();
    let mut pcm_i16 = vec![0i16; MAX_FRAME_SAMPLES];
    let mut pcm_f32 = vec![0f32; MAX_FRAME_SAMPLES];

    let mut input: &[u8] = &data;
    let mut frames = 0;
    for _ in 0..8 {
        let a = clipped.decode(input, &mut pcm_i16);
        let b = unclipped.decode_unclipped(input, &mut pcm_f32);
        input = &[];
        match (a, b) {
            (Ok(DecodeStatus::Decoded { samples, channels, format }), Ok(status)) => {
                assert_eq!(format, SampleFormat::S16);
                assert_eq!(
                    status,
                    DecodeStatus::Decoded {
                        samples,
                        channels,
                        format: SampleFormat::F32
                    }
                );
                for (&i, &f) in pcm_i16.iter().zip(&pcm_f32).take(samples * channels) {
                    assert!((f32::from(i) - f).abs() <= 0.5001, "i16 {i} 与 f32 {f} 不一致");
                }
                frames += 1;
            }
            (Ok(DecodeStatus::NeedMore), Ok(DecodeStatus::NeedMore)) => {}
            (a, b) => panic!("两种输出的解码状态不一致: {a:?} / {b:?}"),
        }
    }
    assert_eq!(frames, 3);
    assert_eq!(clipped.stats().clipped_samples, 0);
}

#[test]
fn test_reservoir_underflow_skips_frame() {
    init_logger();
    // 去掉第一帧, 新的首帧引用了不存在的上一帧
    let data = tone_stream(5, 40);
    let tail = &data[L3_STEREO_FRAME_LEN..];

    let mut decoder = MpaDecoder::default();
    let mut pcm = vec![0i16; MAX_FRAME_SAMPLES];
    assert!(matches!(decoder.decode(tail, &mut pcm), Ok(DecodeStatus::NeedMore)));
    match decoder.decode(&[], &mut pcm) {
        Err(MpaError::ReservoirUnderflow { backstep, .. }) => assert_eq!(backstep, 40),
        other => panic!("期望储备库下溢, 实际 {other:?}"),
    }
    // 下溢帧的字节已被消费, 后续帧正常
    assert_eq!(decoder.stage(), FrameStage::AwaitHeader);
    assert!(matches!(
        decoder.decode(&[], &mut pcm),
        Ok(DecodeStatus::Decoded { samples: 1152, channels: 2, .. })
    ));

    let mut decoder = MpaDecoder::default();
    let pcm = match decoder.decode_frames(tail) {
        Ok(pcm) => pcm,
        Err(err) => panic!("解码失败: {err}"),
    };
    assert_eq!(pcm.samples_per_channel(), 3 * 1152);
    assert_eq!(decoder.stats().reservoir_underflows, 1);
    assert_eq!(decoder.stats().frames_decoded, 3);
}

#[test]
fn test_granule_past_frame_end_reports_overrun() {
    init_logger();
    let data = oversized_granule_stream(3);
    let mut decoder = MpaDecoder::default();
    let pcm = match decoder.decode_frames(&data) {
        Ok(pcm) => pcm,
        Err(err) => panic!("解码失败: {err}"),
    };
    assert_eq!(pcm.samples_per_channel(), 3 * 1152);
    let stats = decoder.stats();
    assert_eq!(stats.frames_decoded, 3);
    // 每帧 4 个 granule 都缺少主数据
    assert_eq!(stats.huffman_overruns, 12);
    // 右声道的 granule 完全落在帧外, 不能把缓冲区之外的零位解码成频谱
    assert!(pcm.channels[1].iter().all(|&s| s == 0));
}

#[test]
fn test_crc_verification() {
    init_logger();
    let data: Vec<u8> = [false, true, false]
        .into_iter()
        .flat_map(crc_zero_frame)
        .collect();

    let verify = DecoderOptions {
        verify_crc: true,
        ..Default::default()
    };
    let (decoder, planes) = decode_chunked(verify, &data, data.len());
    assert_eq!(planes[0].len(), 3 * 1152);
    assert_eq!(decoder.stats().crc_mismatches, 1);

    let (decoder, _) = decode_chunked(DecoderOptions::default(), &data, data.len());
    assert_eq!(decoder.stats().crc_mismatches, 0);
    assert_eq!(decoder.stats().frames_decoded, 3);
}

#[test]
fn test_reset_restores_fresh_state() {
    let data = tone_stream(2, 40);
    let mut decoder = MpaDecoder::default();
    let first = match decoder.decode_frames(&data) {
        Ok(pcm) => pcm,
        Err(err) => panic!("解码失败: {err}"),
    };
    decoder.reset();
    assert_eq!(decoder.stats().frames_decoded, 0);
    assert!(decoder.stream_info().is_none());
    let second = match decoder.decode_frames(&data) {
        Ok(pcm) => pcm,
        Err(err) => panic!("解码失败: {err}"),
    };
    assert_eq!(first, second);
}
