//! 集成测试共用的码流构造工具

#![allow(dead_code)]

use mpa::codec::mpa::tables::QUAD_CODEBOOKS;
use mpa::codec::{DecoderOptions, MpaDecoder};
use mpa::core::BitWriter;
use mpa::core::crc::{MPEG_CRC16_INIT, crc16_update};

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, 立体声, 无 CRC
pub const L3_STEREO_HEADER: u32 = 0xFFFB_9000;
/// 同上, 带 CRC
pub const L3_STEREO_CRC_HEADER: u32 = 0xFFFA_9000;
pub const L3_STEREO_FRAME_LEN: usize = 417;
const L3_STEREO_SIDE_LEN: usize = 32;

/// MPEG-1 Layer III 自由格式立体声
pub const L3_FREE_HEADER: u32 = 0xFFFB_0000;

/// MPEG-1 Layer II, 128 kbps, 44.1 kHz, 立体声
pub const L2_STEREO_HEADER: u32 = 0xFFFD_8000;
pub const L2_STEREO_FRAME_LEN: usize = 417;

/// MPEG-1 Layer I, 32 kbps, 44.1 kHz, 单声道
pub const L1_MONO_HEADER: u32 = 0xFFFF_10C0;
pub const L1_MONO_FRAME_LEN: usize = 32;

/// 帧头之后全部为 0 的帧: 所有层都解码为静音
pub fn zero_frame(header: u32, frame_len: usize) -> Vec<u8> {
    let mut frame = header.to_be_bytes().to_vec();
    frame.resize(frame_len, 0);
    frame
}

pub fn zero_stream(header: u32, frame_len: usize, frames: usize) -> Vec<u8> {
    (0..frames)
        .flat_map(|_| zero_frame(header, frame_len))
        .collect()
}

/// 带 CRC 的 Layer III 静音帧, `corrupt` 为真时写入错误的校验字
pub fn crc_zero_frame(corrupt: bool) -> Vec<u8> {
    let head = L3_STEREO_CRC_HEADER.to_be_bytes();
    let side = [0u8; L3_STEREO_SIDE_LEN];
    let mut crc = crc16_update(crc16_update(MPEG_CRC16_INIT, &head[2..]), &side);
    if corrupt {
        crc ^= 0x0101;
    }
    let mut frame = head.to_vec();
    frame.extend_from_slice(&crc.to_be_bytes());
    frame.extend_from_slice(&side);
    frame.resize(L3_STEREO_FRAME_LEN, 0);
    frame
}

/// 每个 granule/声道的非零四元组个数
const TONE_QUADS: usize = 6;
const TONE_GLOBAL_GAIN: u32 = 190;

/// Layer III 单音码流
///
/// 每帧的主数据恰好占满一个帧槽. 除第一帧外 main_data_begin 均为
/// `reservoir`, 即主数据从上一帧槽末尾的 `reservoir` 字节开始.
/// 频谱只用 count1 区 (表 B), 其余位以 1 填充 (表 B 中的全零四元组).
pub fn tone_stream(frames: usize, reservoir: usize) -> Vec<u8> {
    let payload = L3_STEREO_FRAME_LEN - 4 - L3_STEREO_SIDE_LEN;
    assert!(reservoir < payload);
    let quad_b = &QUAD_CODEBOOKS[1];

    let mut sides = Vec::with_capacity(frames);
    let mut main_stream = Vec::new();
    for f in 0..frames {
        let begin = if f == 0 { 0 } else { reservoir };
        let data_len = payload - (reservoir - begin);
        let granule_bits = data_len * 8 / 4;

        let mut side = BitWriter::new();
        side.write_bits(begin as u32, 9);
        side.write_bits(0, 3);
        side.write_bits(0, 8);
        for _ in 0..4 {
            side.write_bits(granule_bits as u32, 12);
            side.write_bits(0, 9);
            side.write_bits(TONE_GLOBAL_GAIN, 8);
            side.write_bits(0, 4);
            side.write_bits(0, 1);
            side.write_bits(0, 15);
            side.write_bits(0, 7);
            side.write_bits(0, 2);
            side.write_bits(1, 1);
        }
        let side = side.finish();
        assert_eq!(side.len(), L3_STEREO_SIDE_LEN);
        sides.push(side);

        let mut main = BitWriter::new();
        for gc in 0..4 {
            let start = main.bits_written();
            for q in 0..TONE_QUADS {
                // 四元组 (1, 0, 0, 0), 符号随帧与位置变化
                main.write_bits(quad_b.codes[0b1000], u32::from(quad_b.lens[0b1000]));
                main.write_bits(((f + gc + q) % 2) as u32, 1);
            }
            while main.bits_written() - start < granule_bits {
                main.write_bit(1);
            }
        }
        let main = main.finish();
        assert_eq!(main.len(), data_len);
        main_stream.extend_from_slice(&main);
    }
    main_stream.resize(frames * payload, 0);

    let mut out = Vec::with_capacity(frames * L3_STEREO_FRAME_LEN);
    for (f, side) in sides.iter().enumerate() {
        out.extend_from_slice(&L3_STEREO_HEADER.to_be_bytes());
        out.extend_from_slice(side);
        out.extend_from_slice(&main_stream[f * payload..(f + 1) * payload]);
    }
    out
}

/// 每个 granule 都声明 part2_3_length = 4095 的 Layer III 立体声帧
///
/// 帧体全零, 大值区用表 1 (288 对). 声明的位数远超帧长, 解码器只能读到
/// 第一个 granule 的一部分.
pub fn oversized_granule_stream(frames: usize) -> Vec<u8> {
    let mut side = BitWriter::new();
    side.write_bits(0, 9);
    side.write_bits(0, 3);
    side.write_bits(0, 8);
    for _ in 0..4 {
        side.write_bits(4095, 12);
        side.write_bits(288, 9);
        side.write_bits(210, 8);
        side.write_bits(0, 4);
        side.write_bits(0, 1);
        for _ in 0..3 {
            side.write_bits(1, 5);
        }
        side.write_bits(0, 7);
        side.write_bits(0, 3);
    }
    let side = side.finish();
    assert_eq!(side.len(), L3_STEREO_SIDE_LEN);

    let mut frame = L3_STEREO_HEADER.to_be_bytes().to_vec();
    frame.extend_from_slice(&side);
    frame.resize(L3_STEREO_FRAME_LEN, 0);
    frame.repeat(frames)
}

/// Layer I 单声道帧: 子带 0 每个时隙取 `code` (4 位样本), 比例因子索引为 `scf`
pub fn layer1_frame(code: u32, scf: u32) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_bits(L1_MONO_HEADER, 32);
    w.write_bits(3, 4);
    for _ in 1..32 {
        w.write_bits(0, 4);
    }
    w.write_bits(scf, 6);
    for _ in 0..12 {
        w.write_bits(code, 4);
    }
    w.pad_to_len(L1_MONO_FRAME_LEN);
    w.finish()
}

/// 按 `chunk` 字节分块喂入, 每块之后尽量多地解码
pub fn decode_chunked(
    options: DecoderOptions,
    data: &[u8],
    chunk: usize,
) -> (MpaDecoder, Vec<Vec<i16>>) {
    let mut decoder = MpaDecoder::new(options);
    let mut planes: Vec<Vec<i16>> = Vec::new();
    for piece in data.chunks(chunk) {
        let pcm = match decoder.decode_frames(piece) {
            Ok(pcm) => pcm,
            Err(err) => panic!("分块解码失败: {err}"),
        };
        if planes.len() < pcm.channels.len() {
            planes.resize(pcm.channels.len(), Vec::new());
        }
        for (plane, samples) in planes.iter_mut().zip(pcm.channels) {
            plane.extend(samples);
        }
    }
    (decoder, planes)
}
