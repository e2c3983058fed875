//! Layer I 解码
//!
//! 每帧 12 个时隙, 每个子带每时隙一个线性量化样本.

use super::bitreader::BitReader;
use super::header::FrameHeader;
use super::imdct::SUBBANDS;
use super::layer12::{dequantize, joint_bound, scale_multiplier};
use super::synthesis::SubbandSamples;

const SLOTS: usize = 12;

/// 解码一帧 Layer I 主数据 (读取位置已越过 CRC)
pub fn decode(reader: &mut BitReader, header: &FrameHeader, out: &mut SubbandSamples) {
    let channels = header.channels();
    let bound = joint_bound(header, SUBBANDS);

    let mut alloc = [[0u8; SUBBANDS]; 2];
    for sb in 0..SUBBANDS {
        if sb < bound {
            for ch_alloc in alloc.iter_mut().take(channels) {
                ch_alloc[sb] = reader.get_bits(4) as u8;
            }
        } else {
            let shared = reader.get_bits(4) as u8;
            alloc[0][sb] = shared;
            alloc[1][sb] = shared;
        }
    }

    let mut scale = [[0f32; SUBBANDS]; 2];
    for sb in 0..SUBBANDS {
        for ch in 0..channels {
            if alloc[ch][sb] != 0 {
                scale[ch][sb] = scale_multiplier(reader.get_bits(6) as u8);
            }
        }
    }

    out.channels = channels;
    out.slots = SLOTS;
    for slot in 0..SLOTS {
        for sb in 0..SUBBANDS {
            let mut shared = None;
            for ch in 0..channels {
                let nb = u32::from(alloc[ch][sb]);
                out.data[ch][slot][sb] = if nb == 0 {
                    0.0
                } else {
                    let bits = nb + 1;
                    let code = if sb < bound {
                        reader.get_bits(bits)
                    } else {
                        *shared.get_or_insert_with(|| reader.get_bits(bits))
                    };
                    dequantize(code, (1 << bits) - 1) * scale[ch][sb]
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpa_core::BitWriter;

    fn mono_header() -> FrameHeader {
        // MPEG-1 Layer I, 32 kbps, 44.1 kHz, 单声道, 无 CRC
        FrameHeader::decode(0xFFFF_10C0).unwrap()
    }

    #[test]
    fn test_single_subband_reconstruction() {
        let header = mono_header();
        let mut w = BitWriter::new();
        // 子带 0 分配 3 (4 位样本), 其余为 0
        w.write_bits(3, 4);
        for _ in 1..32 {
            w.write_bits(0, 4);
        }
        // 比例因子索引 3 -> 乘数 1.0
        w.write_bits(3, 6);
        for _ in 0..12 {
            w.write_bits(14, 4);
        }
        let data = w.finish();

        let mut reader = BitReader::new(&data);
        let mut out = SubbandSamples::default();
        decode(&mut reader, &header, &mut out);
        assert_eq!(out.channels, 1);
        assert_eq!(out.slots, 12);
        for slot in 0..12 {
            assert!((out.data[0][slot][0] - 14.0 / 15.0).abs() < 1e-6);
            assert_eq!(out.data[0][slot][1], 0.0);
        }
        assert_eq!(reader.bit_offset(), 32 * 4 + 6 + 12 * 4);
    }

    #[test]
    fn test_joint_stereo_shares_samples_above_bound() {
        // 联合立体声, mode_ext 0 -> 边界 4
        let header = FrameHeader::decode(0xFFFF_1040).unwrap();
        assert_eq!(joint_bound(&header, SUBBANDS), 4);

        let mut w = BitWriter::new();
        for sb in 0..32 {
            let count = if sb < 4 { 2 } else { 1 };
            for _ in 0..count {
                w.write_bits(u32::from(sb == 5), 4);
            }
        }
        // 子带 5 两个声道各自的比例因子
        w.write_bits(3, 6);
        w.write_bits(6, 6);
        for _ in 0..12 {
            // 2 位样本, 共享一次
            w.write_bits(2, 2);
        }
        let data = w.finish();

        let mut reader = BitReader::new(&data);
        let mut out = SubbandSamples::default();
        decode(&mut reader, &header, &mut out);
        assert_eq!(out.channels, 2);
        let left = out.data[0][0][5];
        let right = out.data[1][0][5];
        assert!((left - 2.0 / 3.0).abs() < 1e-6);
        assert!((right - left * 0.5).abs() < 1e-6);
        assert_eq!(reader.bit_offset(), (4 * 2 + 28) * 4 + 12 + 12 * 2);
    }
}
