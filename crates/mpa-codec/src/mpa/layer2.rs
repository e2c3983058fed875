//! Layer II 解码
//!
//! 每帧 3 个比例因子段, 每段 4 组, 每组每子带 3 个样本. 3/5/9 级量化的
//! 三个样本合并为一个码字传输.

use log::warn;

use super::bitreader::BitReader;
use super::header::FrameHeader;
use super::imdct::SUBBANDS;
use super::layer12::{dequantize, joint_bound, scale_multiplier};
use super::synthesis::SubbandSamples;

/// 一组子带的比特分配: 分配字段位宽与各分配值对应的量化级数 (分配值 0 表示无样本)
#[derive(Debug)]
struct AllocBand {
    subbands: usize,
    nbal: u32,
    steps: &'static [u32],
}

#[derive(Debug)]
struct AllocTable {
    sblimit: usize,
    bands: &'static [AllocBand],
}

const STEPS_HIGH_A: [u32; 15] = [
    3, 7, 15, 31, 63, 127, 255, 511, 1023, 2047, 4095, 8191, 16383, 32767, 65535,
];
const STEPS_MID_A: [u32; 15] = [
    3, 5, 7, 9, 15, 31, 63, 127, 255, 511, 1023, 2047, 4095, 8191, 65535,
];
const STEPS_LOW_A: [u32; 7] = [3, 5, 7, 9, 15, 31, 65535];
const STEPS_TOP_A: [u32; 3] = [3, 5, 65535];
const STEPS_HIGH_C: [u32; 15] = [
    3, 5, 9, 15, 31, 63, 127, 255, 511, 1023, 2047, 4095, 8191, 16383, 32767,
];
const STEPS_LOW_C: [u32; 7] = [3, 5, 9, 15, 31, 63, 127];
const STEPS_HIGH_LSF: [u32; 15] = [
    3, 5, 7, 9, 15, 31, 63, 127, 255, 511, 1023, 2047, 4095, 8191, 16383,
];
const STEPS_TOP_LSF: [u32; 3] = [3, 5, 9];

/// ISO 11172-3 表 B.2a: 高码率, sblimit 27
static TABLE_A: AllocTable = AllocTable {
    sblimit: 27,
    bands: &[
        AllocBand { subbands: 3, nbal: 4, steps: &STEPS_HIGH_A },
        AllocBand { subbands: 8, nbal: 4, steps: &STEPS_MID_A },
        AllocBand { subbands: 12, nbal: 3, steps: &STEPS_LOW_A },
        AllocBand { subbands: 4, nbal: 2, steps: &STEPS_TOP_A },
    ],
};

/// 表 B.2b: 高码率, sblimit 30
static TABLE_B: AllocTable = AllocTable {
    sblimit: 30,
    bands: &[
        AllocBand { subbands: 3, nbal: 4, steps: &STEPS_HIGH_A },
        AllocBand { subbands: 8, nbal: 4, steps: &STEPS_MID_A },
        AllocBand { subbands: 12, nbal: 3, steps: &STEPS_LOW_A },
        AllocBand { subbands: 7, nbal: 2, steps: &STEPS_TOP_A },
    ],
};

/// 表 B.2c: 低码率, sblimit 8
static TABLE_C: AllocTable = AllocTable {
    sblimit: 8,
    bands: &[
        AllocBand { subbands: 2, nbal: 4, steps: &STEPS_HIGH_C },
        AllocBand { subbands: 6, nbal: 3, steps: &STEPS_LOW_C },
    ],
};

/// 表 B.2d: 低码率 32 kHz, sblimit 12
static TABLE_D: AllocTable = AllocTable {
    sblimit: 12,
    bands: &[
        AllocBand { subbands: 2, nbal: 4, steps: &STEPS_HIGH_C },
        AllocBand { subbands: 10, nbal: 3, steps: &STEPS_LOW_C },
    ],
};

/// ISO 13818-3 表 B.1: 低采样率, sblimit 30
static TABLE_LSF: AllocTable = AllocTable {
    sblimit: 30,
    bands: &[
        AllocBand { subbands: 4, nbal: 4, steps: &STEPS_HIGH_LSF },
        AllocBand { subbands: 7, nbal: 3, steps: &STEPS_LOW_C },
        AllocBand { subbands: 19, nbal: 2, steps: &STEPS_TOP_LSF },
    ],
};

/// 按每声道码率与采样率选择分配表
fn select_table(header: &FrameHeader) -> &'static AllocTable {
    if header.lsf {
        return &TABLE_LSF;
    }
    let per_channel = header.bitrate_kbps() / header.channels() as u32;
    let freq = header.sample_rate();
    if (freq == 48000 && per_channel >= 56) || (56..=80).contains(&per_channel) {
        &TABLE_A
    } else if freq != 48000 && per_channel >= 96 {
        &TABLE_B
    } else if freq != 32000 && per_channel <= 48 {
        &TABLE_C
    } else {
        &TABLE_D
    }
}

/// 子带 -> 分配行
fn band_of(table: &AllocTable, sb: usize) -> &'static AllocBand {
    let mut start = 0;
    for band in table.bands {
        start += band.subbands;
        if sb < start {
            return band;
        }
    }
    // sb < sblimit 时不会到达
    &table.bands[table.bands.len() - 1]
}

/// 量化级数 -> (码字位宽, 是否三样本合并)
fn codeword_layout(steps: u32) -> (u32, bool) {
    match steps {
        3 => (5, true),
        5 => (7, true),
        9 => (10, true),
        _ => (32 - steps.leading_zeros(), false),
    }
}

/// 读取一个子带的三个量化码值
fn read_triple(reader: &mut BitReader, steps: u32) -> [u32; 3] {
    let (bits, grouped) = codeword_layout(steps);
    if grouped {
        let mut code = reader.get_bits(bits);
        std::array::from_fn(|_| {
            let value = code % steps;
            code /= steps;
            value
        })
    } else {
        std::array::from_fn(|_| reader.get_bits(bits))
    }
}

/// 解码一帧 Layer II 主数据 (读取位置已越过 CRC)
pub fn decode(reader: &mut BitReader, header: &FrameHeader, out: &mut SubbandSamples) {
    let channels = header.channels();
    let table = select_table(header);
    let sblimit = table.sblimit;
    let bound = joint_bound(header, sblimit);

    let mut alloc = [[0u8; SUBBANDS]; 2];
    for sb in 0..sblimit {
        let nbal = band_of(table, sb).nbal;
        if sb < bound {
            for ch_alloc in alloc.iter_mut().take(channels) {
                ch_alloc[sb] = reader.get_bits(nbal) as u8;
            }
        } else {
            let shared = reader.get_bits(nbal) as u8;
            alloc[0][sb] = shared;
            alloc[1][sb] = shared;
        }
    }

    let mut scfsi = [[0u8; SUBBANDS]; 2];
    for sb in 0..sblimit {
        for ch in 0..channels {
            if alloc[ch][sb] != 0 {
                scfsi[ch][sb] = reader.get_bits(2) as u8;
            }
        }
    }

    let mut scale = [[[0f32; 3]; SUBBANDS]; 2];
    for sb in 0..sblimit {
        for ch in 0..channels {
            if alloc[ch][sb] == 0 {
                continue;
            }
            let mut next = || scale_multiplier(reader.get_bits(6) as u8);
            scale[ch][sb] = match scfsi[ch][sb] {
                0 => [next(), next(), next()],
                1 => {
                    let a = next();
                    let b = next();
                    [a, a, b]
                }
                2 => {
                    let a = next();
                    [a, a, a]
                }
                _ => {
                    let a = next();
                    let b = next();
                    [a, b, b]
                }
            };
        }
    }

    out.channels = channels;
    out.slots = 36;
    let mut invalid_codes = 0usize;
    for part in 0..3 {
        for group in 0..4 {
            let slot = part * 12 + group * 3;
            for sb in 0..SUBBANDS {
                let mut shared = None;
                for ch in 0..channels {
                    let index = usize::from(alloc[ch][sb]);
                    if sb >= sblimit || index == 0 {
                        for k in 0..3 {
                            out.data[ch][slot + k][sb] = 0.0;
                        }
                        continue;
                    }
                    let band = band_of(table, sb);
                    let Some(&steps) = band.steps.get(index - 1) else {
                        invalid_codes += 1;
                        for k in 0..3 {
                            out.data[ch][slot + k][sb] = 0.0;
                        }
                        continue;
                    };
                    let codes = if sb < bound {
                        read_triple(reader, steps)
                    } else {
                        *shared.get_or_insert_with(|| read_triple(reader, steps))
                    };
                    let factor = scale[ch][sb][part];
                    for (k, &code) in codes.iter().enumerate() {
                        out.data[ch][slot + k][sb] = dequantize(code, steps) * factor;
                    }
                }
            }
        }
    }
    if invalid_codes > 0 {
        warn!("Layer II 比特分配值越界 {invalid_codes} 次, 对应子带置零");
    }
}
