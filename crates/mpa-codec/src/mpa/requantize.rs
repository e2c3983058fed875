//! Layer III 反量化
//!
//! xr = sign(is) * |is|^(4/3) * 2^(0.25 * (global_gain - 210 - 8 * subblock_gain))
//!      * 2^(-(scalefac + pretab) * (1 + scalefac_scale) / 2)
//!
//! 长块谱线按原顺序输出. 短块谱线在码流中按 (带, 窗口, 谱线) 排列, 输出时
//! 交织成 `3 * 谱线 + 窗口`, 使每个子带的 18 个值正好是三个窗口各 6 条谱线.

use std::sync::OnceLock;

use super::huffman::GRANULE_LINES;
use super::scalefac::{Scalefactors, mixed_long_count, short_scalefac_index};
use super::side_info::GranuleInfo;
use super::tables::{LONG_BAND_BOUNDS, PRETAB, SHORT_BAND_BOUNDS};

/// |is|^(4/3) 表大小 (15 + 13 位 linbits)
const POW43_TABLE_SIZE: usize = 8207;

/// 增益表大小, 下标 256 - global_gain + 偏移
const GAIN_TABLE_SIZE: usize = 512;

/// M/S 立体声的增益偏移 (1/sqrt(2))
pub const MS_GAIN_OFFSET: i32 = 2;
/// 双声道混为单声道的增益偏移 (1/2)
pub const MIX_GAIN_OFFSET: i32 = 4;

static POW43_TABLE: OnceLock<Vec<f32>> = OnceLock::new();
static GAIN_POW2: OnceLock<Vec<f32>> = OnceLock::new();

fn pow43_table() -> &'static [f32] {
    POW43_TABLE.get_or_init(|| {
        (0..POW43_TABLE_SIZE)
            .map(|i| (i as f64).powf(4.0 / 3.0) as f32)
            .collect()
    })
}

fn gain_pow2_table() -> &'static [f32] {
    GAIN_POW2.get_or_init(|| {
        (0..GAIN_TABLE_SIZE)
            .map(|i| 2f64.powf(-0.25 * (i as f64 - 256.0 + 210.0)) as f32)
            .collect()
    })
}

#[inline]
fn gain_pow2(index: i32) -> f32 {
    let table = gain_pow2_table();
    table[index.clamp(0, GAIN_TABLE_SIZE as i32 - 1) as usize]
}

#[inline]
fn pow43(value: i32, table: &[f32]) -> f32 {
    let magnitude = value.unsigned_abs() as usize;
    let v = if magnitude < POW43_TABLE_SIZE {
        table[magnitude]
    } else {
        (magnitude as f32).powf(4.0 / 3.0)
    };
    if value < 0 { -v } else { v }
}

/// 反量化一个 granule
///
/// `gain_offset` 以 2^(-1/4) 为单位额外衰减 (M/S 与混音时使用).
pub fn dequantize(
    quantized: &[i32; GRANULE_LINES],
    info: &GranuleInfo,
    scf: &Scalefactors,
    sfreq: usize,
    lsf: bool,
    gain_offset: i32,
    xr: &mut [f32; GRANULE_LINES],
) {
    xr.fill(0.0);
    let pow43_table = pow43_table();
    let base = 256 - info.global_gain as i32 + gain_offset;
    let shift = 1 + u32::from(info.scalefac_scale);
    let long_bounds = &LONG_BAND_BOUNDS[sfreq];
    let short_bounds = &SHORT_BAND_BOUNDS[sfreq];

    let (long_bands, first_short) = if !info.is_short() {
        (22, 13)
    } else if info.mixed_block {
        (mixed_long_count(lsf), 3)
    } else {
        (0, 0)
    };

    for sfb in 0..long_bands {
        let mut sf = i32::from(scf[sfb]);
        if info.preflag {
            sf += i32::from(PRETAB[sfb]);
        }
        let gain = gain_pow2(base + (sf << shift));
        for line in long_bounds[sfb]..long_bounds[sfb + 1] {
            if quantized[line] != 0 {
                xr[line] = pow43(quantized[line], pow43_table) * gain;
            }
        }
    }

    let mut cursor = 3 * short_bounds[first_short];
    for sfb in first_short..13 {
        let start = short_bounds[sfb];
        let width = short_bounds[sfb + 1] - start;
        for window in 0..3 {
            let sf = if sfb < 12 {
                i32::from(scf[short_scalefac_index(info, lsf, sfb, window)])
            } else {
                0
            };
            let gain = gain_pow2(
                base + 8 * i32::from(info.subblock_gain[window]) + (sf << shift),
            );
            for k in 0..width {
                let q = quantized[cursor];
                cursor += 1;
                if q != 0 {
                    xr[3 * (start + k) + window] = pow43(q, pow43_table) * gain;
                }
            }
        }
    }
}
