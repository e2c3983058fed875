//! Layer III 立体声重建
//!
//! M/S 立体声先于强度立体声处理, 但强度立体声的起始带要在 M/S 之前由右声道
//! 最后一个非零带确定. 强度区域内用右声道的比例因子 (is_pos) 把左声道频谱拆分
//! 到两个声道, is_pos 为 7 的带保持原样.

use std::sync::OnceLock;

use super::huffman::GRANULE_LINES;
use super::scalefac::{Scalefactors, mixed_long_count, short_scalefac_index};
use super::side_info::GranuleInfo;
use super::tables::{LONG_BAND_BOUNDS, SHORT_BAND_BOUNDS};

/// 表示 "不做强度立体声" 的 is_pos
pub const IS_POS_PASSTHROUGH: u8 = 7;

/// 一对拆分系数表 (左, 右)
struct RatioTables {
    /// MPEG-1: 按 [ms][is_pos] 索引, 只有 0..7 有效
    mpeg1: [[(f32, f32); 7]; 2],
    /// MPEG-2: 按 [ms][scalefac_compress & 1][is_pos] 索引
    lsf: [[[(f32, f32); 32]; 2]; 2],
}

static RATIO_TABLES: OnceLock<RatioTables> = OnceLock::new();

fn ratio_tables() -> &'static RatioTables {
    RATIO_TABLES.get_or_init(|| {
        let sqrt2 = std::f64::consts::SQRT_2;
        let mut mpeg1 = [[(0.0, 0.0); 7]; 2];
        for i in 0..7 {
            let t = (i as f64 * std::f64::consts::PI / 12.0).tan();
            let (l, r) = if i == 6 {
                (1.0, 0.0)
            } else {
                (t / (1.0 + t), 1.0 / (1.0 + t))
            };
            mpeg1[0][i] = (l as f32, r as f32);
            mpeg1[1][i] = ((sqrt2 * l) as f32, (sqrt2 * r) as f32);
        }

        let mut lsf = [[[(0.0, 0.0); 32]; 2]; 2];
        for j in 0..2 {
            let base = 2f64.powf(-0.25 * (j as f64 + 1.0));
            for i in 0..32 {
                let (mut p1, mut p2) = (1.0, 1.0);
                if i > 0 {
                    if i & 1 == 1 {
                        p1 = base.powf((i as f64 + 1.0) * 0.5);
                    } else {
                        p2 = base.powf(i as f64 * 0.5);
                    }
                }
                lsf[0][j][i] = (p1 as f32, p2 as f32);
                lsf[1][j][i] = ((sqrt2 * p1) as f32, (sqrt2 * p2) as f32);
            }
        }
        RatioTables { mpeg1, lsf }
    })
}

/// M/S 重建: 左 = 中 + 侧, 右 = 中 - 侧 (1/sqrt(2) 已计入反量化增益)
pub fn ms_stereo(left: &mut [f32; GRANULE_LINES], right: &mut [f32; GRANULE_LINES]) {
    for (l, r) in left.iter_mut().zip(right.iter_mut()) {
        let (m, s) = (*l, *r);
        *l = m + s;
        *r = m - s;
    }
}

/// 强度立体声参数
#[derive(Debug, Clone, Copy)]
pub struct IntensityParams<'a> {
    /// 右声道侧信息 (决定块类型)
    pub info: &'a GranuleInfo,
    /// 右声道比例因子, 即 is_pos
    pub scf: &'a Scalefactors,
    pub sfreq: usize,
    pub lsf: bool,
    pub ms_stereo: bool,
}

/// 强度立体声的起始带, 须在 M/S 之前由右声道的原始频谱确定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityBands {
    /// 长块: 起始长带
    Long(usize),
    /// 短块与混合块: 每个窗口的起始短带, 以及混合块长带部分的起始带
    Short {
        windows: [usize; 3],
        mixed_long: Option<usize>,
    },
}

/// 按右声道最后一个非零带确定强度立体声区域
pub fn locate_intensity_bands(
    right: &[f32; GRANULE_LINES],
    params: &IntensityParams<'_>,
) -> IntensityBands {
    let info = params.info;
    let long_bounds = &LONG_BAND_BOUNDS[params.sfreq];
    if !info.is_short() {
        return IntensityBands::Long(last_long_band(right, long_bounds, 22));
    }

    let short_bounds = &SHORT_BAND_BOUNDS[params.sfreq];
    let first_short = if info.mixed_block { 3 } else { 0 };
    let windows: [usize; 3] =
        std::array::from_fn(|window| last_short_band(right, short_bounds, window, first_short));
    // 混合块只有短带部分全为零时才处理长带部分
    let mixed_long = (info.mixed_block && windows.iter().all(|&start| start <= 3)).then(|| {
        last_long_band(right, long_bounds, mixed_long_count(params.lsf))
    });
    IntensityBands::Short {
        windows,
        mixed_long,
    }
}

/// 强度立体声重建
pub fn intensity_stereo(
    left: &mut [f32; GRANULE_LINES],
    right: &mut [f32; GRANULE_LINES],
    params: &IntensityParams<'_>,
    bands: &IntensityBands,
) {
    let tables = ratio_tables();
    let ms = usize::from(params.ms_stereo);
    let ratio = |is_pos: u8| -> Option<(f32, f32)> {
        if is_pos == IS_POS_PASSTHROUGH {
            return None;
        }
        if params.lsf {
            let p = (params.info.scalefac_compress & 1) as usize;
            tables.lsf[ms][p].get(usize::from(is_pos)).copied()
        } else {
            tables.mpeg1[ms].get(usize::from(is_pos)).copied()
        }
    };
    let info = params.info;
    let long_bounds = &LONG_BAND_BOUNDS[params.sfreq];
    let short_bounds = &SHORT_BAND_BOUNDS[params.sfreq];

    match *bands {
        IntensityBands::Long(start) => {
            for sfb in start..22 {
                // 第 21 带没有比例因子, 沿用第 20 带
                let is_pos = params.scf[sfb.min(20)];
                split_band(left, right, long_bounds[sfb]..long_bounds[sfb + 1], ratio(is_pos));
            }
        }
        IntensityBands::Short {
            windows,
            mixed_long,
        } => {
            for (window, &start) in windows.iter().enumerate() {
                for sfb in start..13 {
                    // 第 12 带沿用第 11 带
                    let index = short_scalefac_index(info, params.lsf, sfb.min(11), window);
                    let band_start = short_bounds[sfb];
                    let width = short_bounds[sfb + 1] - band_start;
                    split_band(
                        left,
                        right,
                        (0..width).map(|k| 3 * (band_start + k) + window),
                        ratio(params.scf[index]),
                    );
                }
            }
            if let Some(start) = mixed_long {
                for sfb in start..mixed_long_count(params.lsf) {
                    split_band(
                        left,
                        right,
                        long_bounds[sfb]..long_bounds[sfb + 1],
                        ratio(params.scf[sfb]),
                    );
                }
            }
        }
    }
}

fn split_band(
    left: &mut [f32; GRANULE_LINES],
    right: &mut [f32; GRANULE_LINES],
    lines: impl Iterator<Item = usize>,
    ratio: Option<(f32, f32)>,
) {
    let Some((t1, t2)) = ratio else {
        return;
    };
    for idx in lines {
        let v = left[idx];
        left[idx] = v * t1;
        right[idx] = v * t2;
    }
}

/// 右声道前 `bands` 个长带中最后一个非零带之后的带号
fn last_long_band(right: &[f32; GRANULE_LINES], bounds: &[usize; 23], bands: usize) -> usize {
    let end = bounds[bands];
    match right[..end].iter().rposition(|&v| v != 0.0) {
        Some(line) => bounds.iter().rposition(|&b| b <= line).map_or(0, |sfb| sfb + 1),
        None => 0,
    }
}

/// 右声道某个短窗口中最后一个非零带之后的带号, 至少为 `first`
fn last_short_band(
    right: &[f32; GRANULE_LINES],
    bounds: &[usize; 14],
    window: usize,
    first: usize,
) -> usize {
    (first..13)
        .rev()
        .find(|&sfb| (bounds[sfb]..bounds[sfb + 1]).any(|k| right[3 * k + window] != 0.0))
        .map_or(first, |sfb| sfb + 1)
}

/// 强制单声道时的声道合并方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Downmix {
    /// 左右相加 (1/2 已计入反量化增益)
    Mix,
    /// 取右声道
    Right,
}

/// 把两声道频谱合并到左声道
pub fn downmix(left: &mut [f32; GRANULE_LINES], right: &[f32; GRANULE_LINES], mode: Downmix) {
    match mode {
        Downmix::Mix => {
            for (l, r) in left.iter_mut().zip(right) {
                *l += *r;
            }
        }
        Downmix::Right => left.copy_from_slice(right),
    }
}
