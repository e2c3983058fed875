//! 多相合成滤波器组
//!
//! 每次把 32 个子带样本合成为 32 个 PCM 样本. 矩阵运算用 32 点 DCT-II
//! (Lee 递归分解) 实现, V 向量以 16 个 64 点块的环形缓冲保存.

use std::f64::consts::PI;
use std::sync::OnceLock;

use mpa_core::SampleFormat;

use super::imdct::SUBBANDS;

/// 输出幅度缩放 (16 位 PCM 满幅)
pub const OUTPUT_SCALE: f32 = 32767.0;

/// ISO 11172-3 表 B.3 合成窗 D[0..=256], 以 1/65536 为单位
const SYNTH_WINDOW_HALF: [i32; 257] = [
    0, -1, -1, -1, -1, -1, -1, -2, -2, -2, -2, -3,
    -3, -4, -4, -5, -5, -6, -7, -7, -8, -9, -10, -11,
    -13, -14, -16, -17, -19, -21, -24, -26, -29, -31, -35, -38,
    -41, -45, -49, -53, -58, -63, -68, -73, -79, -85, -91, -97,
    -104, -111, -117, -125, -132, -139, -147, -154, -161, -169, -176, -183,
    -190, -196, -202, -208, 213, 218, 222, 225, 227, 228, 228, 227,
    224, 221, 215, 208, 200, 189, 177, 163, 146, 127, 106, 83,
    57, 29, -2, -36, -72, -111, -153, -197, -244, -294, -347, -401,
    -459, -519, -581, -645, -711, -779, -848, -919, -991, -1064, -1137, -1210,
    -1283, -1356, -1428, -1498, -1567, -1634, -1698, -1759, -1817, -1870, -1919, -1962,
    -2001, -2032, -2057, -2075, -2085, -2087, -2080, -2063, 2037, 2000, 1952, 1893,
    1822, 1739, 1644, 1535, 1414, 1280, 1131, 970, 794, 605, 402, 185,
    -45, -288, -545, -814, -1095, -1388, -1692, -2006, -2330, -2663, -3004, -3351,
    -3705, -4063, -4425, -4788, -5153, -5517, -5879, -6237, -6589, -6935, -7271, -7597,
    -7910, -8209, -8491, -8755, -8998, -9219, -9416, -9585, -9727, -9838, -9916, -9959,
    -9966, -9935, -9863, -9750, -9592, -9389, -9139, -8840, -8492, -8092, -7640, -7134,
    6574, 5959, 5288, 4561, 3776, 2935, 2037, 1082, 70, -998, -2122, -3300,
    -4533, -5818, -7154, -8540, -9975, -11455, -12980, -14548, -16155, -17799, -19478, -21189,
    -22929, -24694, -26482, -28289, -30112, -31947, -33791, -35640, -37489, -39336, -41176, -43006,
    -44821, -46617, -48390, -50137, -51853, -53534, -55178, -56778, -58333, -59838, -61289, -62684,
    -64019, -65290, -66494, -67629, -68692, -69679, -70590, -71420, -72169, -72835, -73415, -73908,
    -74313, -74630, -74856, -74992, 75038,];

struct SynthTables {
    /// 合成窗 D[i] * OUTPUT_SCALE
    window: [f32; 512],
    /// Lee 分解各级的 1 / (2 cos((2i + 1) pi / 2n)), 依次为 n = 32, 16, 8, 4, 2
    secants: [Vec<f32>; 5],
}

static TABLES: OnceLock<SynthTables> = OnceLock::new();

fn tables() -> &'static SynthTables {
    TABLES.get_or_init(|| {
        let mut window = [0f32; 512];
        let scale = f64::from(OUTPUT_SCALE) / 65536.0;
        for (i, &raw) in SYNTH_WINDOW_HALF.iter().enumerate() {
            let value = f64::from(raw) * scale;
            window[i] = value as f32;
            if i > 0 && i < 256 {
                window[512 - i] = if i % 64 == 0 { value } else { -value } as f32;
            }
        }
        let secants = [32usize, 16, 8, 4, 2].map(|n| {
            (0..n / 2)
                .map(|i| (0.5 / (PI * (2 * i + 1) as f64 / (2 * n) as f64).cos()) as f32)
                .collect()
        });
        SynthTables { window, secants }
    })
}

/// 原地 DCT-II: X[k] = sum x[n] cos(pi (2n + 1) k / 2N). `scratch` 与 `x` 等长.
fn dct_ii(x: &mut [f32], scratch: &mut [f32]) {
    let n = x.len();
    if n == 1 {
        return;
    }
    let half = n / 2;
    let secant = &tables().secants[(32 / n).trailing_zeros() as usize];
    for i in 0..half {
        let a = x[i];
        let b = x[n - 1 - i];
        scratch[i] = a + b;
        scratch[half + i] = (a - b) * secant[i];
    }
    let (even, odd) = scratch.split_at_mut(half);
    {
        let (tmp_a, tmp_b) = x.split_at_mut(half);
        dct_ii(even, tmp_a);
        dct_ii(odd, tmp_b);
    }
    for k in 0..half {
        x[2 * k] = even[k];
        x[2 * k + 1] = odd[k] + if k + 1 < half { odd[k + 1] } else { 0.0 };
    }
}

/// 合成输出的样本类型
pub trait PcmSample: Copy + Default {
    /// 交织输出时对应的采样格式
    const FORMAT: SampleFormat;

    /// 由合成结果 (16 位满幅刻度) 转换, 返回 (样本, 是否削波)
    fn from_synth(value: f32) -> (Self, bool);
}

impl PcmSample for i16 {
    const FORMAT: SampleFormat = SampleFormat::S16;

    #[inline]
    fn from_synth(value: f32) -> (Self, bool) {
        // f32::round 对 .5 远离零取整
        let rounded = value.round();
        if rounded > f32::from(i16::MAX) {
            (i16::MAX, true)
        } else if rounded < f32::from(i16::MIN) {
            (i16::MIN, true)
        } else {
            (rounded as i16, false)
        }
    }
}

impl PcmSample for f32 {
    const FORMAT: SampleFormat = SampleFormat::F32;

    #[inline]
    fn from_synth(value: f32) -> (Self, bool) {
        (value, false)
    }
}

/// 单声道的多相合成状态
#[derive(Debug, Clone)]
pub struct SynthesisFilter {
    v: [f32; 1024],
    /// 最新 64 点块在环形缓冲中的位置
    block: usize,
}

impl Default for SynthesisFilter {
    fn default() -> Self {
        Self {
            v: [0.0; 1024],
            block: 0,
        }
    }
}

impl SynthesisFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.v = [0.0; 1024];
        self.block = 0;
    }

    /// 合成 32 个样本, 写入 `out[offset + stride * j]`, 返回削波样本数
    pub fn synth<T: PcmSample>(
        &mut self,
        subbands: &[f32; SUBBANDS],
        out: &mut [T],
        offset: usize,
        stride: usize,
    ) -> usize {
        let mut x = *subbands;
        let mut scratch = [0f32; SUBBANDS];
        dct_ii(&mut x, &mut scratch);

        self.block = (self.block + 15) & 15;
        let base = self.block * 64;
        let v = &mut self.v[base..base + 64];
        for (i, slot) in v.iter_mut().enumerate() {
            *slot = match i {
                0..16 => x[16 + i],
                16 => 0.0,
                17..48 => -x[48 - i],
                _ => -x[i - 48],
            };
        }

        let window = &tables().window;
        let mut clipped = 0;
        for j in 0..SUBBANDS {
            let mut sum = 0f32;
            for i in 0..8 {
                let even = ((self.block + 2 * i) & 15) * 64;
                let odd = ((self.block + 2 * i + 1) & 15) * 64;
                sum += window[64 * i + j] * self.v[even + j];
                sum += window[64 * i + 32 + j] * self.v[odd + 32 + j];
            }
            let (sample, clip) = T::from_synth(sum);
            out[offset + stride * j] = sample;
            clipped += usize::from(clip);
        }
        clipped
    }
}

/// 一帧最多的子带时隙数 (Layer II: 36, Layer III: 2 x 18)
pub const MAX_SLOTS: usize = 36;

/// 一帧待合成的子带样本, [声道][时隙][子带]
#[derive(Debug, Clone)]
pub struct SubbandSamples {
    pub channels: usize,
    pub slots: usize,
    pub data: [[[f32; SUBBANDS]; MAX_SLOTS]; 2],
}

impl Default for SubbandSamples {
    fn default() -> Self {
        Self {
            channels: 1,
            slots: 0,
            data: [[[0.0; SUBBANDS]; MAX_SLOTS]; 2],
        }
    }
}

impl SubbandSamples {
    /// 每声道输出样本数
    pub fn samples_per_channel(&self) -> usize {
        self.slots * SUBBANDS
    }

    /// 合成全部时隙, 多声道交织写入 `out`, 返回削波样本数
    pub fn render<T: PcmSample>(&self, filters: &mut [SynthesisFilter; 2], out: &mut [T]) -> usize {
        let stride = self.channels;
        let mut clipped = 0;
        for slot in 0..self.slots {
            for (ch, filter) in filters.iter_mut().enumerate().take(self.channels) {
                clipped += filter.synth(&self.data[ch][slot], out, slot * SUBBANDS * stride + ch, stride);
            }
        }
        clipped
    }
}
