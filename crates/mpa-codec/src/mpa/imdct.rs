//! Layer III 混合滤波器组: IMDCT + 加窗 + 重叠相加
//!
//! 长块每个子带做 36 点 IMDCT, 短块做三次 12 点 IMDCT. 两者都经由 N/2 点
//! DCT-IV 展开得到, DCT-IV 再折叠成 N/4 点复数 DFT (9 点按 3x3 分解, 3 点
//! 直接蝶形). 输出按 [时隙][子带] 排列, 直接送入多相合成.

use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};
use std::sync::OnceLock;

use super::huffman::GRANULE_LINES;
use super::side_info::{BlockType, GranuleInfo};

pub const SUBBANDS: usize = 32;
pub const SUBBAND_SAMPLES: usize = 18;

/// 一个 granule 的混合滤波器输出, [时隙][子带]
pub type HybridOutput = [[f32; SUBBANDS]; SUBBAND_SAMPLES];

#[derive(Debug, Clone, Copy, Default)]
struct Complex {
    re: f32,
    im: f32,
}

impl Complex {
    const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    /// e^(i * theta)
    fn from_angle(theta: f64) -> Self {
        Self::new(theta.cos() as f32, theta.sin() as f32)
    }

    fn scale(self, k: f32) -> Self {
        Self::new(self.re * k, self.im * k)
    }

    /// 乘以 -i
    fn mul_neg_i(self) -> Self {
        Self::new(self.im, -self.re)
    }
}

impl Add for Complex {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

/// 2M 点 DCT-IV 折叠成 M 点复数 DFT 时的旋转因子
struct Dct4Twiddles<const M: usize> {
    /// e^(-i * pi * (4n + 1) / 8M)
    pre: [Complex; M],
    /// e^(-i * pi * k / 2M)
    post: [Complex; M],
}

impl<const M: usize> Dct4Twiddles<M> {
    fn new() -> Self {
        let n = (2 * M) as f64;
        Self {
            pre: std::array::from_fn(|i| {
                Complex::from_angle(-PI * (4 * i + 1) as f64 / (4.0 * n))
            }),
            post: std::array::from_fn(|k| Complex::from_angle(-PI * k as f64 / n)),
        }
    }
}

struct ImdctTables {
    /// 36 点窗口, 按块类型 (0 普通, 1 起始, 2 未用, 3 结束) 索引
    windows: [[f32; 36]; 4],
    short_window: [f32; 12],
    dct18: Dct4Twiddles<9>,
    dct6: Dct4Twiddles<3>,
    /// W9^j, j 最大为 2 * 2
    w9: [Complex; 5],
}

static TABLES: OnceLock<ImdctTables> = OnceLock::new();

fn tables() -> &'static ImdctTables {
    TABLES.get_or_init(|| {
        let long = |i: usize| (PI / 36.0 * (i as f64 + 0.5)).sin() as f32;
        let short = |i: usize| (PI / 12.0 * (i as f64 + 0.5)).sin() as f32;

        let mut windows = [[0f32; 36]; 4];
        windows[0] = std::array::from_fn(long);
        windows[1] = std::array::from_fn(|i| match i {
            0..18 => long(i),
            18..24 => 1.0,
            24..30 => short(i - 18),
            _ => 0.0,
        });
        windows[3] = std::array::from_fn(|i| match i {
            0..6 => 0.0,
            6..12 => short(i - 6),
            12..18 => 1.0,
            _ => long(i),
        });

        ImdctTables {
            windows,
            short_window: std::array::from_fn(short),
            dct18: Dct4Twiddles::new(),
            dct6: Dct4Twiddles::new(),
            w9: std::array::from_fn(|j| Complex::from_angle(-2.0 * PI * j as f64 / 9.0)),
        }
    })
}

/// sqrt(3) / 2
const SIN_PI_3: f32 = 0.866_025_4;

/// 3 点 DFT
fn dft3(a: Complex, b: Complex, c: Complex) -> [Complex; 3] {
    let sum = b + c;
    let diff = (b - c).mul_neg_i().scale(SIN_PI_3);
    let mid = a - sum.scale(0.5);
    [a + sum, mid + diff, mid - diff]
}

/// 9 点 DFT: n = 3 * n1 + n2, k = k1 + 3 * k2
fn dft9(x: &[Complex; 9], w9: &[Complex; 5]) -> [Complex; 9] {
    let mut cols = [[Complex::default(); 3]; 3];
    for (n2, col) in cols.iter_mut().enumerate() {
        let inner = dft3(x[n2], x[n2 + 3], x[n2 + 6]);
        for (k1, v) in col.iter_mut().enumerate() {
            *v = inner[k1] * w9[n2 * k1];
        }
    }
    let mut out = [Complex::default(); 9];
    for k1 in 0..3 {
        let row = dft3(cols[0][k1], cols[1][k1], cols[2][k1]);
        for (k2, &v) in row.iter().enumerate() {
            out[k1 + 3 * k2] = v;
        }
    }
    out
}

/// 2M 点 DCT-IV: 偶数下标与倒序奇数下标组成复数序列, 旋转后做 M 点 DFT
fn dct4<const M: usize>(
    input: &[f32],
    twiddles: &Dct4Twiddles<M>,
    dft: impl Fn(&[Complex; M]) -> [Complex; M],
    out: &mut [f32],
) {
    let n = 2 * M;
    let folded: [Complex; M] = std::array::from_fn(|i| {
        Complex::new(input[2 * i], input[n - 1 - 2 * i]) * twiddles.pre[i]
    });
    for (k, (&v, &w)) in dft(&folded).iter().zip(&twiddles.post).enumerate() {
        let rotated = v * w;
        out[2 * k] = rotated.re;
        out[n - 1 - 2 * k] = -rotated.im;
    }
}

/// N 点 DCT-IV 展开为 2N 点 IMDCT 输出
fn unfold<const N: usize>(z: &[f32; N], y: &mut [f32]) {
    let half = N / 2;
    for (i, out) in y.iter_mut().enumerate().take(2 * N) {
        *out = if i < half {
            z[i + half]
        } else if i < 3 * half {
            -z[3 * half - 1 - i]
        } else {
            -z[i - 3 * half]
        };
    }
}

/// 36 点 IMDCT (输入 18 个系数)
pub fn imdct36(input: &[f32], out: &mut [f32; 36]) {
    let tables = tables();
    let mut z = [0f32; 18];
    dct4(input, &tables.dct18, |x| dft9(x, &tables.w9), &mut z);
    unfold(&z, out);
}

/// 12 点 IMDCT (输入 6 个系数)
pub fn imdct12(input: &[f32; 6], out: &mut [f32; 12]) {
    let mut z = [0f32; 6];
    dct4(input, &tables().dct6, |x| dft3(x[0], x[1], x[2]), &mut z);
    unfold(&z, out);
}

/// 单声道的混合滤波器状态 (重叠缓冲)
#[derive(Debug, Clone)]
pub struct HybridFilter {
    overlap: [[f32; SUBBAND_SAMPLES]; SUBBANDS],
}

impl Default for HybridFilter {
    fn default() -> Self {
        Self {
            overlap: [[0.0; SUBBAND_SAMPLES]; SUBBANDS],
        }
    }
}

impl HybridFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.overlap = [[0.0; SUBBAND_SAMPLES]; SUBBANDS];
    }

    /// 对一个 granule 做逆变换, 结果写入 `out`
    pub fn transform(
        &mut self,
        info: &GranuleInfo,
        xr: &[f32; GRANULE_LINES],
        out: &mut HybridOutput,
    ) {
        let tables = tables();
        for sb in 0..SUBBANDS {
            let input = &xr[sb * 18..sb * 18 + 18];
            let mut buf = [0f32; 36];

            if input.iter().any(|&v| v != 0.0) {
                let short = info.is_short() && (!info.mixed_block || sb >= 2);
                if short {
                    for window in 0..3 {
                        let coeffs: [f32; 6] = std::array::from_fn(|k| input[3 * k + window]);
                        let mut y = [0f32; 12];
                        imdct12(&coeffs, &mut y);
                        let base = 6 + 6 * window;
                        for (i, &v) in y.iter().enumerate() {
                            buf[base + i] += v * tables.short_window[i];
                        }
                    }
                } else {
                    let window = match info.block_type {
                        BlockType::Start => &tables.windows[1],
                        BlockType::Stop => &tables.windows[3],
                        _ => &tables.windows[0],
                    };
                    imdct36(input, &mut buf);
                    for (v, w) in buf.iter_mut().zip(window) {
                        *v *= w;
                    }
                }
            }

            let overlap = &mut self.overlap[sb];
            for t in 0..SUBBAND_SAMPLES {
                let mut sample = buf[t] + overlap[t];
                // 频率反转: 奇数子带的奇数时隙取反
                if sb & 1 == 1 && t & 1 == 1 {
                    sample = -sample;
                }
                out[t][sb] = sample;
                overlap[t] = buf[t + 18];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_imdct(input: &[f32], n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| {
                input
                    .iter()
                    .enumerate()
                    .map(|(k, &x)| {
                        let arg = PI / (2.0 * n as f64)
                            * (2.0 * i as f64 + 1.0 + n as f64 / 2.0)
                            * (2.0 * k as f64 + 1.0);
                        x as f64 * arg.cos()
                    })
                    .sum::<f64>() as f32
            })
            .collect()
    }

    #[test]
    fn test_imdct36_matches_definition() {
        let input: [f32; 18] = std::array::from_fn(|k| ((k * 5 % 7) as f32 - 3.0) * 0.25);
        let mut out = [0f32; 36];
        imdct36(&input, &mut out);
        let expected = reference_imdct(&input, 36);
        for (a, b) in out.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-4, "{a} != {b}");
        }
    }

    #[test]
    fn test_imdct12_matches_definition() {
        let input = [0.5, -1.0, 0.25, 0.0, 2.0, -0.75];
        let mut out = [0f32; 12];
        imdct12(&input, &mut out);
        let expected = reference_imdct(&input, 12);
        for (a, b) in out.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_dft9_matches_direct_sum() {
        let x: [Complex; 9] =
            std::array::from_fn(|n| Complex::new(n as f32 * 0.5 - 1.0, (n * n % 5) as f32 * 0.25));
        let fast = dft9(&x, &tables().w9);
        for (k, v) in fast.iter().enumerate() {
            let direct = x.iter().enumerate().fold(Complex::default(), |acc, (n, &xn)| {
                acc + xn * Complex::from_angle(-2.0 * PI * (n * k) as f64 / 9.0)
            });
            assert!((v.re - direct.re).abs() < 1e-4, "k={k}");
            assert!((v.im - direct.im).abs() < 1e-4, "k={k}");
        }
    }

    #[test]
    fn test_dct4_matches_definition() {
        let input: [f32; 18] = std::array::from_fn(|k| ((k * 7 % 11) as f32 - 5.0) * 0.2);
        let mut fast = [0f32; 18];
        let tables = tables();
        dct4(&input, &tables.dct18, |x| dft9(x, &tables.w9), &mut fast);
        for (m, &v) in fast.iter().enumerate() {
            let direct: f64 = input
                .iter()
                .enumerate()
                .map(|(k, &x)| {
                    x as f64 * (PI / 18.0 * (m as f64 + 0.5) * (k as f64 + 0.5)).cos()
                })
                .sum();
            assert!((v as f64 - direct).abs() < 1e-4, "m={m}: {v} != {direct}");
        }
    }

    #[test]
    fn test_windows_are_power_complementary() {
        let t = tables();
        for i in 0..18 {
            let w = t.windows[0];
            assert!((w[i] * w[i] + w[i + 18] * w[i + 18] - 1.0).abs() < 1e-6);
        }
        for i in 0..6 {
            let w = t.short_window;
            assert!((w[i] * w[i] + w[i + 6] * w[i + 6] - 1.0).abs() < 1e-6);
        }
        // 起始窗后半段与结束窗前半段拼接短窗
        assert_eq!(t.windows[1][20], 1.0);
        assert_eq!(t.windows[1][33], 0.0);
        assert_eq!(t.windows[3][2], 0.0);
        assert_eq!(t.windows[3][15], 1.0);
    }

    #[test]
    fn test_silence_stays_silent_and_overlap_carries() {
        let mut filter = HybridFilter::new();
        let info = GranuleInfo::default();
        let mut out = [[1f32; SUBBANDS]; SUBBAND_SAMPLES];
        filter.transform(&info, &[0.0; GRANULE_LINES], &mut out);
        assert!(out.iter().flatten().all(|&v| v == 0.0));

        let mut xr = [0f32; GRANULE_LINES];
        xr[0] = 1.0;
        filter.transform(&info, &xr, &mut out);
        assert!(out.iter().any(|row| row[0] != 0.0));
        // 下一个静音 granule 仍输出上一个的重叠部分
        filter.transform(&info, &[0.0; GRANULE_LINES], &mut out);
        assert!(out.iter().any(|row| row[0] != 0.0));
        filter.transform(&info, &[0.0; GRANULE_LINES], &mut out);
        assert!(out.iter().flatten().all(|&v| v == 0.0));
    }
}
