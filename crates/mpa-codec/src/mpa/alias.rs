//! Layer III 抗混叠蝶形运算
//!
//! 在相邻子带边界两侧各 8 条谱线上做蝶形运算. 纯短块不处理, 混合块只处理
//! 第 0 与第 1 子带之间的边界.

use std::sync::OnceLock;

use super::huffman::GRANULE_LINES;
use super::side_info::GranuleInfo;

/// ISO 11172-3 表 B.9 的 ci
const ALIAS_C: [f64; 8] = [-0.6, -0.535, -0.33, -0.185, -0.095, -0.041, -0.0142, -0.0037];

static BUTTERFLY: OnceLock<[(f32, f32); 8]> = OnceLock::new();

/// (cs, ca) = (1 / sqrt(1 + c^2), c / sqrt(1 + c^2))
fn butterfly() -> &'static [(f32, f32); 8] {
    BUTTERFLY.get_or_init(|| {
        ALIAS_C.map(|c| {
            let sq = (1.0 + c * c).sqrt();
            ((1.0 / sq) as f32, (c / sq) as f32)
        })
    })
}

/// 对一个 granule 的频谱做抗混叠
pub fn antialias(info: &GranuleInfo, xr: &mut [f32; GRANULE_LINES]) {
    let boundaries = if info.is_pure_short() {
        return;
    } else if info.is_short() {
        1
    } else {
        31
    };
    let coeffs = butterfly();
    for sb in 1..=boundaries {
        let edge = sb * 18;
        for (i, &(cs, ca)) in coeffs.iter().enumerate() {
            let lo = xr[edge - 1 - i];
            let hi = xr[edge + i];
            xr[edge - 1 - i] = lo * cs - hi * ca;
            xr[edge + i] = hi * cs + lo * ca;
        }
    }
}
