//! Layer III 比例因子读取
//!
//! 比例因子按如下布局存放:
//! - 长块: 22 个, 最后一个 (第 21 带) 恒为 0
//! - 纯短块: 13 个短带 x 3 个窗口, 下标为 `sfb * 3 + window`
//! - 混合块: 先是长带部分 (MPEG-1 为 8 个, MPEG-2 为 6 个), 之后是短带 3..13,
//!   下标为 `long_count + (sfb - 3) * 3 + window`

use std::sync::OnceLock;

use super::bitreader::BitReader;
use super::side_info::GranuleInfo;
use super::tables::{LSF_PARTITIONS, SLEN};

/// 单声道比例因子存储
pub type Scalefactors = [u8; SCALEFAC_LEN];

pub const SCALEFAC_LEN: usize = 39;

/// 混合块中长带部分的比例因子个数
pub const fn mixed_long_count(lsf: bool) -> usize {
    if lsf { 6 } else { 8 }
}

/// 短带比例因子下标
pub fn short_scalefac_index(info: &GranuleInfo, lsf: bool, sfb: usize, window: usize) -> usize {
    if info.mixed_block {
        mixed_long_count(lsf) + (sfb - 3) * 3 + window
    } else {
        sfb * 3 + window
    }
}

/// 读取 MPEG-1 比例因子, 返回消耗的位数
///
/// `scfsi` 为 None 表示第一个 granule, 此时忽略复用标志.
pub fn read_mpeg1(
    reader: &mut BitReader,
    info: &GranuleInfo,
    scfsi: Option<u8>,
    scf: &mut Scalefactors,
) -> u32 {
    let idx = info.scalefac_compress as usize & 0xF;
    let num0 = u32::from(SLEN[0][idx]);
    let num1 = u32::from(SLEN[1][idx]);
    let mut pos = 0;
    let mut read = |reader: &mut BitReader<'_>, count: usize, bits: u32, pos: &mut usize| {
        for _ in 0..count {
            scf[*pos] = reader.get_bits_fast(bits) as u8;
            *pos += 1;
        }
    };

    if info.is_short() {
        let mut numbits = (num0 + num1) * 18;
        let mut first = 18;
        if info.mixed_block {
            read(reader, 8, num0, &mut pos);
            first = 9;
            numbits -= num0;
        }
        read(reader, first, num0, &mut pos);
        read(reader, 18, num1, &mut pos);
        scf[pos..pos + 3].fill(0);
        return numbits;
    }

    let numbits = match scfsi {
        None => {
            read(reader, 11, num0, &mut pos);
            read(reader, 10, num1, &mut pos);
            (num0 + num1) * 10 + num0
        }
        Some(scfsi) => {
            let mut numbits = 0;
            // 四个分组: 0..6, 6..11, 11..16, 16..21
            for (group, (count, bits)) in [(6, num0), (5, num0), (5, num1), (5, num1)]
                .into_iter()
                .enumerate()
            {
                if scfsi & (0x8 >> group) == 0 {
                    read(reader, count, bits, &mut pos);
                    numbits += bits * count as u32;
                } else {
                    pos += count;
                }
            }
            numbits
        }
    };
    scf[21] = 0;
    numbits
}

/// slen 编码: 低 12 位为 4 组位宽 (每组 3 位), 12..15 位为分区表行, 15 位为 preflag
struct SlenTables {
    normal: [u32; 512],
    intensity: [u32; 256],
}

static SLEN_TABLES: OnceLock<SlenTables> = OnceLock::new();

fn slen_tables() -> &'static SlenTables {
    SLEN_TABLES.get_or_init(|| {
        let mut normal = [0usize; 512];
        let mut intensity = [0usize; 256];
        for i in 0..5 {
            for j in 0..6 {
                for k in 0..6 {
                    intensity[k + j * 6 + i * 36] = i | (j << 3) | (k << 6) | (3 << 12);
                }
            }
        }
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    intensity[k + j * 4 + i * 16 + 180] = i | (j << 3) | (k << 6) | (4 << 12);
                }
            }
        }
        for i in 0..4 {
            for j in 0..3 {
                let n = j + i * 3;
                intensity[n + 244] = i | (j << 3) | (5 << 12);
                normal[n + 500] = i | (j << 3) | (2 << 12) | (1 << 15);
            }
        }
        for i in 0..5 {
            for j in 0..5 {
                for k in 0..4 {
                    for l in 0..4 {
                        normal[l + k * 4 + j * 16 + i * 80] = i | (j << 3) | (k << 6) | (l << 9);
                    }
                }
            }
        }
        for i in 0..5 {
            for j in 0..5 {
                for k in 0..4 {
                    normal[k + j * 4 + i * 20 + 400] = i | (j << 3) | (k << 6) | (1 << 12);
                }
            }
        }
        SlenTables {
            normal: normal.map(|v| v as u32),
            intensity: intensity.map(|v| v as u32),
        }
    })
}

/// 读取 MPEG-2/2.5 比例因子, 返回消耗的位数
///
/// `intensity_right` 表示强度立体声帧的右声道, 此时使用另一套位宽编码.
/// 同时根据编码设置 `info.preflag`.
pub fn read_lsf(
    reader: &mut BitReader,
    info: &mut GranuleInfo,
    intensity_right: bool,
    scf: &mut Scalefactors,
) -> u32 {
    let tables = slen_tables();
    let mut slen = if intensity_right {
        tables.intensity[(info.scalefac_compress as usize >> 1) & 0xFF]
    } else {
        tables.normal[info.scalefac_compress as usize & 0x1FF]
    };
    info.preflag = (slen >> 15) & 1 == 1;

    let block_row = match (info.is_short(), info.mixed_block) {
        (false, _) => 0,
        (true, false) => 1,
        (true, true) => 2,
    };
    let partition = &LSF_PARTITIONS[block_row][((slen >> 12) & 0x7) as usize];

    let mut pos = 0;
    let mut numbits = 0;
    for &count in partition {
        let bits = slen & 0x7;
        slen >>= 3;
        for _ in 0..count {
            scf[pos] = if bits > 0 {
                reader.get_bits_fast(bits) as u8
            } else {
                0
            };
            pos += 1;
        }
        numbits += u32::from(count) * bits;
    }
    let trailing = (block_row << 1) + 1;
    let end = (pos + trailing).min(SCALEFAC_LEN);
    scf[pos..end].fill(0);
    numbits
}
