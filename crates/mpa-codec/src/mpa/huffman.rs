//! Layer III Huffman 频谱解码
//!
//! 码本在首次使用时构建成二叉树, 按位遍历. 大值区按 region 切换码本,
//! 15 触发 linbits 转义; 之后的 count1 区用四元组码本, 直到 part2_3_length
//! 的位预算耗尽.

use std::sync::OnceLock;

use log::warn;

use super::bitreader::BitReader;
use super::side_info::GranuleInfo;
use super::tables::{BIG_VALUE_CODEBOOKS, BIG_VALUE_TABLES, HuffmanCodebook, QUAD_CODEBOOKS};

/// 每个 granule 的谱线数
pub const GRANULE_LINES: usize = 576;

const LEAF: u16 = 0x8000;

/// 静态码本展开成的二叉树
#[derive(Debug, Clone)]
struct HuffmanTree {
    /// 每个节点两个孩子: 0 表示空, 最高位置位表示叶子 (低位为符号)
    nodes: Vec<[u16; 2]>,
}

impl HuffmanTree {
    fn build(book: &HuffmanCodebook) -> Self {
        let mut nodes = vec![[0u16; 2]];
        for (symbol, (&code, &len)) in book.codes.iter().zip(book.lens).enumerate() {
            let mut node = 0usize;
            for shift in (0..u32::from(len)).rev() {
                let bit = ((code >> shift) & 1) as usize;
                if shift == 0 {
                    nodes[node][bit] = LEAF | symbol as u16;
                } else {
                    if nodes[node][bit] == 0 {
                        nodes.push([0, 0]);
                        nodes[node][bit] = (nodes.len() - 1) as u16;
                    }
                    node = nodes[node][bit] as usize;
                }
            }
        }
        Self { nodes }
    }

    /// 读取一个码字, 返回符号
    fn decode(&self, reader: &mut BitReader) -> Option<usize> {
        let mut node = 0usize;
        loop {
            let child = self.nodes[node][reader.get1bit() as usize];
            if child & LEAF != 0 {
                return Some(usize::from(child & !LEAF));
            }
            if child == 0 {
                return None;
            }
            node = usize::from(child);
        }
    }
}

struct Trees {
    big_values: Vec<HuffmanTree>,
    quads: Vec<HuffmanTree>,
}

static TREES: OnceLock<Trees> = OnceLock::new();

fn trees() -> &'static Trees {
    TREES.get_or_init(|| Trees {
        big_values: BIG_VALUE_CODEBOOKS.iter().map(HuffmanTree::build).collect(),
        quads: QUAD_CODEBOOKS.iter().map(HuffmanTree::build).collect(),
    })
}

/// 一个 granule 的频谱解码结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpectrumOutcome {
    /// 写入的谱线数 (之后全为 0)
    pub lines: usize,
    /// 超出位预算的位数, 非零表示码流损坏
    pub overrun_bits: usize,
}

/// 解码一个 granule 的量化频谱到 `out`
///
/// `end_bit` 为该 granule 在工作缓冲区中的结束位置. 越过预算时丢弃当前值并把
/// 剩余谱线置零. `end_bit` 超出缓冲区时只解码已缓冲的部分, 缺失的位计入
/// `overrun_bits`. 返回前游标定位到 `end_bit` 与缓冲区末尾中较小的一个.
pub fn decode_spectrum(
    reader: &mut BitReader,
    info: &GranuleInfo,
    end_bit: usize,
    out: &mut [i32; GRANULE_LINES],
) -> SpectrumOutcome {
    let available = reader.bit_len();
    let mut outcome = decode_budget(reader, info, end_bit.min(available), out);
    if end_bit > available {
        let missing = end_bit - available;
        warn!(
            "part2_3_length 超出已缓冲的主数据 {missing} 位, 第 {} 条谱线之后置零",
            outcome.lines
        );
        outcome.overrun_bits += missing;
    }
    outcome
}

fn decode_budget(
    reader: &mut BitReader,
    info: &GranuleInfo,
    end_bit: usize,
    out: &mut [i32; GRANULE_LINES],
) -> SpectrumOutcome {
    out.fill(0);
    let trees = trees();
    let mut outcome = SpectrumOutcome::default();

    if reader.bit_offset() > end_bit {
        outcome.overrun_bits = reader.bit_offset() - end_bit;
        warn!("比例因子已超出 part2_3_length {} 位", outcome.overrun_bits);
        reader.seek_to_bit(end_bit);
        return outcome;
    }

    let big_end = (info.big_values as usize * 2).min(GRANULE_LINES);
    let region1 = info.region1_start.min(big_end);
    let region2 = info.region2_start.clamp(region1, big_end);
    let regions = [(0, region1), (region1, region2), (region2, big_end)];

    let mut i = 0;
    for (region, &(_, end)) in regions.iter().enumerate() {
        let table = BIG_VALUE_TABLES[usize::from(info.table_select[region] & 0x1F)];
        let tree = match table.codebook {
            Some(book) => Some(&trees.big_values[book]),
            None => {
                if info.table_select[region] != 0 && i < end {
                    warn!("使用了保留的 Huffman 表 {}", info.table_select[region]);
                }
                None
            }
        };
        let dim = table.codebook.map_or(1, |book| BIG_VALUE_CODEBOOKS[book].dim);
        while i < end {
            let Some(tree) = tree else {
                // 表 0: 本区域全零, 不占位
                i = end;
                break;
            };
            let symbol = tree.decode(reader).unwrap_or(0);
            let mut x = (symbol / dim) as i32;
            let mut y = (symbol % dim) as i32;
            if table.linbits > 0 && x == 15 {
                x += reader.get_bits(table.linbits) as i32;
            }
            if x != 0 && reader.get1bit() == 1 {
                x = -x;
            }
            if table.linbits > 0 && y == 15 {
                y += reader.get_bits(table.linbits) as i32;
            }
            if y != 0 && reader.get1bit() == 1 {
                y = -y;
            }
            if reader.bit_offset() > end_bit {
                outcome.overrun_bits = reader.bit_offset() - end_bit;
                warn!(
                    "大值区解码越过位预算 {} 位, 第 {} 条谱线之后置零",
                    outcome.overrun_bits, i
                );
                outcome.lines = i;
                reader.seek_to_bit(end_bit);
                return outcome;
            }
            out[i] = x;
            out[i + 1] = y;
            i += 2;
        }
    }

    let quad = &trees.quads[usize::from(info.count1_table)];
    while i < GRANULE_LINES && reader.bit_offset() < end_bit {
        let symbol = quad.decode(reader).unwrap_or(0);
        let mut values = [0i32; 4];
        for (k, v) in values.iter_mut().enumerate() {
            if symbol & (0x8 >> k) != 0 {
                *v = if reader.get1bit() == 1 { -1 } else { 1 };
            }
        }
        if reader.bit_offset() > end_bit {
            // 越界的四元组整体丢弃
            outcome.overrun_bits = reader.bit_offset() - end_bit;
            break;
        }
        for (k, &v) in values.iter().enumerate() {
            if i + k < GRANULE_LINES {
                out[i + k] = v;
            }
        }
        i = (i + 4).min(GRANULE_LINES);
    }

    outcome.lines = i;
    reader.seek_to_bit(end_bit);
    outcome
}
