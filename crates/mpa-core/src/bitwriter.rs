//! 比特流写入器.
//!
//! 按大端位序 (MSB first) 向字节缓冲区写入位字段, 与解码器的位游标对应.
//! 主要用于构造合成的 MPEG 音频帧 (帧头、边信息、主数据).

/// 比特流写入器
///
/// # 示例
/// ```
/// use mpa_core::bitwriter::BitWriter;
///
/// let mut bw = BitWriter::new();
/// bw.write_bits(0x7FF, 11);
/// bw.write_bits(0b11, 2);
/// bw.write_bits(0b01, 2);
/// bw.write_bit(1);
/// assert_eq!(bw.finish(), vec![0xFF, 0xFB]);
/// ```
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// 已完成的字节
    data: Vec<u8>,
    /// 正在填充的字节
    current_byte: u8,
    /// 当前字节中已填充的位数 (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// 创建新的比特流写入器
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            current_byte: 0,
            bit_count: 0,
        }
    }

    /// 以指定容量创建比特流写入器
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            current_byte: 0,
            bit_count: 0,
        }
    }

    /// 获取已写入的总位数
    pub fn bits_written(&self) -> usize {
        self.data.len() * 8 + self.bit_count as usize
    }

    /// 写入 1 个位
    pub fn write_bit(&mut self, bit: u32) {
        self.current_byte = (self.current_byte << 1) | (bit & 1) as u8;
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.data.push(self.current_byte);
            self.current_byte = 0;
            self.bit_count = 0;
        }
    }

    /// 写入 N 个位 (最多 32 位)
    ///
    /// 值的低 N 位被写入, 高位在前.
    pub fn write_bits(&mut self, value: u32, n: u32) {
        debug_assert!(n <= 32, "write_bits: n={} 超过 32 位", n);
        for shift in (0..n).rev() {
            self.write_bit(value >> shift);
        }
    }

    /// 写入完整字节
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.bit_count == 0 {
            self.data.extend_from_slice(bytes);
        } else {
            for &b in bytes {
                self.write_bits(u32::from(b), 8);
            }
        }
    }

    /// 对齐到字节边界 (用 0 填充)
    pub fn align_to_byte(&mut self) {
        if self.bit_count > 0 {
            let pad = 8 - self.bit_count;
            self.current_byte <<= pad;
            self.data.push(self.current_byte);
            self.current_byte = 0;
            self.bit_count = 0;
        }
    }

    /// 对齐后用 0 字节填充到 `len` 字节
    ///
    /// 已写入内容超过 `len` 时不截断.
    pub fn pad_to_len(&mut self, len: usize) {
        self.align_to_byte();
        if self.data.len() < len {
            self.data.resize(len, 0);
        }
    }

    /// 完成写入, 返回字节数据
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.data
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
