//! 工作缓冲区位游标
//!
//! 从工作缓冲区按位读取字段 (MSB first). 读取越过缓冲区末尾时返回 0 位并
//! 记录越界标记, 由调用方决定如何容错.

#[derive(Debug, Clone, Copy)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// 当前字节索引
    byte_pos: usize,
    /// 当前字节内的位偏移 (0-7), 0 为最高位 (MSB)
    bit_pos: u8,
    /// 是否发生过越界读取
    overrun: bool,
}

impl<'a> BitReader<'a> {
    /// 创建从缓冲区起点开始的位游标
    pub fn new(data: &'a [u8]) -> Self {
        Self::new_at(data, 0)
    }

    /// 创建从指定字节偏移开始的位游标
    pub fn new_at(data: &'a [u8], byte_pos: usize) -> Self {
        Self {
            data,
            byte_pos,
            bit_pos: 0,
            overrun: false,
        }
    }

    /// 读取 n 位 (n <= 24), 可跨字节边界
    pub fn get_bits(&mut self, n: u32) -> u32 {
        debug_assert!(n <= 24, "get_bits: n={} 超过 24 位", n);
        let mut result = 0u32;
        let mut remaining = n;
        while remaining > 0 {
            let available = 8 - u32::from(self.bit_pos);
            let take = remaining.min(available);
            let byte = match self.data.get(self.byte_pos) {
                Some(&b) => u32::from(b),
                None => {
                    self.overrun = true;
                    0
                }
            };
            let shift = available - take;
            let mask = (1u32 << take) - 1;
            result = (result << take) | ((byte >> shift) & mask);

            self.bit_pos += take as u8;
            if self.bit_pos == 8 {
                self.byte_pos += 1;
                self.bit_pos = 0;
            }
            remaining -= take;
        }
        result
    }

    /// 读取 n 位 (n <= 16) 的快速路径, 调用方已保证字段在缓冲区内
    pub fn get_bits_fast(&mut self, n: u32) -> u32 {
        debug_assert!(n <= 16, "get_bits_fast: n={} 超过 16 位", n);
        if n == 0 {
            return 0;
        }
        let b0 = self.byte_at(self.byte_pos);
        let b1 = self.byte_at(self.byte_pos + 1);
        let b2 = self.byte_at(self.byte_pos + 2);
        let window = (b0 << 16) | (b1 << 8) | b2;
        let value = (window << self.bit_pos) & 0x00FF_FFFF;
        self.skip_bits(n as usize);
        value >> (24 - n)
    }

    /// 读取 1 位
    pub fn get1bit(&mut self) -> u32 {
        let byte = self.byte_at(self.byte_pos);
        let bit = (byte >> (7 - self.bit_pos)) & 1;
        self.skip_bits(1);
        bit
    }

    /// 跳过 n 位
    pub fn skip_bits(&mut self, n: usize) {
        self.seek_to_bit(self.bit_offset() + n);
    }

    /// 当前绝对位偏移
    pub fn bit_offset(&self) -> usize {
        self.byte_pos * 8 + self.bit_pos as usize
    }

    /// 定位到指定的绝对位偏移
    pub fn seek_to_bit(&mut self, bit_offset: usize) {
        self.byte_pos = bit_offset / 8;
        self.bit_pos = (bit_offset % 8) as u8;
        if self.byte_pos > self.data.len() || (self.byte_pos == self.data.len() && self.bit_pos > 0)
        {
            self.overrun = true;
        }
    }

    /// 缓冲区的总位数
    pub fn bit_len(&self) -> usize {
        self.data.len() * 8
    }

    /// 是否发生过越界读取
    pub fn overrun(&self) -> bool {
        self.overrun
    }

    fn byte_at(&mut self, pos: usize) -> u32 {
        match self.data.get(pos) {
            Some(&b) => u32::from(b),
            None => {
                self.overrun = true;
                0
            }
        }
    }
}
