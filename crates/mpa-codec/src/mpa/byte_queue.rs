//! 压缩字节队列
//!
//! 按喂入顺序保存输入数据块, 从队首顺序消费. 帧同步阶段只做前瞻,
//! 不会消费数据.

use std::collections::VecDeque;

use bytes::{Buf, Bytes};
use mpa_core::{MpaError, MpaResult};

/// 输入字节队列
///
/// 剩余字节数始终等于各数据块剩余长度之和, 数据块只在被完全消费后丢弃.
#[derive(Debug, Default, Clone)]
pub struct ByteQueue {
    chunks: VecDeque<Bytes>,
    len: usize,
}

impl ByteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一段输入 (拷贝)
    pub fn feed(&mut self, data: &[u8]) {
        if !data.is_empty() {
            self.feed_bytes(Bytes::copy_from_slice(data));
        }
    }

    /// 追加一段已拥有的输入
    pub fn feed_bytes(&mut self, chunk: Bytes) {
        if chunk.is_empty() {
            return;
        }
        self.len += chunk.len();
        self.chunks.push_back(chunk);
    }

    /// 剩余字节数
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 读取距队首 `at` 处的字节, 不消费
    pub fn peek_byte(&self, at: usize) -> Option<u8> {
        if at >= self.len {
            return None;
        }
        let mut offset = at;
        for chunk in &self.chunks {
            if offset < chunk.len() {
                return Some(chunk[offset]);
            }
            offset -= chunk.len();
        }
        None
    }

    /// 从 `at` 开始拷贝 `dest.len()` 字节, 不消费. 数据不足时返回 false
    pub fn peek_into(&self, at: usize, dest: &mut [u8]) -> bool {
        if at + dest.len() > self.len {
            return false;
        }
        let mut filled = 0;
        for (i, b) in self.iter_from(at).take(dest.len()).enumerate() {
            dest[i] = b;
            filled += 1;
        }
        filled == dest.len()
    }

    /// 从 `at` 开始逐字节遍历剩余数据
    pub fn iter_from(&self, at: usize) -> impl Iterator<Item = u8> + '_ {
        self.chunks
            .iter()
            .flat_map(|chunk| chunk.iter().copied())
            .skip(at)
    }

    /// 消费 4 字节并按大端组合
    pub fn read_u32_be(&mut self) -> MpaResult<u32> {
        let mut b = [0u8; 4];
        self.copy_out(&mut b)?;
        Ok(u32::from_be_bytes(b))
    }

    /// 丢弃队首 n 字节
    pub fn consume(&mut self, n: usize) -> MpaResult<()> {
        self.check_available(n)?;
        let mut remaining = n;
        while remaining > 0 {
            let Some(front) = self.chunks.front_mut() else {
                break;
            };
            let take = remaining.min(front.len());
            front.advance(take);
            remaining -= take;
            if front.is_empty() {
                self.chunks.pop_front();
            }
        }
        self.len -= n;
        Ok(())
    }

    /// 拷贝队首 `dest.len()` 字节到 `dest` 并消费
    pub fn copy_out(&mut self, dest: &mut [u8]) -> MpaResult<()> {
        self.check_available(dest.len())?;
        let mut filled = 0;
        while filled < dest.len() {
            let Some(front) = self.chunks.front_mut() else {
                break;
            };
            let take = (dest.len() - filled).min(front.len());
            dest[filled..filled + take].copy_from_slice(&front[..take]);
            front.advance(take);
            filled += take;
            if front.is_empty() {
                self.chunks.pop_front();
            }
        }
        self.len -= dest.len();
        Ok(())
    }

    /// 清空队列
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.len = 0;
    }

    fn check_available(&self, requested: usize) -> MpaResult<()> {
        if requested > self.len {
            return Err(MpaError::QueueUnderflow {
                requested,
                available: self.len,
            });
        }
        Ok(())
    }
}
