//! Layer III 比特储备库
//!
//! 两块工作缓冲区轮流使用: 当前帧写入活动缓冲区, 上一帧的区域仍保留在
//! 另一块中. main_data_begin 回退时把上一帧末尾的字节拷贝到当前帧数据
//! 之前, 使解码器可以在一块连续内存上读取整个 granule.

use log::warn;
use mpa_core::{MpaError, MpaResult};

use super::byte_queue::ByteQueue;

/// 帧数据之前预留的回退空间 (main_data_begin 最大 511)
pub const RESERVOIR_HEADROOM: usize = 512;

/// 单帧帧体 (不含 4 字节帧头) 的最大字节数
pub const MAX_FRAME_BODY: usize = 4096;

/// 每帧最多保留的附加数据字节数
pub const MAX_ANCILLARY_BYTES: usize = 512;

const BUFFER_LEN: usize = RESERVOIR_HEADROOM + MAX_FRAME_BODY + MAX_ANCILLARY_BYTES;

/// 回退结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backstep {
    /// main_data 在活动缓冲区中的起始偏移
    pub start: usize,
    /// 历史数据不足而补零的字节数
    pub zero_filled: usize,
}

/// 双缓冲比特储备库
#[derive(Debug, Clone)]
pub struct BitReservoir {
    bufs: [Vec<u8>; 2],
    active: usize,
    /// 活动缓冲区的写入位置
    write_pos: usize,
    /// 每块缓冲区中有效数据的起点
    valid_start: [usize; 2],
    /// 上一帧在非活动缓冲区中的结束位置, None 表示没有上一帧
    prev_end: Option<usize>,
}

impl Default for BitReservoir {
    fn default() -> Self {
        Self::new()
    }
}

impl BitReservoir {
    pub fn new() -> Self {
        Self {
            bufs: [vec![0u8; BUFFER_LEN], vec![0u8; BUFFER_LEN]],
            active: 0,
            write_pos: RESERVOIR_HEADROOM,
            valid_start: [RESERVOIR_HEADROOM; 2],
            prev_end: None,
        }
    }

    pub fn reset(&mut self) {
        for buf in &mut self.bufs {
            buf.fill(0);
        }
        self.active = 0;
        self.write_pos = RESERVOIR_HEADROOM;
        self.valid_start = [RESERVOIR_HEADROOM; 2];
        self.prev_end = None;
    }

    /// 切换活动缓冲区, 新帧从 `frame_start()` 开始写入
    ///
    /// `keep_previous` 为 false 时视为没有可回退的上一帧.
    pub fn toggle(&mut self, keep_previous: bool) {
        self.prev_end = keep_previous.then_some(self.write_pos);
        self.active ^= 1;
        self.write_pos = RESERVOIR_HEADROOM;
        self.valid_start[self.active] = RESERVOIR_HEADROOM;
    }

    /// 帧数据在活动缓冲区中的起始偏移
    pub const fn frame_start(&self) -> usize {
        RESERVOIR_HEADROOM
    }

    /// 活动缓冲区还能写入的字节数
    pub fn free_space(&self) -> usize {
        BUFFER_LEN - self.write_pos
    }

    /// 活动缓冲区中已写入的数据 (含帧起点之前的回退区域)
    pub fn active(&self) -> &[u8] {
        &self.bufs[self.active][..self.write_pos]
    }

    /// 从输入队列搬运 n 字节到活动缓冲区末尾
    pub fn fill_from_queue(&mut self, queue: &mut ByteQueue, n: usize) -> MpaResult<()> {
        self.ensure_space(n)?;
        let pos = self.write_pos;
        queue.copy_out(&mut self.bufs[self.active][pos..pos + n])?;
        self.write_pos += n;
        Ok(())
    }

    /// 追加一段字节到活动缓冲区末尾
    #[cfg(test)]
    pub fn append(&mut self, data: &[u8]) -> MpaResult<()> {
        self.ensure_space(data.len())?;
        let pos = self.write_pos;
        self.bufs[self.active][pos..pos + data.len()].copy_from_slice(data);
        self.write_pos += data.len();
        Ok(())
    }

    /// 回退 `backstep` 字节: 把上一帧末尾的字节拷贝到 `data_start` 之前
    ///
    /// 没有上一帧时回退是致命错误. 上一帧保留的历史不足时 (重同步之后),
    /// 缺失部分补零并记录警告.
    pub fn set_pointer(&mut self, data_start: usize, backstep: usize) -> MpaResult<Backstep> {
        if backstep == 0 {
            return Ok(Backstep {
                start: data_start,
                zero_filled: 0,
            });
        }
        let Some(prev_end) = self.prev_end else {
            return Err(MpaError::ReservoirUnderflow {
                backstep,
                available: 0,
            });
        };
        if backstep > data_start {
            return Err(MpaError::ReservoirUnderflow {
                backstep,
                available: data_start,
            });
        }

        let prev = self.active ^ 1;
        let available = prev_end.saturating_sub(self.valid_start[prev]);
        let copied = backstep.min(available);
        let zero_filled = backstep - copied;
        let start = data_start - backstep;

        let (active_buf, prev_buf) = if self.active == 0 {
            let (a, b) = self.bufs.split_at_mut(1);
            (&mut a[0], &b[0])
        } else {
            let (a, b) = self.bufs.split_at_mut(1);
            (&mut b[0], &a[0])
        };
        active_buf[start..start + zero_filled].fill(0);
        active_buf[start + zero_filled..data_start]
            .copy_from_slice(&prev_buf[prev_end - copied..prev_end]);

        if zero_filled > 0 {
            warn!(
                "比特储备库历史不足: 需要回退 {} 字节, 仅保留 {} 字节, 缺失部分补零",
                backstep, available
            );
        }
        self.valid_start[self.active] = self.valid_start[self.active].min(start);
        Ok(Backstep { start, zero_filled })
    }

    fn ensure_space(&self, n: usize) -> MpaResult<()> {
        if n > self.free_space() {
            return Err(MpaError::Internal(format!(
                "工作缓冲区溢出: 写入 {} 字节, 剩余 {} 字节",
                n,
                self.free_space()
            )));
        }
        Ok(())
    }
}
