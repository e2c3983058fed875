//! 解码输出的 PCM 采样格式.

use std::fmt;

/// 解码器写入交织输出缓冲的采样格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// 有符号 16 位整数 (削波输出)
    S16,
    /// 32 位浮点 (未削波输出, 幅度刻度与 16 位整数相同)
    F32,
}

impl SampleFormat {
    /// 是否会饱和截断到 16 位范围
    pub const fn is_clipped(&self) -> bool {
        matches!(self, Self::S16)
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::S16 => "s16",
            Self::F32 => "flt",
        };
        write!(f, "{name}")
    }
}
