//! 统一错误类型定义.
//!
//! 解码引擎各层共用的错误类型. 只有破坏游标或缓冲区完整性的情况
//! 才会以 `Err` 形式返回, 码流损坏由解码器就地容错处理.

use thiserror::Error;

/// MPEG 音频解码统一错误类型
#[derive(Debug, Error)]
pub enum MpaError {
    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 不支持的码流组合
    #[error("不支持的操作: {0}")]
    Unsupported(String),

    /// 无效数据 (损坏的码流等)
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// 读取越过了输入字节队列的末尾 (调用方违反了喂数据约定)
    #[error("字节队列下溢: 请求 {requested} 字节, 仅剩 {available} 字节")]
    QueueUnderflow { requested: usize, available: usize },

    /// 比特储备库回退超出了保留的上一帧区域
    #[error("比特储备库下溢: 需要回退 {backstep} 字节, 仅保留 {available} 字节")]
    ReservoirUnderflow { backstep: usize, available: usize },

    /// 输出缓冲区容量不足以容纳一帧
    #[error("输出缓冲区太小: 需要 {required} 个采样, 实际 {actual} 个")]
    OutputTooSmall { required: usize, actual: usize },

    /// 内部错误 (不应发生)
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 解码引擎统一 Result 类型
pub type MpaResult<T> = Result<T, MpaError>;
