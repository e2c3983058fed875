//! # mpa-core
//!
//! MPEG 音频解码器的基础设施: 统一错误类型、CRC-16 校验、比特流写入器与
//! 输出采样格式.

pub mod bitwriter;
pub mod crc;
pub mod error;
pub mod sample_format;

// 重导出常用类型
pub use bitwriter::BitWriter;
pub use error::{MpaError, MpaResult};
pub use sample_format::SampleFormat;
