//! # mpa
//!
//! 纯 Rust 实现的 MPEG-1/2/2.5 Layer I/II/III 音频解码器.
//!
//! 解码器以流式方式工作: 调用方按任意大小的块喂入字节, 每次调用最多
//! 产出一帧 PCM. 帧头同步、比特储备池、Xing/Info 标签跳过与重同步都在
//! 内部完成.
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use mpa::codec::{DecoderOptions, MpaDecoder};
//!
//! let data = std::fs::read("input.mp3").unwrap_or_default();
//! let mut decoder = MpaDecoder::new(DecoderOptions::default());
//! for chunk in data.chunks(4096) {
//!     let pcm = decoder.decode_frames(chunk).unwrap_or_default();
//!     println!("{} Hz, {} 个采样", pcm.sample_rate, pcm.samples_per_channel());
//! }
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `mpa-core` | 错误类型、CRC-16、比特流写入器、采样格式 |
//! | `mpa-codec` | 解码引擎 |

/// 核心类型与工具
pub use mpa_core as core;

/// 解码引擎
pub use mpa_codec as codec;

/// 日志系统
pub mod logging;
