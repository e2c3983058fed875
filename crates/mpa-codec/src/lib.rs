//! # mpa-codec
//!
//! MPEG-1/2/2.5 Audio Layer I/II/III 解码引擎.
//!
//! 解码器以增量方式接收压缩字节, 每次调用最多产出一帧 PCM. 数据不足时返回
//! [`DecodeStatus::NeedMore`], 继续喂入后从中断的阶段接着解析.
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use mpa_codec::{DecodeStatus, DecoderOptions, MAX_FRAME_SAMPLES, MpaDecoder};
//!
//! let mut decoder = MpaDecoder::new(DecoderOptions::default());
//! let mut pcm = vec![0i16; MAX_FRAME_SAMPLES];
//! let chunk: &[u8] = &[];
//! match decoder.decode(chunk, &mut pcm)? {
//!     DecodeStatus::Decoded { samples, channels, .. } => {
//!         println!("解码 {samples} 个采样, {channels} 声道");
//!     }
//!     DecodeStatus::NeedMore => {}
//! }
//! # Ok::<(), mpa_core::MpaError>(())
//! ```

pub mod mpa;

// 重导出常用类型
pub use mpa::decoder::{
    ChannelSelect, DecodeStatus, DecodedPcm, DecoderOptions, DecoderStats, FrameStage,
    MAX_FRAME_SAMPLES, MpaDecoder, StreamInfo, decode_all,
};
pub use mpa::header::{ChannelMode, FrameHeader, Layer, MpegVersion};
pub use mpa::vbr_tag::{VbrTag, VbrTagKind, VbrTagParser, XingTagParser};
