//! MPEG 音频帧头解析

use std::fmt;

use log::warn;
use mpa_core::{MpaError, MpaResult};

use super::bit_reservoir::MAX_FRAME_BODY;
use super::tables::{BITRATES, SAMPLES_PER_FRAME, SAMPLE_RATES};

/// MPEG 版本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Mpeg1,
    Mpeg2,
    /// MPEG-2.5 (非 ISO 扩展, 只支持 Layer III)
    Mpeg25,
}

/// MPEG 音频层
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Layer1,
    Layer2,
    Layer3,
}

impl Layer {
    /// 层号 1..=3
    pub const fn number(self) -> u32 {
        match self {
            Self::Layer1 => 1,
            Self::Layer2 => 2,
            Self::Layer3 => 3,
        }
    }

    /// 按帧头中的 2 位编码解析 (0 为保留值)
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits & 3 {
            3 => Some(Self::Layer1),
            2 => Some(Self::Layer2),
            1 => Some(Self::Layer3),
            _ => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer {}", "I".repeat(self.number() as usize))
    }
}

/// 声道模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

impl ChannelMode {
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Self::Stereo,
            1 => Self::JointStereo,
            2 => Self::DualChannel,
            _ => Self::Mono,
        }
    }

    pub const fn channels(self) -> usize {
        match self {
            Self::Mono => 1,
            _ => 2,
        }
    }
}

/// 联合立体声 mode_extension 中的 M/S 标志位
pub const MODE_EXT_MS: u8 = 0x2;
/// 联合立体声 mode_extension 中的强度立体声标志位
pub const MODE_EXT_IS: u8 = 0x1;

/// 帧头固定长度
pub const HEADER_SIZE: usize = 4;

/// 解析后的帧头, 在该帧生命周期内不再修改
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// 原始 32 位帧头
    pub raw: u32,
    pub version: MpegVersion,
    pub layer: Layer,
    /// 低采样率扩展 (MPEG-2 与 MPEG-2.5)
    pub lsf: bool,
    pub crc_present: bool,
    pub bitrate_index: u8,
    /// 采样率表索引 (0..9, 已合并版本偏移)
    pub sfreq: usize,
    pub padding: bool,
    pub private: bool,
    pub mode: ChannelMode,
    pub mode_ext: u8,
    pub copyright: bool,
    pub original: bool,
    pub emphasis: u8,
    /// 帧体字节数 (不含 4 字节帧头), 自由格式为 0
    pub frame_size: usize,
}

impl FrameHeader {
    /// 从 32 位帧头值解析
    ///
    /// 调用前应先通过 `head_check`. MPEG-2.5 的 Layer I/II 与 Layer I/II 的
    /// 自由格式返回 `Unsupported`. 超过上限的帧长截断到上限并记录警告.
    pub fn decode(raw: u32) -> MpaResult<Self> {
        let (lsf, version) = if raw & (1 << 20) != 0 {
            if raw & (1 << 19) != 0 {
                (false, MpegVersion::Mpeg1)
            } else {
                (true, MpegVersion::Mpeg2)
            }
        } else {
            (true, MpegVersion::Mpeg25)
        };

        let layer = Layer::from_bits(raw >> 17)
            .ok_or_else(|| MpaError::InvalidData(format!("保留的层编码: 帧头 {raw:#010x}")))?;
        let bitrate_index = ((raw >> 12) & 0xF) as u8;
        if bitrate_index == 0xF {
            return Err(MpaError::InvalidData(format!("无效码率索引: 帧头 {raw:#010x}")));
        }
        let sr_bits = ((raw >> 10) & 0x3) as usize;
        if sr_bits == 3 {
            return Err(MpaError::InvalidData(format!("保留的采样率索引: 帧头 {raw:#010x}")));
        }
        let sfreq = match version {
            MpegVersion::Mpeg1 => sr_bits,
            MpegVersion::Mpeg2 => sr_bits + 3,
            MpegVersion::Mpeg25 => sr_bits + 6,
        };

        if version == MpegVersion::Mpeg25 && layer != Layer::Layer3 {
            return Err(MpaError::Unsupported(format!("MPEG-2.5 不支持 {layer}")));
        }
        if bitrate_index == 0 && layer != Layer::Layer3 {
            return Err(MpaError::Unsupported(format!("{layer} 不支持自由格式")));
        }

        let mut header = Self {
            raw,
            version,
            layer,
            lsf,
            crc_present: (raw >> 16) & 1 == 0,
            bitrate_index,
            sfreq,
            padding: (raw >> 9) & 1 != 0,
            private: (raw >> 8) & 1 != 0,
            mode: ChannelMode::from_bits(raw >> 6),
            mode_ext: ((raw >> 4) & 0x3) as u8,
            copyright: (raw >> 3) & 1 != 0,
            original: (raw >> 2) & 1 != 0,
            emphasis: (raw & 0x3) as u8,
            frame_size: 0,
        };
        header.frame_size = header.compute_frame_size();
        if header.frame_size > MAX_FRAME_BODY {
            warn!(
                "帧长 {} 超过上限 {}, 已截断",
                header.frame_size, MAX_FRAME_BODY
            );
            header.frame_size = MAX_FRAME_BODY;
        }
        Ok(header)
    }

    fn compute_frame_size(&self) -> usize {
        if self.bitrate_index == 0 {
            return 0;
        }
        let kbps = self.bitrate_kbps() as usize;
        let freq = self.sample_rate() as usize;
        let pad = usize::from(self.padding);
        let size = match self.layer {
            Layer::Layer1 => (kbps * 12000 / freq + pad) << 2,
            Layer::Layer2 => kbps * 144000 / freq + pad,
            Layer::Layer3 => kbps * 144000 / (freq << usize::from(self.lsf)) + pad,
        };
        size.saturating_sub(HEADER_SIZE)
    }

    /// 采样率 (Hz)
    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATES[self.sfreq]
    }

    /// 表中码率 (kbps), 自由格式为 0
    pub fn bitrate_kbps(&self) -> u32 {
        BITRATES[usize::from(self.lsf)][self.layer.number() as usize - 1]
            [usize::from(self.bitrate_index)]
    }

    pub fn is_free_format(&self) -> bool {
        self.bitrate_index == 0
    }

    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    /// 每帧每声道采样数
    pub fn samples_per_frame(&self) -> usize {
        SAMPLES_PER_FRAME[usize::from(self.lsf)][self.layer.number() as usize - 1]
    }

    /// Layer III 侧信息字节数 (含 CRC 校验字)
    pub fn side_info_size(&self) -> usize {
        let base = match (self.lsf, self.channels()) {
            (false, 1) => 17,
            (false, _) => 32,
            (true, 1) => 9,
            (true, _) => 17,
        };
        base + if self.crc_present { 2 } else { 0 }
    }

    pub fn is_ms_stereo(&self) -> bool {
        self.mode == ChannelMode::JointStereo && self.mode_ext & MODE_EXT_MS != 0
    }

    pub fn is_intensity_stereo(&self) -> bool {
        self.mode == ChannelMode::JointStereo && self.mode_ext & MODE_EXT_IS != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 组装帧头: version 位 (3=MPEG-1, 2=MPEG-2, 0=MPEG-2.5), layer 号 1..=3
    fn make_header(version: u32, layer: u32, br: u32, sr: u32, pad: u32, mode: u32) -> u32 {
        0xFFE0_0000
            | (version << 19)
            | ((4 - layer) << 17)
            | (1 << 16)
            | (br << 12)
            | (sr << 10)
            | (pad << 9)
            | (mode << 6)
    }

    #[test]
    fn test_decode_mpeg1_layer3() {
        let header = FrameHeader::decode(0xFFFB_9064).unwrap();
        assert_eq!(header.version, MpegVersion::Mpeg1);
        assert_eq!(header.layer, Layer::Layer3);
        assert!(!header.crc_present);
        assert_eq!(header.bitrate_kbps(), 128);
        assert_eq!(header.sample_rate(), 44100);
        assert_eq!(header.mode, ChannelMode::JointStereo);
        assert_eq!(header.frame_size + HEADER_SIZE, 417);
        assert_eq!(header.side_info_size(), 32);
        assert_eq!(header.samples_per_frame(), 1152);
    }

    #[test]
    fn test_frame_size_reference_values() {
        // (version, layer, bitrate_index, sr_index, padding, 整帧字节数)
        let cases = [
            (3, 3, 9, 0, 0, 417),  // 128k 44.1k
            (3, 3, 9, 0, 1, 418),
            (3, 3, 14, 1, 0, 960), // 320k 48k
            (3, 3, 1, 2, 0, 144),  // 32k 32k
            (3, 2, 10, 1, 0, 576), // 192k 48k
            (3, 2, 14, 2, 1, 1729),
            (3, 1, 12, 1, 0, 384), // 384k 48k
            (3, 1, 1, 0, 1, 36),   // 32k 44.1k, 含填充槽 4 字节
            (2, 3, 8, 0, 0, 208),  // 64k 22.05k
            (2, 3, 14, 2, 0, 720), // 160k 16k
            (2, 2, 8, 1, 0, 384),  // 64k 24k
            (2, 1, 2, 1, 0, 96),   // 48k 24k
            (0, 3, 1, 2, 0, 72),   // 8k 8k
            (0, 3, 14, 0, 1, 1045),
        ];
        for (version, layer, br, sr, pad, expected) in cases {
            let raw = make_header(version, layer, br, sr, pad, 0);
            let header = FrameHeader::decode(raw).unwrap();
            assert_eq!(
                header.frame_size + HEADER_SIZE,
                expected,
                "version={version} layer={layer} br={br} sr={sr} pad={pad}"
            );
        }
    }

    #[test]
    fn test_frame_size_all_combinations() {
        const MPEG1_KBPS: [[usize; 14]; 3] = [
            [32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448],
            [32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384],
            [32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320],
        ];
        const LSF_KBPS: [[usize; 14]; 2] = [
            [32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256],
            [8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
        ];
        // (version 位, 三个采样率)
        let versions = [
            (3, [44100, 48000, 32000]),
            (2, [22050, 24000, 16000]),
            (0, [11025, 12000, 8000]),
        ];

        let mut checked = 0;
        for (version, rates) in versions {
            for layer in 1..=3usize {
                for br in 1..=14usize {
                    for (sr, &rate) in rates.iter().enumerate() {
                        for pad in 0..=1usize {
                            let raw = make_header(
                                version,
                                layer as u32,
                                br as u32,
                                sr as u32,
                                pad as u32,
                                0,
                            );
                            if version == 0 && layer != 3 {
                                assert!(FrameHeader::decode(raw).is_err());
                                continue;
                            }
                            let kbps = if version == 3 {
                                MPEG1_KBPS[layer - 1][br - 1]
                            } else {
                                LSF_KBPS[usize::from(layer != 1)][br - 1]
                            };
                            let expected = match (layer, version) {
                                (1, _) => (12_000 * kbps / rate + pad) * 4,
                                (2, _) | (3, 3) => 144_000 * kbps / rate + pad,
                                _ => 72_000 * kbps / rate + pad,
                            };
                            let header = FrameHeader::decode(raw).unwrap();
                            assert_eq!(
                                header.frame_size + HEADER_SIZE,
                                expected,
                                "version={version} layer={layer} br={br} sr={sr} pad={pad}"
                            );
                            checked += 1;
                        }
                    }
                }
            }
        }
        // MPEG-1 与 MPEG-2 各 3 层, MPEG-2.5 只有 Layer III
        assert_eq!(checked, 7 * 14 * 3 * 2);
    }

    #[test]
    fn test_side_info_sizes() {
        let mono_lsf = FrameHeader::decode(make_header(2, 3, 8, 0, 0, 3)).unwrap();
        assert_eq!(mono_lsf.side_info_size(), 9);
        let stereo_lsf = FrameHeader::decode(make_header(2, 3, 8, 0, 0, 0)).unwrap();
        assert_eq!(stereo_lsf.side_info_size(), 17);
        let mono = FrameHeader::decode(make_header(3, 3, 9, 0, 0, 3)).unwrap();
        assert_eq!(mono.side_info_size(), 17);

        let with_crc = FrameHeader::decode(make_header(3, 3, 9, 0, 0, 0) & !(1 << 16)).unwrap();
        assert!(with_crc.crc_present);
        assert_eq!(with_crc.side_info_size(), 34);
    }

    #[test]
    fn test_free_format_and_unsupported() {
        let free = FrameHeader::decode(make_header(3, 3, 0, 0, 0, 0)).unwrap();
        assert!(free.is_free_format());
        assert_eq!(free.frame_size, 0);

        assert!(matches!(
            FrameHeader::decode(make_header(3, 2, 0, 0, 0, 0)),
            Err(MpaError::Unsupported(_))
        ));
        assert!(matches!(
            FrameHeader::decode(make_header(0, 2, 4, 0, 0, 0)),
            Err(MpaError::Unsupported(_))
        ));
    }

    #[test]
    fn test_joint_stereo_flags() {
        let raw = make_header(3, 3, 9, 0, 0, 1) | (0x3 << 4);
        let header = FrameHeader::decode(raw).unwrap();
        assert!(header.is_ms_stereo());
        assert!(header.is_intensity_stereo());
        assert_eq!(header.layer.to_string(), "Layer III");
    }
}
