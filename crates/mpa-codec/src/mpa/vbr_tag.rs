//! Xing / Info VBR 标签解析
//!
//! 标签位于首帧侧信息之后, 记录总帧数、总字节数、查找表以及 LAME 扩展中的
//! 编码延迟和填充采样数. 携带标签的帧不包含音频, 解码器直接跳过.

use byteorder::{BigEndian, ByteOrder};

/// 送给解析器的固定窗口大小 (从候选帧头开始)
pub const VBR_TAG_WINDOW: usize = 194;

const FRAMES_FLAG: u32 = 0x0001;
const BYTES_FLAG: u32 = 0x0002;
const TOC_FLAG: u32 = 0x0004;
const VBR_SCALE_FLAG: u32 = 0x0008;

/// 查找表条目数
pub const TOC_ENTRIES: usize = 100;

/// 编码延迟/填充的合理上限, 超过视为旧式 Xing 标签中的无效值
const MAX_ENCODER_GAP: u32 = 3000;

/// Layer III 码率表 (kbps), 按 [h_id][bitrate_index] 索引, h_id 为 1 表示 MPEG-1
const TAG_BITRATES: [[u32; 16]; 2] = [
    [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
    [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0],
];

/// 采样率表, 按 [MPEG-2, MPEG-1, MPEG-2.5][sr_index] 索引
const TAG_SAMPLE_RATES: [[u32; 3]; 3] = [
    [22050, 24000, 16000],
    [44100, 48000, 32000],
    [11025, 12000, 8000],
];

/// 标签种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VbrTagKind {
    /// 可变码率流
    Xing,
    /// 固定码率流 (LAME 写入的同格式标签)
    Info,
}

/// 解析得到的 VBR 标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VbrTag {
    pub kind: VbrTagKind,
    /// 1 为 MPEG-1, 0 为 MPEG-2/2.5
    pub h_id: u8,
    pub sample_rate: u32,
    pub frames: Option<u32>,
    pub bytes: Option<u32>,
    pub toc: Option<[u8; TOC_ENTRIES]>,
    pub vbr_scale: Option<u32>,
    /// 编码器在开头插入的采样数
    pub enc_delay: Option<u32>,
    /// 编码器在末尾填充的采样数
    pub enc_padding: Option<u32>,
    /// 标签帧整体字节数 (含帧头), 至少为 1
    pub header_size: usize,
}

/// VBR 标签解析器
///
/// 每次全新同步时以候选帧头开头的固定窗口调用一次.
pub trait VbrTagParser: Send {
    fn parse(&self, window: &[u8]) -> Option<VbrTag>;
}

/// 默认解析器, 识别 `Xing` 与 `Info` 标签
#[derive(Debug, Clone, Copy, Default)]
pub struct XingTagParser;

impl VbrTagParser for XingTagParser {
    fn parse(&self, window: &[u8]) -> Option<VbrTag> {
        if window.len() < 4 {
            return None;
        }
        let h_layer = (window[1] >> 1) & 3;
        if h_layer != 0x01 {
            return None;
        }
        let h_id = (window[1] >> 3) & 1;
        let h_sr_index = usize::from((window[2] >> 2) & 3);
        let h_mode = (window[3] >> 6) & 3;
        let h_bitrate = TAG_BITRATES[usize::from(h_id)][usize::from((window[2] >> 4) & 0xF)];

        let sr_row = if (window[1] >> 4) == 0xE { 2 } else { usize::from(h_id) };
        let sample_rate = *TAG_SAMPLE_RATES[sr_row].get(h_sr_index)?;

        let side_info = match (h_id, h_mode) {
            (1, 3) => 17,
            (1, _) => 32,
            (_, 3) => 9,
            _ => 17,
        };
        let mut pos = 4 + side_info;

        let kind = match window.get(pos..pos + 4)? {
            b"Xing" => VbrTagKind::Xing,
            b"Info" => VbrTagKind::Info,
            _ => return None,
        };
        pos += 4;

        let read_u32 = |pos: &mut usize| -> Option<u32> {
            let v = BigEndian::read_u32(window.get(*pos..*pos + 4)?);
            *pos += 4;
            Some(v)
        };

        let flags = read_u32(&mut pos)?;
        let frames = if flags & FRAMES_FLAG != 0 {
            Some(read_u32(&mut pos)?)
        } else {
            None
        };
        let bytes = if flags & BYTES_FLAG != 0 {
            Some(read_u32(&mut pos)?)
        } else {
            None
        };
        let toc = if flags & TOC_FLAG != 0 {
            let mut toc = [0u8; TOC_ENTRIES];
            toc.copy_from_slice(window.get(pos..pos + TOC_ENTRIES)?);
            pos += TOC_ENTRIES;
            Some(toc)
        } else {
            None
        };
        let vbr_scale = if flags & VBR_SCALE_FLAG != 0 {
            Some(read_u32(&mut pos)?)
        } else {
            None
        };

        let header_size =
            ((u32::from(h_id) + 1) * 72000 * h_bitrate / sample_rate).max(1) as usize;

        // LAME 扩展: 版本串之后 12 位延迟 + 12 位填充
        pos += 21;
        let (enc_delay, enc_padding) = match window.get(pos..pos + 3) {
            Some(gap) => {
                let delay = (u32::from(gap[0]) << 4) | (u32::from(gap[1]) >> 4);
                let padding = (u32::from(gap[1] & 0x0F) << 8) | u32::from(gap[2]);
                (
                    (delay <= MAX_ENCODER_GAP).then_some(delay),
                    (padding <= MAX_ENCODER_GAP).then_some(padding),
                )
            }
            None => (None, None),
        };

        Some(VbrTag {
            kind,
            h_id,
            sample_rate,
            frames,
            bytes,
            toc,
            vbr_scale,
            enc_delay,
            enc_padding,
            header_size,
        })
    }
}
