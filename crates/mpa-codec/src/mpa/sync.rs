//! 帧同步
//!
//! 在输入队列中逐字节滑动 4 字节窗口寻找合法帧头. 同步过程只做前瞻,
//! 跳过多少字节由调用方决定.

use log::debug;

use super::byte_queue::ByteQueue;
use super::header::Layer;
use super::vbr_tag::{VBR_TAG_WINDOW, VbrTag, VbrTagParser};

const SYNC_MASK: u32 = 0xFFE0_0000;

/// 校验 32 位候选帧头
///
/// 要求 11 位同步字, 层不为保留值, 码率索引不为 0xF, 采样率索引不为 3,
/// 加重不为保留值 0b10. 给定 `required_layer` 时层号也必须一致.
pub fn head_check(head: u32, required_layer: Option<Layer>) -> bool {
    if head & SYNC_MASK != SYNC_MASK {
        return false;
    }
    let Some(layer) = Layer::from_bits(head >> 17) else {
        return false;
    };
    if required_layer.is_some_and(|required| required != layer) {
        return false;
    }
    if (head >> 12) & 0xF == 0xF {
        return false;
    }
    if (head >> 10) & 0x3 == 0x3 {
        return false;
    }
    head & 0x3 != 0x2
}

/// 流签名: 重同步自由格式流时要求新帧头与之一致
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSignature {
    pub channels: usize,
    pub lsf: bool,
    pub mpeg25: bool,
    pub sfreq: usize,
}

impl StreamSignature {
    /// 从原始帧头值提取签名
    pub fn from_raw(head: u32) -> Self {
        let (lsf, mpeg25) = if head & (1 << 20) != 0 {
            (head & (1 << 19) == 0, false)
        } else {
            (true, true)
        };
        let sr_bits = ((head >> 10) & 0x3) as usize;
        let sfreq = if mpeg25 {
            6 + sr_bits
        } else {
            sr_bits + if lsf { 3 } else { 0 }
        };
        Self {
            channels: if (head >> 6) & 0x3 == 0x3 { 1 } else { 2 },
            lsf,
            mpeg25,
            sfreq,
        }
    }
}

/// 扫描队列, 返回第一个合法帧头之前的字节数
///
/// `consistent_with` 不为空时, 候选帧头还必须与给定签名一致.
pub fn sync_buffer(
    queue: &ByteQueue,
    required_layer: Option<Layer>,
    consistent_with: Option<&StreamSignature>,
) -> Option<usize> {
    let mut head = 0u32;
    for (i, byte) in queue.iter_from(0).enumerate() {
        head = (head << 8) | u32::from(byte);
        if i < 3 {
            continue;
        }
        if !head_check(head, required_layer) {
            continue;
        }
        if let Some(signature) = consistent_with {
            if StreamSignature::from_raw(head) != *signature {
                continue;
            }
        }
        return Some(i - 3);
    }
    None
}

/// 在跳过 `skip` 字节后的帧头处检测 VBR 标签
///
/// 队列中不足一个检测窗口时返回 None.
pub fn check_vbr_header(
    queue: &ByteQueue,
    skip: usize,
    parser: &dyn VbrTagParser,
) -> Option<VbrTag> {
    let mut window = [0u8; VBR_TAG_WINDOW];
    if !queue.peek_into(skip, &mut window) {
        return None;
    }
    let tag = parser.parse(&window)?;
    debug!(
        "检测到 {:?} 标签: 帧数 {:?}, 延迟 {:?}, 填充 {:?}, 标签帧 {} 字节",
        tag.kind, tag.frames, tag.enc_delay, tag.enc_padding, tag.header_size
    );
    Some(tag)
}
