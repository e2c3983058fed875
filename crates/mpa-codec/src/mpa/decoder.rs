//! 解码会话与逐帧状态机
//!
//! 每次调用依次推进 帧头 -> 侧信息 -> 主数据 -> 附加数据 四个阶段, 数据不足时
//! 返回 `NeedMore` 并停留在当前阶段, 下次喂入后从该阶段继续.

use bytes::Bytes;
use log::{debug, warn};
use mpa_core::crc::{MPEG_CRC16_INIT, crc16_update};
use mpa_core::{MpaError, MpaResult, SampleFormat};

use super::bit_reservoir::{BitReservoir, MAX_ANCILLARY_BYTES};
use super::bitreader::BitReader;
use super::byte_queue::ByteQueue;
use super::header::{ChannelMode, FrameHeader, HEADER_SIZE, Layer, MpegVersion};
use super::layer3::Layer3Decoder;
use super::layer12::select_channels;
use super::side_info::SideInfo;
use super::sync::{StreamSignature, check_vbr_header, sync_buffer};
use super::synthesis::{PcmSample, SubbandSamples, SynthesisFilter};
use super::vbr_tag::{VBR_TAG_WINDOW, VbrTag, VbrTagParser, XingTagParser};
use super::{layer1, layer2};

/// 单次调用输出缓冲区的最小容量 (1152 采样 x 2 声道)
pub const MAX_FRAME_SAMPLES: usize = 2304;

/// 输出声道选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelSelect {
    /// 按码流声道数输出
    #[default]
    Stereo,
    /// 仅左声道
    Left,
    /// 仅右声道
    Right,
    /// 左右混合为单声道
    Mix,
}

/// 解码器配置
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    pub channel_select: ChannelSelect,
    /// 校验 Layer III CRC-16, 不匹配时只记录警告
    pub verify_crc: bool,
    /// 首次同步时检测并跳过 Xing/Info 标签帧
    pub detect_vbr_tag: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            channel_select: ChannelSelect::Stereo,
            verify_crc: false,
            detect_vbr_tag: true,
        }
    }
}

/// 单次解码调用的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// 完成一帧, `samples` 为每声道采样数, 输出按声道交织
    Decoded {
        samples: usize,
        channels: usize,
        /// 写入输出缓冲的采样格式
        format: SampleFormat,
    },
    /// 数据不足, 需要继续喂入
    NeedMore,
}

/// 当前帧的解析进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameStage {
    #[default]
    AwaitHeader,
    AwaitSideInfo,
    AwaitMainData,
    /// 主数据已解码, 等待附加数据
    FrameComplete,
}

/// 流参数, 取自最近一次解析的帧头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub version: MpegVersion,
    pub layer: Layer,
    pub channels: usize,
    pub sample_rate: u32,
    pub mode: ChannelMode,
    pub mode_ext: u8,
    pub samples_per_frame: usize,
    /// 自由格式时由实测帧长估算, 尚未测得为 0
    pub bitrate_kbps: u32,
    pub free_format: bool,
    pub total_frames: Option<u32>,
    pub total_samples: Option<u64>,
    pub enc_delay: Option<u32>,
    pub enc_padding: Option<u32>,
}

/// 会话累计统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    pub frames_decoded: u64,
    /// 重同步跳过的字节数
    pub skipped_bytes: u64,
    pub resyncs: u64,
    pub vbr_tags_skipped: u64,
    pub clipped_samples: u64,
    pub reservoir_underflows: u64,
    pub huffman_overruns: u64,
    pub crc_mismatches: u64,
    pub unsupported_headers: u64,
}

/// 按声道分开存放的 16 位 PCM
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedPcm {
    pub sample_rate: u32,
    pub channels: Vec<Vec<i16>>,
}

impl DecodedPcm {
    /// 每声道采样数
    pub fn samples_per_channel(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    fn push_interleaved(&mut self, data: &[i16], samples: usize, channels: usize) {
        if self.channels.len() < channels {
            self.channels.resize(channels, Vec::new());
        }
        for (ch, plane) in self.channels.iter_mut().enumerate().take(channels) {
            plane.extend(data[..samples * channels].iter().skip(ch).step_by(channels));
        }
    }
}

/// MPEG 音频解码会话
///
/// 单线程使用, 不同会话之间没有共享状态.
pub struct MpaDecoder {
    options: DecoderOptions,
    vbr_parser: Box<dyn VbrTagParser>,
    queue: ByteQueue,
    reservoir: BitReservoir,
    stage: FrameStage,
    header: Option<FrameHeader>,
    side: SideInfo,
    /// 侧信息字节数 (仅 Layer III, 含 CRC)
    ssize: usize,
    /// 主数据字节数
    dsize: usize,
    /// 当前帧帧体字节数 (自由格式在附加数据阶段测得)
    framesize: usize,
    /// 上一帧帧体字节数, None 表示尚未完成任何一帧
    fsizeold: Option<usize>,
    fsizeold_nopadding: usize,
    free_format: bool,
    old_free_format: bool,
    /// 重同步后下一帧头按首次同步处理
    sync_bitstream: bool,
    vbr_tag: Option<VbrTag>,
    layer3: Box<Layer3Decoder>,
    subbands: Box<SubbandSamples>,
    synth: [SynthesisFilter; 2],
    stats: DecoderStats,
}

impl Default for MpaDecoder {
    fn default() -> Self {
        Self::new(DecoderOptions::default())
    }
}

impl MpaDecoder {
    pub fn new(options: DecoderOptions) -> Self {
        Self::with_vbr_parser(options, Box::new(XingTagParser))
    }

    /// 使用自定义 VBR 标签解析器
    pub fn with_vbr_parser(options: DecoderOptions, vbr_parser: Box<dyn VbrTagParser>) -> Self {
        Self {
            options,
            vbr_parser,
            queue: ByteQueue::new(),
            reservoir: BitReservoir::new(),
            stage: FrameStage::AwaitHeader,
            header: None,
            side: SideInfo::default(),
            ssize: 0,
            dsize: 0,
            framesize: 0,
            fsizeold: None,
            fsizeold_nopadding: 0,
            free_format: false,
            old_free_format: false,
            sync_bitstream: true,
            vbr_tag: None,
            layer3: Box::default(),
            subbands: Box::default(),
            synth: [SynthesisFilter::new(), SynthesisFilter::new()],
            stats: DecoderStats::default(),
        }
    }

    /// 回到新建状态, 保留配置与标签解析器
    pub fn reset(&mut self) {
        self.queue.clear();
        self.reservoir.reset();
        self.stage = FrameStage::AwaitHeader;
        self.header = None;
        self.side = SideInfo::default();
        self.ssize = 0;
        self.dsize = 0;
        self.framesize = 0;
        self.fsizeold = None;
        self.fsizeold_nopadding = 0;
        self.free_format = false;
        self.old_free_format = false;
        self.sync_bitstream = true;
        self.vbr_tag = None;
        self.layer3.reset();
        for filter in &mut self.synth {
            filter.reset();
        }
        self.stats = DecoderStats::default();
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    pub fn header_parsed(&self) -> bool {
        self.stage != FrameStage::AwaitHeader
    }

    pub fn side_parsed(&self) -> bool {
        matches!(self.stage, FrameStage::AwaitMainData | FrameStage::FrameComplete)
    }

    pub fn data_parsed(&self) -> bool {
        self.stage == FrameStage::FrameComplete
    }

    /// 输入队列中尚未消费的字节数
    pub fn buffered_len(&self) -> usize {
        self.queue.len()
    }

    /// 最近检测到的 VBR 标签
    pub fn vbr_tag(&self) -> Option<&VbrTag> {
        self.vbr_tag.as_ref()
    }

    /// 喂入一段已拥有的数据, 不解码
    pub fn feed(&mut self, chunk: impl Into<Bytes>) {
        self.queue.feed_bytes(chunk.into());
    }

    /// 喂入数据并尝试解码一帧, 输出 16 位交织 PCM
    pub fn decode(&mut self, input: &[u8], out: &mut [i16]) -> MpaResult<DecodeStatus> {
        self.run(input, out)
    }

    /// 喂入数据并尝试解码一帧, 输出未削波的浮点交织 PCM (16 位满幅刻度)
    pub fn decode_unclipped(&mut self, input: &[u8], out: &mut [f32]) -> MpaResult<DecodeStatus> {
        self.run(input, out)
    }

    /// 流参数, 尚未解析到帧头时为 None
    pub fn stream_info(&self) -> Option<StreamInfo> {
        let header = self.header.as_ref()?;
        let samples_per_frame = header.samples_per_frame();
        let bitrate_kbps = if header.is_free_format() {
            self.fsizeold.map_or(0, |size| {
                let bits = 8.0 * (HEADER_SIZE + size) as f64 * f64::from(header.sample_rate());
                (bits / (1000.0 * samples_per_frame as f64)).round() as u32
            })
        } else {
            header.bitrate_kbps()
        };
        let tag = self.vbr_tag.as_ref();
        let total_frames = tag.and_then(|t| t.frames);
        Some(StreamInfo {
            version: header.version,
            layer: header.layer,
            channels: header.channels(),
            sample_rate: header.sample_rate(),
            mode: header.mode,
            mode_ext: header.mode_ext,
            samples_per_frame,
            bitrate_kbps,
            free_format: header.is_free_format(),
            total_frames,
            total_samples: total_frames.map(|n| u64::from(n) * samples_per_frame as u64),
            enc_delay: tag.and_then(|t| t.enc_delay),
            enc_padding: tag.and_then(|t| t.enc_padding),
        })
    }

    /// 喂入一次, 然后以空输入反复调用直到不再有进展, 收集全部解码结果
    ///
    /// 比特储备库下溢的帧被跳过, 其余错误直接返回.
    pub fn decode_frames(&mut self, input: &[u8]) -> MpaResult<DecodedPcm> {
        let mut pcm = DecodedPcm::default();
        let mut buf = vec![0i16; MAX_FRAME_SAMPLES];
        let mut feed = input;
        loop {
            let expected_len = self.queue.len() + feed.len();
            let stage = self.stage;
            let result = self.decode(feed, &mut buf);
            feed = &[];
            match result {
                Ok(DecodeStatus::Decoded { samples, channels, .. }) => {
                    if let Some(header) = &self.header {
                        pcm.sample_rate = header.sample_rate();
                    }
                    pcm.push_interleaved(&buf, samples, channels);
                }
                Ok(DecodeStatus::NeedMore) => {
                    if self.queue.len() == expected_len && self.stage == stage {
                        break;
                    }
                }
                Err(MpaError::ReservoirUnderflow { backstep, .. }) => {
                    debug!("跳过无法回退 {backstep} 字节的帧");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(pcm)
    }

    fn run<T: PcmSample>(&mut self, input: &[u8], out: &mut [T]) -> MpaResult<DecodeStatus> {
        if out.len() < MAX_FRAME_SAMPLES {
            return Err(MpaError::OutputTooSmall {
                required: MAX_FRAME_SAMPLES,
                actual: out.len(),
            });
        }
        self.queue.feed(input);

        if self.stage == FrameStage::AwaitHeader && !self.read_header()? {
            return Ok(DecodeStatus::NeedMore);
        }
        if self.stage == FrameStage::AwaitSideInfo && !self.read_side_info()? {
            return Ok(DecodeStatus::NeedMore);
        }
        let mut status = DecodeStatus::NeedMore;
        if self.stage == FrameStage::AwaitMainData {
            if !self.read_main_data()? {
                return Ok(DecodeStatus::NeedMore);
            }
            let clipped = self.subbands.render(&mut self.synth, out);
            if T::FORMAT.is_clipped() {
                self.stats.clipped_samples += clipped as u64;
            }
            self.stats.frames_decoded += 1;
            status = DecodeStatus::Decoded {
                samples: self.subbands.samples_per_channel(),
                channels: self.subbands.channels,
                format: T::FORMAT,
            };
        }
        self.finish_frame()?;
        Ok(status)
    }

    fn current_header(&self) -> MpaResult<FrameHeader> {
        self.header
            .ok_or_else(|| MpaError::Internal("帧头尚未解析".to_string()))
    }

    /// 帧头阶段, 返回是否继续解析本帧
    fn read_header(&mut self) -> MpaResult<bool> {
        let fresh = self.fsizeold.is_none() || self.sync_bitstream;
        let bytes = if fresh {
            let Some(bytes) = sync_buffer(&self.queue, None, None) else {
                self.discard_unsynced();
                return Ok(false);
            };
            if self.options.detect_vbr_tag {
                if self.queue.len() < bytes + VBR_TAG_WINDOW {
                    return Ok(false);
                }
                if let Some(tag) = check_vbr_header(&self.queue, bytes, self.vbr_parser.as_ref()) {
                    if self.queue.len() < bytes + tag.header_size {
                        return Ok(false);
                    }
                    // 标签帧不含音频
                    self.queue.consume(bytes + tag.header_size)?;
                    self.stats.vbr_tags_skipped += 1;
                    self.vbr_tag = Some(tag);
                    return Ok(false);
                }
            }
            self.sync_bitstream = false;
            bytes
        } else {
            let last = self.current_header()?;
            let signature = StreamSignature::from_raw(last.raw);
            let consistency = self.old_free_format.then_some(&signature);
            let Some(bytes) = sync_buffer(&self.queue, Some(last.layer), consistency) else {
                self.discard_unsynced();
                return Ok(false);
            };
            bytes
        };

        if bytes > 0 {
            warn!("码流不连续, 跳过 {bytes} 字节后重新同步");
            self.old_free_format = false;
            self.sync_bitstream = true;
            self.stats.resyncs += 1;
            self.stats.skipped_bytes += bytes as u64;
            // 跳过的字节仍可能被下一帧的 main_data_begin 引用
            let keep = bytes.min(self.reservoir.free_space());
            self.queue.consume(bytes - keep)?;
            self.reservoir.fill_from_queue(&mut self.queue, keep)?;
        }

        let raw = self.queue.read_u32_be()?;
        let header = match FrameHeader::decode(raw) {
            Ok(header) => header,
            Err(err) => {
                warn!("跳过无法解码的帧头 {raw:#010x}: {err}");
                self.stats.unsupported_headers += 1;
                self.sync_bitstream = true;
                return Ok(false);
            }
        };

        self.framesize = header.frame_size;
        self.free_format = header.is_free_format();
        self.ssize = if header.layer == Layer::Layer3 {
            header.side_info_size()
        } else {
            0
        };
        self.header = Some(header);
        self.stage = FrameStage::AwaitSideInfo;
        self.reservoir.toggle(self.fsizeold.is_some());

        // 第一帧只解析帧头
        Ok(self.fsizeold.is_some())
    }

    /// 找不到帧头时丢弃队列中除最后 3 字节外的数据
    fn discard_unsynced(&mut self) {
        let len = self.queue.len();
        if len > HEADER_SIZE - 1 {
            let dropped = len - (HEADER_SIZE - 1);
            if self.queue.consume(dropped).is_ok() {
                warn!("未找到帧头, 丢弃 {dropped} 字节");
                self.stats.skipped_bytes += dropped as u64;
            }
        }
    }

    /// 侧信息阶段
    fn read_side_info(&mut self) -> MpaResult<bool> {
        let header = self.current_header()?;
        if header.layer != Layer::Layer3 {
            if self.queue.len() < self.framesize {
                return Ok(false);
            }
            self.dsize = self.framesize;
            self.stage = FrameStage::AwaitMainData;
            return Ok(true);
        }

        if self.queue.len() < self.ssize {
            return Ok(false);
        }
        let start = self.reservoir.frame_start();
        self.reservoir.fill_from_queue(&mut self.queue, self.ssize)?;
        let active = self.reservoir.active();
        let mut reader = BitReader::new_at(active, start);
        let crc = header.crc_present.then(|| reader.get_bits(16));
        self.side = SideInfo::decode(&mut reader, &header);

        if let Some(expected) = crc {
            if self.options.verify_crc {
                let head = [(header.raw >> 8) as u8, header.raw as u8];
                let computed = crc16_update(
                    crc16_update(MPEG_CRC16_INIT, &head),
                    &active[start + 2..start + self.ssize],
                );
                if u32::from(computed) != expected {
                    warn!("CRC 校验失败: 期望 {expected:#06x}, 计算得 {computed:#06x}");
                    self.stats.crc_mismatches += 1;
                }
            }
        }

        let bits = self.side.frame_data_bits().max(0) as usize;
        self.dsize = bits.div_ceil(8);
        if !self.free_format {
            let limit = self.framesize.saturating_sub(self.ssize);
            if self.dsize > limit {
                warn!("主数据长度 {} 超过帧剩余 {limit} 字节, 已截断", self.dsize);
                self.dsize = limit;
            }
        }
        self.stage = FrameStage::AwaitMainData;
        Ok(true)
    }

    /// 主数据阶段: 解码到子带样本缓冲
    fn read_main_data(&mut self) -> MpaResult<bool> {
        if self.queue.len() < self.dsize {
            return Ok(false);
        }
        let header = self.current_header()?;
        self.reservoir.fill_from_queue(&mut self.queue, self.dsize)?;
        let select = self.options.channel_select;

        if header.layer == Layer::Layer3 {
            let data_start = self.reservoir.frame_start() + self.ssize;
            let backstep = match self.reservoir.set_pointer(data_start, self.side.main_data_begin) {
                Ok(backstep) => backstep,
                Err(err) => {
                    warn!("{err}, 丢弃本帧");
                    self.stats.reservoir_underflows += 1;
                    self.stage = FrameStage::FrameComplete;
                    self.finish_frame()?;
                    return Err(err);
                }
            };
            if backstep.zero_filled > 0 {
                self.stats.reservoir_underflows += 1;
            }
            let mut reader = BitReader::new_at(self.reservoir.active(), backstep.start);
            let report = self.layer3.decode_frame(
                &mut reader,
                &header,
                &mut self.side,
                select,
                &mut self.subbands,
            );
            self.stats.huffman_overruns += u64::from(report.huffman_overruns);
            warn_on_overrun(&reader);
        } else {
            let mut reader = BitReader::new_at(self.reservoir.active(), self.reservoir.frame_start());
            if header.crc_present {
                reader.skip_bits(16);
            }
            if header.layer == Layer::Layer1 {
                layer1::decode(&mut reader, &header, &mut self.subbands);
            } else {
                layer2::decode(&mut reader, &header, &mut self.subbands);
            }
            warn_on_overrun(&reader);
            select_channels(&mut self.subbands, select);
        }

        self.stage = FrameStage::FrameComplete;
        Ok(true)
    }

    /// 附加数据阶段: 缓存帧尾字节供下一帧回退, 完成后进入下一帧
    fn finish_frame(&mut self) -> MpaResult<()> {
        if self.stage != FrameStage::FrameComplete {
            return Ok(());
        }
        let header = self.current_header()?;
        if self.free_format {
            if self.old_free_format {
                self.framesize = self.fsizeold_nopadding + usize::from(header.padding);
            } else {
                let signature = StreamSignature::from_raw(header.raw);
                let Some(bytes) = sync_buffer(&self.queue, Some(header.layer), Some(&signature))
                else {
                    return Ok(());
                };
                self.framesize = bytes + self.ssize + self.dsize;
                self.fsizeold_nopadding = self.framesize - usize::from(header.padding);
                debug!("自由格式帧长 {} 字节", self.framesize + HEADER_SIZE);
            }
        }

        let mut bytes = self.framesize.saturating_sub(self.ssize + self.dsize);
        if bytes > self.queue.len() {
            return Ok(());
        }
        if bytes > MAX_ANCILLARY_BYTES {
            let excess = bytes - MAX_ANCILLARY_BYTES;
            self.queue.consume(excess)?;
            self.framesize -= excess;
            bytes = MAX_ANCILLARY_BYTES;
        }
        self.reservoir.fill_from_queue(&mut self.queue, bytes)?;

        self.fsizeold = Some(self.framesize);
        self.old_free_format = self.free_format;
        self.framesize = 0;
        self.stage = FrameStage::AwaitHeader;
        Ok(())
    }
}

fn warn_on_overrun(reader: &BitReader) {
    if reader.overrun() {
        warn!("帧数据读取越过已缓冲的末尾, 越界位按 0 处理");
    }
}

/// 一次性解码完整的码流
pub fn decode_all(data: &[u8]) -> MpaResult<DecodedPcm> {
    MpaDecoder::default().decode_frames(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_buffer_too_small() {
        let mut decoder = MpaDecoder::default();
        let mut out = [0i16; 100];
        let err = decoder.decode(&[0xFF, 0xFB], &mut out).unwrap_err();
        assert!(matches!(
            err,
            MpaError::OutputTooSmall {
                required: MAX_FRAME_SAMPLES,
                actual: 100
            }
        ));
        // 输入未被接收
        assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn test_garbage_is_discarded_but_tail_kept() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut decoder = MpaDecoder::default();
        let mut out = vec![0i16; MAX_FRAME_SAMPLES];
        let status = decoder.decode(&[0u8; 100], &mut out).unwrap();
        assert_eq!(status, DecodeStatus::NeedMore);
        assert_eq!(decoder.buffered_len(), 3);
        assert_eq!(decoder.stats().skipped_bytes, 97);
        assert_eq!(decoder.stage(), FrameStage::AwaitHeader);
        assert!(decoder.stream_info().is_none());
    }

    #[test]
    fn test_stage_flags() {
        let mut decoder = MpaDecoder::default();
        assert!(!decoder.header_parsed());
        decoder.stage = FrameStage::AwaitMainData;
        assert!(decoder.header_parsed());
        assert!(decoder.side_parsed());
        assert!(!decoder.data_parsed());
        decoder.reset();
        assert_eq!(decoder.stage(), FrameStage::AwaitHeader);
    }

    #[test]
    fn test_decoded_pcm_deinterleaves() {
        let mut pcm = DecodedPcm::default();
        pcm.push_interleaved(&[1, -1, 2, -2, 3, -3, 9, 9], 3, 2);
        assert_eq!(pcm.channels, vec![vec![1, 2, 3], vec![-1, -2, -3]]);
        assert_eq!(pcm.samples_per_channel(), 3);
    }
}
