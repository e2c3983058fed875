//! Layer III 帧解码
//!
//! 逐 granule、逐声道完成比例因子与 Huffman 解码和反量化, 然后做立体声重建、
//! 声道选择、抗混叠与混合滤波, 结果写入子带样本缓冲等待合成.

use log::warn;

use super::alias::antialias;
use super::bitreader::BitReader;
use super::decoder::ChannelSelect;
use super::header::FrameHeader;
use super::huffman::{GRANULE_LINES, decode_spectrum};
use super::imdct::{HybridFilter, HybridOutput, SUBBAND_SAMPLES, SUBBANDS};
use super::requantize::{MIX_GAIN_OFFSET, MS_GAIN_OFFSET, dequantize};
use super::scalefac::{SCALEFAC_LEN, Scalefactors, read_lsf, read_mpeg1};
use super::side_info::SideInfo;
use super::stereo::{
    Downmix, IntensityParams, downmix, intensity_stereo, locate_intensity_bands, ms_stereo,
};
use super::synthesis::SubbandSamples;

/// 一帧 Layer III 解码中就地容错的计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layer3Report {
    /// 超出 part2_3_length 的 granule 数
    pub huffman_overruns: u32,
}

/// Layer III 解码状态: 跨帧的混合滤波重叠缓冲与可复用的工作区
#[derive(Debug, Clone)]
pub struct Layer3Decoder {
    hybrid: [HybridFilter; 2],
    /// MPEG-1 第二个 granule 可能复用第一个的比例因子
    scalefactors: [Scalefactors; 2],
    quantized: [i32; GRANULE_LINES],
    spectrum: [[f32; GRANULE_LINES]; 2],
    hybrid_out: HybridOutput,
}

impl Default for Layer3Decoder {
    fn default() -> Self {
        Self {
            hybrid: [HybridFilter::new(), HybridFilter::new()],
            scalefactors: [[0; SCALEFAC_LEN]; 2],
            quantized: [0; GRANULE_LINES],
            spectrum: [[0.0; GRANULE_LINES]; 2],
            hybrid_out: [[0.0; SUBBANDS]; SUBBAND_SAMPLES],
        }
    }
}

impl Layer3Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 解码一帧主数据. `reader` 已定位到比特储备库中本帧主数据的起点.
    pub fn decode_frame(
        &mut self,
        reader: &mut BitReader,
        header: &FrameHeader,
        side: &mut SideInfo,
        select: ChannelSelect,
        out: &mut SubbandSamples,
    ) -> Layer3Report {
        let mut report = Layer3Report::default();
        let channels = side.channels;
        let stereo = channels == 2;
        let ms = stereo && header.is_ms_stereo();
        let intensity = stereo && header.is_intensity_stereo();
        let mix = if stereo {
            match select {
                ChannelSelect::Stereo | ChannelSelect::Left => None,
                ChannelSelect::Right => Some(Downmix::Right),
                ChannelSelect::Mix => Some(Downmix::Mix),
            }
        } else {
            None
        };
        let out_channels = if stereo && select == ChannelSelect::Stereo { 2 } else { 1 };
        let gain_offset = if ms { MS_GAIN_OFFSET } else { 0 }
            + if mix == Some(Downmix::Mix) { MIX_GAIN_OFFSET } else { 0 };

        out.channels = out_channels;
        out.slots = side.granules * SUBBAND_SAMPLES;

        for gr in 0..side.granules {
            for ch in 0..channels {
                let part2_start = reader.bit_offset();
                let mut info = side.gr[gr][ch];
                let scf = &mut self.scalefactors[ch];
                let part2_bits = if header.lsf {
                    read_lsf(reader, &mut info, intensity && ch == 1, scf)
                } else {
                    let scfsi = (gr > 0).then_some(side.scfsi[ch]);
                    read_mpeg1(reader, &info, scfsi, scf)
                };
                debug_assert_eq!(reader.bit_offset() - part2_start, part2_bits as usize);
                side.gr[gr][ch] = info;

                let end_bit = part2_start + info.part2_3_length as usize;
                let outcome = decode_spectrum(reader, &info, end_bit, &mut self.quantized);
                if outcome.overrun_bits > 0 {
                    report.huffman_overruns += 1;
                }
                dequantize(
                    &self.quantized,
                    &info,
                    scf,
                    header.sfreq,
                    header.lsf,
                    gain_offset,
                    &mut self.spectrum[ch],
                );
            }

            if stereo {
                let [left, right] = &mut self.spectrum;
                let params = IntensityParams {
                    info: &side.gr[gr][1],
                    scf: &self.scalefactors[1],
                    sfreq: header.sfreq,
                    lsf: header.lsf,
                    ms_stereo: ms,
                };
                let bands = intensity.then(|| locate_intensity_bands(right, &params));
                if ms {
                    ms_stereo(left, right);
                }
                if let Some(bands) = &bands {
                    intensity_stereo(left, right, &params, bands);
                }
                if let Some(mode) = mix {
                    downmix(left, right, mode);
                }
            }

            for ch in 0..out_channels {
                let info = if mix == Some(Downmix::Right) {
                    &side.gr[gr][1]
                } else {
                    &side.gr[gr][ch]
                };
                antialias(info, &mut self.spectrum[ch]);
                self.hybrid[ch].transform(info, &self.spectrum[ch], &mut self.hybrid_out);
                let base = gr * SUBBAND_SAMPLES;
                out.data[ch][base..base + SUBBAND_SAMPLES].copy_from_slice(&self.hybrid_out);
            }
        }

        if report.huffman_overruns > 0 {
            warn!(
                "本帧 {} 个 granule 的 Huffman 数据超出 part2_3_length",
                report.huffman_overruns
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo_header() -> FrameHeader {
        // MPEG-1 Layer III 128 kbps 44.1 kHz 联合立体声 (M/S), 无 CRC
        FrameHeader::decode(0xFFFB_9060).unwrap()
    }

    #[test]
    fn test_zero_granules_decode_to_silence() {
        let header = stereo_header();
        assert!(header.is_ms_stereo());
        let mut side = SideInfo {
            granules: 2,
            channels: 2,
            ..Default::default()
        };
        for gr in 0..2 {
            for ch in 0..2 {
                side.gr[gr][ch].global_gain = 210;
            }
        }
        let data = [0u8; 64];
        let mut reader = BitReader::new(&data);
        let mut decoder = Layer3Decoder::new();
        let mut out = SubbandSamples::default();
        let report =
            decoder.decode_frame(&mut reader, &header, &mut side, ChannelSelect::Stereo, &mut out);
        assert_eq!(report, Layer3Report::default());
        assert_eq!(out.channels, 2);
        assert_eq!(out.slots, 36);
        assert!(out.data.iter().flatten().flatten().all(|&v| v == 0.0));
        assert_eq!(reader.bit_offset(), 0);
    }

    #[test]
    fn test_channel_select_reduces_output() {
        let header = stereo_header();
        let mut side = SideInfo {
            granules: 2,
            channels: 2,
            ..Default::default()
        };
        let data = [0u8; 8];
        let mut decoder = Layer3Decoder::new();
        let mut out = SubbandSamples::default();
        for select in [ChannelSelect::Left, ChannelSelect::Right, ChannelSelect::Mix] {
            let mut reader = BitReader::new(&data);
            decoder.decode_frame(&mut reader, &header, &mut side, select, &mut out);
            assert_eq!(out.channels, 1);
        }
    }

    #[test]
    fn test_overrun_is_reported() {
        let header = stereo_header();
        let mut side = SideInfo {
            granules: 2,
            channels: 2,
            ..Default::default()
        };
        // scalefac_compress 15: slen 4/3, 长块比例因子共 11*4 + 10*3 = 74 位 > 10
        side.gr[0][0].scalefac_compress = 15;
        side.gr[0][0].part2_3_length = 10;
        let data = [0xFFu8; 32];
        let mut reader = BitReader::new(&data);
        let mut decoder = Layer3Decoder::new();
        let mut out = SubbandSamples::default();
        let report =
            decoder.decode_frame(&mut reader, &header, &mut side, ChannelSelect::Stereo, &mut out);
        assert_eq!(report.huffman_overruns, 1);
    }
}
