//! Layer III 侧信息解析

use log::warn;

use super::bitreader::BitReader;
use super::header::FrameHeader;
use super::tables::LONG_BAND_BOUNDS;

/// big_values 上限 (576 / 2)
pub const MAX_BIG_VALUES: u32 = 288;

/// 块类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockType {
    #[default]
    Normal,
    Start,
    Short,
    Stop,
}

impl BlockType {
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Self::Normal,
            1 => Self::Start,
            2 => Self::Short,
            _ => Self::Stop,
        }
    }
}

/// 单个 granule 单声道的侧信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GranuleInfo {
    pub part2_3_length: u32,
    pub big_values: u32,
    pub global_gain: u32,
    pub scalefac_compress: u32,
    pub window_switching: bool,
    pub block_type: BlockType,
    pub mixed_block: bool,
    pub table_select: [u8; 3],
    pub subblock_gain: [u8; 3],
    /// region1 起始谱线
    pub region1_start: usize,
    /// region2 起始谱线
    pub region2_start: usize,
    pub preflag: bool,
    pub scalefac_scale: bool,
    pub count1_table: bool,
}

impl GranuleInfo {
    pub fn is_short(&self) -> bool {
        self.block_type == BlockType::Short
    }

    pub fn is_pure_short(&self) -> bool {
        self.is_short() && !self.mixed_block
    }
}

/// 一帧的侧信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideInfo {
    /// 比特储备回退字节数
    pub main_data_begin: usize,
    pub private_bits: u32,
    /// 每声道 scfsi (仅 MPEG-1)
    pub scfsi: [u8; 2],
    pub granules: usize,
    pub channels: usize,
    /// [granule][channel]
    pub gr: [[GranuleInfo; 2]; 2],
    /// 就地修正的损坏字段数
    pub corrections: u32,
}

impl SideInfo {
    /// 解析侧信息 (调用方已跳过 CRC 校验字)
    pub fn decode(reader: &mut BitReader, header: &FrameHeader) -> Self {
        if header.lsf {
            Self::decode_lsf(reader, header)
        } else {
            Self::decode_mpeg1(reader, header)
        }
    }

    fn decode_mpeg1(reader: &mut BitReader, header: &FrameHeader) -> Self {
        let channels = header.channels();
        let mut si = SideInfo {
            main_data_begin: reader.get_bits(9) as usize,
            private_bits: reader.get_bits_fast(if channels == 1 { 5 } else { 3 }),
            granules: 2,
            channels,
            ..Default::default()
        };
        for ch in 0..channels {
            si.scfsi[ch] = reader.get_bits_fast(4) as u8;
        }
        for gr in 0..2 {
            for ch in 0..channels {
                let info = read_granule(reader, header, false, &mut si.corrections);
                si.gr[gr][ch] = info;
            }
        }
        si
    }

    fn decode_lsf(reader: &mut BitReader, header: &FrameHeader) -> Self {
        let channels = header.channels();
        let mut si = SideInfo {
            main_data_begin: reader.get_bits_fast(8) as usize,
            private_bits: reader.get_bits_fast(if channels == 1 { 1 } else { 2 }),
            granules: 1,
            channels,
            ..Default::default()
        };
        for ch in 0..channels {
            let info = read_granule(reader, header, true, &mut si.corrections);
            si.gr[0][ch] = info;
        }
        si
    }

    /// 本帧 main_data 的总位数减去回退部分, 可能为负 (全部数据都在储备库中)
    pub fn frame_data_bits(&self) -> i64 {
        let total: i64 = self.gr[..self.granules]
            .iter()
            .flat_map(|g| g[..self.channels].iter())
            .map(|info| i64::from(info.part2_3_length))
            .sum();
        total - 8 * self.main_data_begin as i64
    }
}

fn read_granule(
    reader: &mut BitReader,
    header: &FrameHeader,
    lsf: bool,
    corrections: &mut u32,
) -> GranuleInfo {
    let mut info = GranuleInfo {
        part2_3_length: reader.get_bits(12),
        big_values: reader.get_bits_fast(9),
        ..Default::default()
    };
    if info.big_values > MAX_BIG_VALUES {
        warn!("big_values {} 超出上限, 截断为 {}", info.big_values, MAX_BIG_VALUES);
        info.big_values = MAX_BIG_VALUES;
        *corrections += 1;
    }
    info.global_gain = reader.get_bits_fast(8);
    info.scalefac_compress = reader.get_bits_fast(if lsf { 9 } else { 4 });

    if reader.get1bit() == 1 {
        info.window_switching = true;
        info.block_type = BlockType::from_bits(reader.get_bits_fast(2));
        info.mixed_block = reader.get1bit() == 1;
        info.table_select[0] = reader.get_bits_fast(5) as u8;
        info.table_select[1] = reader.get_bits_fast(5) as u8;
        for gain in &mut info.subblock_gain {
            *gain = reader.get_bits_fast(3) as u8;
        }
        if info.block_type == BlockType::Normal {
            warn!("窗口切换标志置位但块类型为 0");
            *corrections += 1;
        }
        // 区域边界在窗口切换时隐含给出
        info.region1_start = if !lsf {
            36
        } else if info.block_type == BlockType::Short {
            if header.sfreq == 8 { 72 } else { 36 }
        } else if header.sfreq == 8 {
            108
        } else {
            54
        };
        info.region2_start = 576;
    } else {
        for sel in &mut info.table_select {
            *sel = reader.get_bits_fast(5) as u8;
        }
        let r0c = reader.get_bits_fast(4) as usize;
        let r1c = reader.get_bits_fast(3) as usize;
        let mut region0_index = r0c + 1;
        if region0_index > 22 {
            warn!("region0 索引 {} 超出范围", region0_index);
            region0_index = 22;
            *corrections += 1;
        }
        let mut region1_index = r0c + 1 + r1c + 1;
        if region1_index > 22 {
            warn!("region1 索引 {} 超出范围", region1_index);
            region1_index = 22;
            *corrections += 1;
        }
        let bounds = &LONG_BAND_BOUNDS[header.sfreq];
        info.region1_start = bounds[region0_index];
        info.region2_start = bounds[region1_index];
    }

    if !lsf {
        info.preflag = reader.get1bit() == 1;
    }
    info.scalefac_scale = reader.get1bit() == 1;
    info.count1_table = reader.get1bit() == 1;
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpa_core::BitWriter;

    fn stereo_header() -> FrameHeader {
        FrameHeader::decode(0xFFFB_9004).unwrap()
    }

    fn write_long_granule(w: &mut BitWriter, part23: u32, big_values: u32, r0c: u32, r1c: u32) {
        w.write_bits(part23, 12);
        w.write_bits(big_values, 9);
        w.write_bits(210, 8);
        w.write_bits(0, 4);
        w.write_bit(0);
        w.write_bits(1, 5);
        w.write_bits(2, 5);
        w.write_bits(3, 5);
        w.write_bits(r0c, 4);
        w.write_bits(r1c, 3);
        w.write_bits(0b010, 3);
    }

    #[test]
    fn test_decode_mpeg1_stereo_long() {
        let header = stereo_header();
        let mut w = BitWriter::new();
        w.write_bits(100, 9);
        w.write_bits(0, 3);
        w.write_bits(0b1010, 4);
        w.write_bits(0b0101, 4);
        for _ in 0..4 {
            write_long_granule(&mut w, 500, 100, 7, 7);
        }
        let data = w.finish();
        assert_eq!(data.len(), 32);

        let mut reader = BitReader::new(&data);
        let si = SideInfo::decode(&mut reader, &header);
        assert_eq!(reader.bit_offset(), 256);
        assert_eq!(si.main_data_begin, 100);
        assert_eq!(si.scfsi, [0b1010, 0b0101]);
        let g = si.gr[1][1];
        assert_eq!(g.part2_3_length, 500);
        assert_eq!(g.table_select, [1, 2, 3]);
        assert_eq!(g.region1_start, LONG_BAND_BOUNDS[0][8]);
        assert_eq!(g.region2_start, LONG_BAND_BOUNDS[0][16]);
        assert!(g.scalefac_scale);
        assert!(!g.preflag);
        assert_eq!(si.frame_data_bits(), 4 * 500 - 800);
    }

    #[test]
    fn test_big_values_and_regions_clamped() {
        let header = stereo_header();
        let mut w = BitWriter::new();
        w.write_bits(0, 9 + 3 + 8);
        for _ in 0..4 {
            write_long_granule(&mut w, 0, 400, 15, 7);
        }
        let data = w.finish();
        let mut reader = BitReader::new(&data);
        let si = SideInfo::decode(&mut reader, &header);
        let g = si.gr[0][0];
        assert_eq!(g.big_values, MAX_BIG_VALUES);
        assert_eq!(g.region1_start, LONG_BAND_BOUNDS[0][16]);
        assert_eq!(g.region2_start, 576);
        assert_eq!(si.corrections, 8);
    }

    #[test]
    fn test_decode_lsf_short_block() {
        // MPEG-2 Layer III 64k 22.05k 单声道
        let header = FrameHeader::decode(0xFFF3_80C4).unwrap();
        assert!(header.lsf);
        let mut w = BitWriter::new();
        w.write_bits(17, 8);
        w.write_bits(1, 1);
        w.write_bits(321, 12);
        w.write_bits(50, 9);
        w.write_bits(180, 8);
        w.write_bits(300, 9);
        w.write_bit(1);
        w.write_bits(2, 2);
        w.write_bit(1);
        w.write_bits(5, 5);
        w.write_bits(6, 5);
        w.write_bits(1, 3);
        w.write_bits(2, 3);
        w.write_bits(3, 3);
        w.write_bits(0b01, 2);
        let data = w.finish();
        assert_eq!(data.len(), 9);

        let mut reader = BitReader::new(&data);
        let si = SideInfo::decode(&mut reader, &header);
        assert_eq!(si.granules, 1);
        assert_eq!(si.main_data_begin, 17);
        let g = si.gr[0][0];
        assert_eq!(g.scalefac_compress, 300);
        assert!(g.is_short() && g.mixed_block);
        assert_eq!(g.subblock_gain, [1, 2, 3]);
        assert_eq!(g.region1_start, 36);
        assert_eq!(g.region2_start, 576);
        assert!(!g.scalefac_scale);
        assert!(g.count1_table);
    }
}
