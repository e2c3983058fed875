//! CRC 校验和计算.
//!
//! MPEG 音频帧的可选 CRC-16 (多项式 0x8005, 初始值 0xFFFF, 高位在前).
//! 校验范围为帧头第 3、4 字节加上 Layer III 边信息.

/// CRC-16 查找表 (多项式 0x8005)
const CRC16_TABLE: [u16; 256] = {
    let mut table = [0u16; 256];
    let mut i = 0u16;
    while i < 256 {
        let mut crc = i << 8;
        let mut j = 0;
        while j < 8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x8005;
            } else {
                crc <<= 1;
            }
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
};

/// MPEG 音频 CRC-16 初始值
pub const MPEG_CRC16_INIT: u16 = 0xFFFF;

/// 增量计算 CRC-16
///
/// 以 `crc` 为当前状态继续累加 `data`, 便于分段喂入帧头和边信息.
pub fn crc16_update(mut crc: u16, data: &[u8]) -> u16 {
    for &byte in data {
        crc = (crc << 8) ^ CRC16_TABLE[((crc >> 8) as u8 ^ byte) as usize];
    }
    crc
}

/// 计算 MPEG 音频 CRC-16
pub fn mpeg_crc16(data: &[u8]) -> u16 {
    crc16_update(MPEG_CRC16_INIT, data)
}
