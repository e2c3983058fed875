//! Layer I/II 共用部分: 比例因子乘数、线性反量化、联合立体声边界与声道选择

use std::sync::OnceLock;

use super::decoder::ChannelSelect;
use super::header::{ChannelMode, FrameHeader};
use super::imdct::SUBBANDS;
use super::synthesis::SubbandSamples;

/// 非法比例因子索引, 乘数为 0
pub const INVALID_SCALEFACTOR: u8 = 63;

static SCALE_MULTIPLIERS: OnceLock<[f32; 64]> = OnceLock::new();

/// 比例因子索引 -> 2^(1 - i/3)
pub fn scale_multiplier(index: u8) -> f32 {
    let table = SCALE_MULTIPLIERS.get_or_init(|| {
        std::array::from_fn(|i| {
            if i == usize::from(INVALID_SCALEFACTOR) {
                0.0
            } else {
                (2.0f64 * 2f64.powf(-(i as f64) / 3.0)) as f32
            }
        })
    });
    table[usize::from(index & 63)]
}

/// 把 `steps` 级量化码值还原为 (-1, 1) 内的分数
#[inline]
pub fn dequantize(code: u32, steps: u32) -> f32 {
    (2.0 * code as f32 - (steps - 1) as f32) / steps as f32
}

/// 联合立体声边界: 该子带起两声道共享样本
pub fn joint_bound(header: &FrameHeader, sblimit: usize) -> usize {
    if header.mode == ChannelMode::JointStereo {
        ((usize::from(header.mode_ext) + 1) * 4).min(sblimit)
    } else {
        sblimit
    }
}

/// 立体声子带样本按声道选择缩减为单声道
pub fn select_channels(block: &mut SubbandSamples, select: ChannelSelect) {
    if block.channels != 2 {
        return;
    }
    match select {
        ChannelSelect::Stereo => return,
        ChannelSelect::Left => {}
        ChannelSelect::Right => block.data[0] = block.data[1],
        ChannelSelect::Mix => {
            let [left, right] = &mut block.data;
            for (l_slot, r_slot) in left.iter_mut().zip(right.iter()).take(block.slots) {
                for sb in 0..SUBBANDS {
                    l_slot[sb] = 0.5 * (l_slot[sb] + r_slot[sb]);
                }
            }
        }
    }
    block.channels = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_multiplier_table() {
        assert_eq!(scale_multiplier(0), 2.0);
        assert!((scale_multiplier(3) - 1.0).abs() < 1e-6);
        assert!((scale_multiplier(6) - 0.5).abs() < 1e-6);
        assert_eq!(scale_multiplier(INVALID_SCALEFACTOR), 0.0);
    }

    #[test]
    fn test_dequantize_is_symmetric() {
        assert_eq!(dequantize(1, 3), 0.0);
        assert!((dequantize(0, 3) + 2.0 / 3.0).abs() < 1e-6);
        assert!((dequantize(2, 3) - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(dequantize(3, 7), 0.0);
        assert_eq!(dequantize(0, 15), -dequantize(14, 15));
    }

    #[test]
    fn test_select_channels() {
        let mut block = SubbandSamples {
            channels: 2,
            slots: 1,
            ..Default::default()
        };
        block.data[0][0][0] = 1.0;
        block.data[1][0][0] = 3.0;

        let mut mixed = block.clone();
        select_channels(&mut mixed, ChannelSelect::Mix);
        assert_eq!(mixed.channels, 1);
        assert_eq!(mixed.data[0][0][0], 2.0);

        let mut right = block.clone();
        select_channels(&mut right, ChannelSelect::Right);
        assert_eq!(right.data[0][0][0], 3.0);

        let mut stereo = block;
        select_channels(&mut stereo, ChannelSelect::Stereo);
        assert_eq!(stereo.channels, 2);
    }
}
