//! MPEG 音频解码各阶段实现

pub mod alias;
pub mod bit_reservoir;
pub mod bitreader;
pub mod byte_queue;
pub mod decoder;
pub mod header;
pub mod huffman;
pub mod imdct;
pub mod layer1;
pub mod layer12;
pub mod layer2;
pub mod layer3;
pub mod requantize;
pub mod scalefac;
pub mod side_info;
pub mod stereo;
pub mod sync;
pub mod synthesis;
pub mod tables;
pub mod vbr_tag;
