//! 软件后端.
//!
//! - [`RawVideoCodec`]: 未压缩视频帧的直通解码器
//! - [`MemoryExtractor`] / [`MemoryAssets`]: 内存中的轨道与媒体源
//!
//! 不依赖任何平台解码器, 用于在纯软件环境下完整驱动解码管线.

mod memory;
mod raw_video;

pub use memory::{MemoryAssets, MemoryExtractor, MemorySample, MemoryTrack};
pub use raw_video::{RAW_DECODER_NAME, RawVideoCodec, raw_video_capabilities};

use yan_core::mime;

use crate::registry::CodecRegistry;

/// 注册所有软件解码器
pub fn register_soft_codecs(registry: &mut CodecRegistry) {
    registry.register_decoder(
        RAW_DECODER_NAME,
        mime::VIDEO_RAW,
        raw_video_capabilities(),
        RawVideoCodec::create,
    );
}
