//! # yan-codec
//!
//! Yan 解码准确性验证框架的编解码器库, 定义解码驱动所依赖的外部协作者接口.
//!
//! 外部解码器与解封装器以不透明句柄的形式出现, 本 crate 给出它们的 trait 形状:
//!
//! - [`MediaCodec`]: 基于缓冲区队列的解码器 (dequeue/queue 输入, dequeue/release 输出)
//! - [`MediaExtractor`]: 按轨道读取压缩样本的解封装器
//! - [`ExtractorSource`]: 按名称打开媒体源
//! - [`CodecRegistry`]: 按名称/类型创建解码器并查询能力
//!
//! 另提供 `soft` 软件后端 (内存解封装器 + RAW 直通解码器), 无需硬件平台即可驱动整条管线.
//!
//! ## 使用示例
//!
//! ```rust
//! use yan_codec::{CodecRegistry, MediaFormat};
//!
//! let mut reg = CodecRegistry::new();
//! yan_codec::register_all(&mut reg);
//!
//! let format = MediaFormat::new_video("video/raw", 64, 48);
//! let name = reg.find_decoder_for_format(&format).unwrap();
//! let decoder = reg.create_by_name(&name).unwrap();
//! assert_eq!(decoder.name(), "yan.raw.decoder");
//! ```

pub mod buffer;
pub mod capabilities;
pub mod codec;
pub mod extractor;
pub mod media_format;
pub mod registry;
pub mod soft;
pub mod surface;

// 重导出常用类型
pub use buffer::{BufferFlags, BufferInfo, OutputStatus};
pub use capabilities::{IntRange, VideoCapabilities};
pub use codec::MediaCodec;
pub use extractor::{ExtractorSource, MediaExtractor};
pub use media_format::MediaFormat;
pub use registry::CodecRegistry;
pub use surface::{RenderTarget, Surface};

/// 注册所有内置解码器
pub fn register_all(registry: &mut CodecRegistry) {
    soft::register_soft_codecs(registry);
}
