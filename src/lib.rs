//! # Yan (验)
//!
//! 纯 Rust 实现的视频解码准确性验证框架.
//!
//! 把一段视频素材按要求的尺寸解码若干帧, 再把解码输出与参考图像做感知比较:
//! - **格式描述**: 从素材文件名推导编码与尺寸, 记录自适应码率的最大尺寸
//! - **解码驱动**: 输入/输出缓冲区交替轮询, 帧间隔控制, 超时与资源释放
//! - **帧差比较**: sRGB → L\*a\*b\* 最大像素差异, 容忍亚像素偏移
//!
//! # 快速开始
//!
//! ```rust
//! use std::sync::Arc;
//! use yan::codec::soft::{MemoryAssets, MemoryTrack};
//! use yan::format::VideoFormat;
//! use yan::player::{PlayerConfig, SimplePlayer};
//!
//! let mut assets = MemoryAssets::new();
//! let frames = vec![vec![128u8; 6]; 2];
//! assets.insert(
//!     "gray-raw_2x2_30fps.yuv",
//!     vec![MemoryTrack::raw_video(2, 2, frames, 30).unwrap()],
//! );
//!
//! let registry = Arc::new(yan::default_codec_registry());
//! let format = VideoFormat::new("gray-raw_2x2_30fps.yuv");
//! let mut player = SimplePlayer::new(registry, Arc::new(assets), PlayerConfig::default());
//! let result = player.decode_video_frames(None, &format, 2, 0);
//! assert!(result.is_success());
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `yan-core` | 错误、媒体类型、像素格式、位图 |
//! | `yan-codec` | 解码器/解封装器抽象与软件实现 |
//! | `yan-format` | 视频格式描述与文件名解析 |
//! | `yan-player` | 解码驱动 |
//! | `yan-compare` | 感知帧差比较 |

pub mod logging;

/// 核心类型与工具
pub use yan_core as core;

/// 解码器与解封装器抽象
pub use yan_codec as codec;

/// 视频格式描述
pub use yan_format as format;

/// 解码驱动
pub use yan_player as player;

/// 帧差比较
pub use yan_compare as compare;

/// 获取 Yan 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 创建已注册所有内置解码器的注册表
pub fn default_codec_registry() -> yan_codec::CodecRegistry {
    let mut registry = yan_codec::CodecRegistry::new();
    yan_codec::register_all(&mut registry);
    registry
}
