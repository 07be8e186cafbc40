//! # yan-player
//!
//! Yan 解码准确性验证框架的解码驱动.
//!
//! [`SimplePlayer`] 持有一对解封装器 + 解码器, 以短超时轮询的方式驱动
//! 入队/出队循环, 按调用方给出的帧间隔控制输出节奏,
//! 并以结构化的 [`PlayerResult`] 报告结果. 任何阶段的失败都不会 panic,
//! 也不会向调用方抛出, 资源总是被释放且只释放一次.
//!
//! ## 使用示例
//!
//! ```rust
//! use std::sync::Arc;
//! use yan_codec::CodecRegistry;
//! use yan_codec::soft::{MemoryAssets, MemoryTrack};
//! use yan_format::VideoFormat;
//! use yan_player::{PlayerConfig, SimplePlayer};
//!
//! let mut registry = CodecRegistry::new();
//! yan_codec::register_all(&mut registry);
//!
//! let frames = vec![vec![128u8; 6]; 3];
//! let mut assets = MemoryAssets::new();
//! assets.insert("gray-raw_2x2_30fps.yuv", vec![MemoryTrack::raw_video(2, 2, frames, 30).unwrap()]);
//!
//! let mut player = SimplePlayer::new(Arc::new(registry), Arc::new(assets), PlayerConfig::default());
//! let format = VideoFormat::new("gray-raw_2x2_30fps.yuv");
//! let result = player.decode_video_frames(None, &format, 3, 0);
//! assert!(result.is_success(), "{}", result.failure_message());
//! ```

pub mod config;
pub mod pacing;
pub mod platform;
pub mod player;
pub mod result;
pub mod state;

#[cfg(test)]
mod testing;

// 重导出常用类型
pub use config::PlayerConfig;
pub use pacing::FramePacer;
pub use platform::{BufferAccess, PlatformQuirks};
pub use player::SimplePlayer;
pub use result::PlayerResult;
pub use state::PlayerState;
