//! # yan-core
//!
//! Yan 解码准确性验证框架核心库, 提供基础类型定义、错误处理和工具函数.
//!
//! 本 crate 为解码驱动 (`yan-player`) 与帧差比较器 (`yan-compare`) 提供共用的底层基础设施:
//! 统一错误类型、媒体类型、MIME 常量、像素格式以及 ARGB 位图.

pub mod bitmap;
pub mod error;
pub mod media_type;
pub mod mime;
pub mod pixel_format;

// 重导出常用类型
pub use bitmap::{Bitmap, color};
pub use error::{YanError, YanResult};
pub use media_type::MediaType;
pub use pixel_format::PixelFormat;
