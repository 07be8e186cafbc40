//! # yan-format
//!
//! Yan 解码准确性验证框架的视频格式描述库.
//!
//! 测试素材的文件名携带结构化信息 (`{描述}-{编码}_{宽}x{高}_{帧率}.{扩展名}`),
//! [`FilenameParser`] 负责解析它, [`VideoFormat`] 在解析值之上叠加调用方的显式覆盖,
//! 供解码驱动在准备阶段使用.

pub mod filename;
pub mod video_format;

// 重导出常用类型
pub use filename::FilenameParser;
pub use video_format::VideoFormat;

/// 未设置字段在字符串中的占位符
pub const STRING_UNSET: &str = "UNSET";
