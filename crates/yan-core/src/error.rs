//! 统一错误类型定义.
//!
//! 所有 Yan crate 共用的错误类型, 支持跨模块传播.
//! 解码驱动在边界处把这些错误折叠为结构化结果, 从不向宿主抛出 panic.

use thiserror::Error;

/// Yan 框架统一错误类型
#[derive(Debug, Error)]
pub enum YanError {
    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 不支持的操作
    #[error("不支持的操作: {0}")]
    Unsupported(String),

    /// 状态非法 (在错误的生命周期阶段调用了操作)
    #[error("状态非法: {0}")]
    IllegalState(String),

    /// 编解码器错误
    #[error("编解码器错误: {0}")]
    Codec(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 无法打开媒体源
    #[error("无法打开媒体源: {0}")]
    SourceNotFound(String),

    /// 未找到匹配的轨道
    #[error("未找到轨道: {0}")]
    TrackNotFound(String),

    /// 未找到指定的编解码器
    #[error("未找到编解码器: {0}")]
    CodecNotFound(String),

    /// 无效数据 (尺寸不符、损坏的样本等)
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// 已到达流末尾
    #[error("已到达流末尾")]
    Eof,

    /// 内部错误 (不应发生)
    #[error("内部错误: {0}")]
    Internal(String),
}

/// Yan 框架统一 Result 类型
pub type YanResult<T> = Result<T, YanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_错误信息格式() {
        let err = YanError::TrackNotFound("video".into());
        assert_eq!(err.to_string(), "未找到轨道: video");
        assert_eq!(YanError::Eof.to_string(), "已到达流末尾");
    }

    #[test]
    fn test_io_错误自动转换() {
        fn open() -> YanResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))?;
            Ok(())
        }
        assert!(matches!(open(), Err(YanError::Io(_))));
    }
}
