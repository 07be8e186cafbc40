//! 媒体类型定义.
//!
//! 对应 MIME 主类型 (`video/...`, `audio/...`), 用于按类型挑选轨道.

use std::fmt;

/// 媒体流类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// 视频流
    Video,
    /// 音频流
    Audio,
    /// 字幕流
    Subtitle,
}

impl MediaType {
    /// MIME 主类型前缀 (不含 `/`)
    pub const fn mime_prefix(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "text",
        }
    }

    /// 判断 MIME 是否属于本媒体类型
    ///
    /// 必须以 `"{prefix}/"` 开头, `"videox/avc"` 之类不算匹配.
    pub fn matches_mime(&self, mime: &str) -> bool {
        mime.strip_prefix(self.mime_prefix())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// 从 MIME 推断媒体类型
    pub fn from_mime(mime: &str) -> Option<Self> {
        [Self::Video, Self::Audio, Self::Subtitle]
            .into_iter()
            .find(|t| t.matches_mime(mime))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Video => "视频",
            Self::Audio => "音频",
            Self::Subtitle => "字幕",
        };
        write!(f, "{name}")
    }
}
