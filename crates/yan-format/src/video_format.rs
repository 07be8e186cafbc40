//! 视频格式描述.
//!
//! 宽、高、MIME 优先取调用方的显式设置, 未设置时回退到文件名解析值.
//! 文件名只在首次需要时解析一次.

use std::sync::OnceLock;

use yan_core::MediaType;

use crate::filename::{FilenameParser, format_size};

/// 一个测试用例请求的视频格式
#[derive(Debug, Clone)]
pub struct VideoFormat {
    filename: String,
    mime_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    abr_enabled: bool,
    parsed: OnceLock<FilenameParser>,
}

impl VideoFormat {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: None,
            width: None,
            height: None,
            max_width: None,
            max_height: None,
            abr_enabled: false,
            parsed: OnceLock::new(),
        }
    }

    /// 以同一素材创建新描述, 不继承任何显式设置
    pub fn from_filename_of(other: &VideoFormat) -> Self {
        Self::new(other.filename.clone())
    }

    fn parsed_name(&self) -> &FilenameParser {
        self.parsed.get_or_init(|| FilenameParser::new(&self.filename))
    }

    /// 素材名称
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 媒体类型 (恒为视频)
    pub fn media_type(&self) -> MediaType {
        MediaType::Video
    }

    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = Some(mime_type.into());
    }

    pub fn mime_type(&self) -> Option<&str> {
        match &self.mime_type {
            Some(mime) => Some(mime),
            None => self.parsed_name().mime_type(),
        }
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = Some(width);
    }

    pub fn width(&self) -> Option<u32> {
        self.width.or_else(|| self.parsed_name().width())
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = Some(height);
    }

    pub fn height(&self) -> Option<u32> {
        self.height.or_else(|| self.parsed_name().height())
    }

    /// 文件名中的宽度 (忽略显式设置)
    pub fn original_width(&self) -> Option<u32> {
        self.parsed_name().width()
    }

    /// 文件名中的高度 (忽略显式设置)
    pub fn original_height(&self) -> Option<u32> {
        self.parsed_name().height()
    }

    pub fn set_max_width(&mut self, max_width: u32) {
        self.max_width = Some(max_width);
    }

    pub fn max_width(&self) -> Option<u32> {
        self.max_width
    }

    pub fn set_max_height(&mut self, max_height: u32) {
        self.max_height = Some(max_height);
    }

    pub fn max_height(&self) -> Option<u32> {
        self.max_height
    }

    /// 启用自适应码率 (解码器配置时附带最大分辨率提示)
    pub fn set_abr_enabled(&mut self, enabled: bool) {
        self.abr_enabled = enabled;
    }

    pub fn is_abr_enabled(&self) -> bool {
        self.abr_enabled
    }

    /// 显式宽高都设置时返回它们, 否则返回文件名中的尺寸
    pub fn original_size(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) => format_size(Some(w), Some(h)),
            _ => self.parsed_name().size(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.parsed_name().description()
    }

    pub fn to_pretty_string(&self) -> String {
        self.parsed_name().to_pretty_string()
    }
}
