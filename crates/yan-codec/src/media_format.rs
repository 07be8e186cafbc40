//! 轨道/解码器格式描述.
//!
//! 容器为每条轨道给出一份 `MediaFormat`, 驱动在配置解码器前可以覆盖其中的键.

use std::collections::BTreeMap;
use std::fmt;

/// MIME 类型 (字符串)
pub const KEY_MIME: &str = "mime";
/// 宽度 (整数)
pub const KEY_WIDTH: &str = "width";
/// 高度 (整数)
pub const KEY_HEIGHT: &str = "height";
/// 自适应播放时的最大宽度提示 (整数)
pub const KEY_MAX_WIDTH: &str = "max-width";
/// 自适应播放时的最大高度提示 (整数)
pub const KEY_MAX_HEIGHT: &str = "max-height";
/// 帧率 (整数)
pub const KEY_FRAME_RATE: &str = "frame-rate";
/// 未压缩像素格式名称 (字符串, 见 `PixelFormat::from_name`)
pub const KEY_COLOR_FORMAT: &str = "color-format";

/// 格式值
#[derive(Debug, Clone, PartialEq)]
pub enum FormatValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for FormatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

/// 媒体格式 (有序键值表)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaFormat {
    entries: BTreeMap<String, FormatValue>,
}

impl MediaFormat {
    /// 创建空格式
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建视频格式 (mime + 尺寸)
    pub fn new_video(mime: &str, width: u32, height: u32) -> Self {
        let mut format = Self::new();
        format.set_string(KEY_MIME, mime);
        format.set_integer(KEY_WIDTH, i64::from(width));
        format.set_integer(KEY_HEIGHT, i64::from(height));
        format
    }

    pub fn set_integer(&mut self, key: &str, value: i64) {
        self.entries.insert(key.to_string(), FormatValue::Int(value));
    }

    pub fn set_float(&mut self, key: &str, value: f64) {
        self.entries
            .insert(key.to_string(), FormatValue::Float(value));
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.entries
            .insert(key.to_string(), FormatValue::Str(value.into()));
    }

    /// 读取整数值, 类型不符时返回 None
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.entries.get(key)? {
            FormatValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        match self.entries.get(key)? {
            FormatValue::Float(v) => Some(*v),
            FormatValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        match self.entries.get(key)? {
            FormatValue::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// 删除键, 返回旧值
    pub fn remove(&mut self, key: &str) -> Option<FormatValue> {
        self.entries.remove(key)
    }

    /// MIME 类型
    pub fn mime(&self) -> Option<&str> {
        self.string(KEY_MIME)
    }

    /// 宽度 (非正值视为缺失)
    pub fn width(&self) -> Option<u32> {
        self.dimension(KEY_WIDTH)
    }

    /// 高度 (非正值视为缺失)
    pub fn height(&self) -> Option<u32> {
        self.dimension(KEY_HEIGHT)
    }

    fn dimension(&self, key: &str) -> Option<u32> {
        self.integer(key)
            .filter(|v| *v > 0)
            .and_then(|v| u32::try_from(v).ok())
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, "}}")
    }
}
