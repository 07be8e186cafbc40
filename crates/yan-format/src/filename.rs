//! 素材文件名解析.
//!
//! 文件名格式: `{描述}-{编码}_{宽}x{高}_{帧率}.{扩展名}`, 例如
//! `big_buck_bunny-h264_480x360_30fps.mp4`.
//! 格式不匹配时不报错, 未能解析的字段保持未设置.

use log::trace;
use yan_core::mime;

use crate::STRING_UNSET;

const DESCRIPTION_DELIMITER: char = '-';
const INFO_DELIMITER: char = '_';
const SIZE_DELIMITER: char = 'x';

const CODEC_H264: &str = "h264";
const CODEC_VP9: &str = "vp9";
const CODEC_RAW: &str = "raw";

/// 文件名解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameParser {
    filename: String,
    description: Option<String>,
    codec: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl FilenameParser {
    /// 解析文件名
    ///
    /// 字段按 描述 → 编码 → 宽 → 高 的顺序解析, 某一步失败时停止, 之前的字段保留.
    pub fn new(filename: &str) -> Self {
        let mut parser = Self {
            filename: filename.to_string(),
            description: None,
            codec: None,
            width: None,
            height: None,
        };
        parser.parse();
        parser
    }

    fn parse(&mut self) {
        let mut parts = self.filename.split(DESCRIPTION_DELIMITER);
        self.description = parts.next().map(str::to_string);

        let Some(info) = parts.next() else {
            trace!("文件名 {} 缺少编码信息", self.filename);
            return;
        };
        let mut fields = info.split(INFO_DELIMITER);
        self.codec = fields.next().map(str::to_string);

        let Some(size) = fields.next() else {
            return;
        };
        let mut dims = size.split(SIZE_DELIMITER);
        let Some(width) = dims.next().and_then(|w| w.parse::<u32>().ok()) else {
            return;
        };
        self.width = Some(width);
        self.height = dims.next().and_then(|h| h.parse::<u32>().ok());
    }

    /// 原始文件名
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 描述部分 (第一个 `-` 之前的文本)
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 编码名称, 如 `h264`
    pub fn codec(&self) -> Option<&str> {
        self.codec.as_deref()
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// `"{宽}x{高}"`, 未解析的部分显示为 `UNSET`
    pub fn size(&self) -> String {
        format_size(self.width, self.height)
    }

    /// 由编码名称推导的 MIME, 未知编码返回 None
    pub fn mime_type(&self) -> Option<&'static str> {
        match self.codec.as_deref()? {
            CODEC_H264 => Some(mime::VIDEO_H264),
            CODEC_VP9 => Some(mime::VIDEO_VP9),
            CODEC_RAW => Some(mime::VIDEO_RAW),
            _ => None,
        }
    }

    /// 可读描述, 如 `"H264 480x360"`; 未解析出编码时返回文件名
    pub fn to_pretty_string(&self) -> String {
        match &self.codec {
            Some(codec) => format!("{} {}", codec.to_uppercase(), self.size()),
            None => self.filename.clone(),
        }
    }
}

/// 把可能缺失的宽高格式化为 `"{宽}x{高}"`
pub(crate) fn format_size(width: Option<u32>, height: Option<u32>) -> String {
    let show = |v: Option<u32>| v.map_or_else(|| STRING_UNSET.to_string(), |v| v.to_string());
    format!("{}x{}", show(width), show(height))
}
