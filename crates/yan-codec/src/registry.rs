//! 解码器注册表.
//!
//! 按名称或 MIME 查找并实例化解码器, 同时保存每个解码器声明的视频能力.

use std::collections::HashMap;

use log::debug;
use yan_core::{YanError, YanResult};

use crate::capabilities::VideoCapabilities;
use crate::codec::MediaCodec;
use crate::media_format::MediaFormat;

/// 解码器工厂函数类型
pub type CodecFactory = fn() -> YanResult<Box<dyn MediaCodec>>;

/// 解码器注册表
///
/// 同一 MIME 可注册多个解码器, 先注册者优先.
pub struct CodecRegistry {
    /// 按注册顺序保存的条目
    decoders: Vec<DecoderEntry>,
    /// 名称 → 条目索引
    by_name: HashMap<String, usize>,
}

/// 解码器注册条目
struct DecoderEntry {
    /// 解码器名称
    name: String,
    /// 支持的 MIME
    mime: String,
    /// 视频能力
    capabilities: VideoCapabilities,
    /// 工厂函数
    factory: CodecFactory,
}

impl CodecRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            decoders: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// 注册一个解码器 (同名时覆盖旧条目)
    pub fn register_decoder(
        &mut self,
        name: impl Into<String>,
        mime: impl Into<String>,
        capabilities: VideoCapabilities,
        factory: CodecFactory,
    ) {
        let entry = DecoderEntry {
            name: name.into(),
            mime: mime.into(),
            capabilities,
            factory,
        };
        if let Some(&idx) = self.by_name.get(&entry.name) {
            self.decoders[idx] = entry;
        } else {
            self.by_name.insert(entry.name.clone(), self.decoders.len());
            self.decoders.push(entry);
        }
    }

    /// 按名称创建解码器
    pub fn create_by_name(&self, name: &str) -> YanResult<Box<dyn MediaCodec>> {
        let idx = self
            .by_name
            .get(name)
            .ok_or_else(|| YanError::CodecNotFound(format!("未注册名为 {name} 的解码器")))?;
        (self.decoders[*idx].factory)()
    }

    /// 按 MIME 创建解码器 (使用第一个注册的解码器)
    pub fn create_decoder_by_type(&self, mime: &str) -> YanResult<Box<dyn MediaCodec>> {
        let entry = self
            .decoders
            .iter()
            .find(|e| e.mime == mime)
            .ok_or_else(|| YanError::CodecNotFound(format!("未找到 {mime} 的解码器")))?;
        (entry.factory)()
    }

    /// 查找能处理指定格式的解码器名称
    ///
    /// 要求 MIME 一致, 且格式中给出的尺寸在解码器能力范围内.
    pub fn find_decoder_for_format(&self, format: &MediaFormat) -> Option<String> {
        let mime = format.mime()?;
        let found = self.decoders.iter().find(|e| {
            e.mime == mime
                && match (format.width(), format.height()) {
                    (Some(w), Some(h)) => e.capabilities.is_size_supported(w, h),
                    _ => true,
                }
        });
        match found {
            Some(entry) => Some(entry.name.clone()),
            None => {
                debug!("没有解码器支持格式 {format}");
                None
            }
        }
    }

    /// 查询指定解码器对某 MIME 的视频能力
    pub fn video_capabilities(&self, name: &str, mime: &str) -> Option<&VideoCapabilities> {
        let entry = &self.decoders[*self.by_name.get(name)?];
        (entry.mime == mime).then_some(&entry.capabilities)
    }

    /// 获取所有已注册的解码器 (名称, MIME)
    pub fn list_decoders(&self) -> Vec<(&str, &str)> {
        self.decoders
            .iter()
            .map(|e| (e.name.as_str(), e.mime.as_str()))
            .collect()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
