//! 平台版本差异.
//!
//! 不同 API 级别的解码器在缓冲区访问方式和若干行为上有差异.
//! 这些差异在准备阶段按 API 级别一次性解析为 [`PlatformQuirks`],
//! 解码循环只读取结果, 不再逐次判断版本.

/// Android 4.3
pub const JELLY_BEAN_MR2: u32 = 18;
/// Android 4.4
pub const KITKAT: u32 = 19;
/// Android 5.0
pub const LOLLIPOP: u32 = 21;

/// 缓冲区访问方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferAccess {
    /// 整组数组访问 (`input_buffers()`/`output_buffers()`)
    Legacy,
    /// 按索引直接访问 (`input_buffer(i)`/`output_buffer(i)`)
    Direct,
}

/// 按 API 级别解析出的平台行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformQuirks {
    pub api_level: u32,
    pub buffer_access: BufferAccess,
    /// 成功出队但大小为 0 的输出不计为一帧
    pub zero_size_output_is_miss: bool,
    /// 支持 `max-width`/`max-height` 提示 (ABR)
    pub max_size_hints: bool,
    /// 查找解码器前必须去掉帧率键
    pub strip_frame_rate: bool,
    /// 可按完整格式查找解码器; 否则只能按 MIME 创建
    pub find_decoder_for_format: bool,
}

impl PlatformQuirks {
    pub fn resolve(api_level: u32) -> Self {
        Self {
            api_level,
            buffer_access: if api_level < LOLLIPOP {
                BufferAccess::Legacy
            } else {
                BufferAccess::Direct
            },
            zero_size_output_is_miss: api_level >= JELLY_BEAN_MR2,
            max_size_hints: api_level >= KITKAT,
            strip_frame_rate: api_level == LOLLIPOP,
            find_decoder_for_format: api_level >= LOLLIPOP,
        }
    }
}

impl Default for PlatformQuirks {
    fn default() -> Self {
        Self::resolve(crate::config::PlayerConfig::default().api_level)
    }
}
