//! 缓冲区元信息与出队状态.

use bitflags::bitflags;

bitflags! {
    /// 缓冲区标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferFlags: u32 {
        /// 关键帧
        const KEY_FRAME = 1;
        /// 编解码器配置数据 (非媒体数据)
        const CODEC_CONFIG = 1 << 1;
        /// 流结束
        const END_OF_STREAM = 1 << 2;
    }
}

/// 输出缓冲区元信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferInfo {
    /// 有效数据起始偏移
    pub offset: usize,
    /// 有效数据字节数
    pub size: usize,
    /// 显示时间戳 (微秒)
    pub presentation_time_us: i64,
    /// 标志
    pub flags: BufferFlags,
}

impl BufferInfo {
    /// 是否携带流结束标志
    pub fn is_end_of_stream(&self) -> bool {
        self.flags.contains(BufferFlags::END_OF_STREAM)
    }
}

/// `dequeue_output_buffer` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStatus {
    /// 取到一个输出缓冲区 (索引)
    Buffer(usize),
    /// 超时内没有可用输出
    TryAgainLater,
    /// 输出格式发生变化
    FormatChanged,
    /// 输出缓冲区数组发生变化 (旧式数组访问需重新获取)
    BuffersChanged,
}
