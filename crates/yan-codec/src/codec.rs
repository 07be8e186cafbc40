//! 解码器 trait 定义.
//!
//! 外部解码器以缓冲区队列的方式工作, 所有实现都必须实现 `MediaCodec` trait.

use std::time::Duration;

use yan_core::{YanError, YanResult};

use crate::buffer::{BufferFlags, BufferInfo, OutputStatus};
use crate::media_format::MediaFormat;
use crate::surface::Surface;

/// 解码器 trait
///
/// 生命周期: 未初始化 → `configure()` → `start()` → 运行 → `stop()` → `release()`.
/// 在错误的阶段调用操作返回 `YanError::IllegalState`; `reset()` 回到未初始化状态.
///
/// 解码流程:
/// 1. `dequeue_input_buffer()` 取得空闲输入缓冲区索引
/// 2. 写入压缩样本后 `queue_input_buffer()` 送回解码器
/// 3. `dequeue_output_buffer()` 取出解码结果
/// 4. `release_output_buffer()` 归还输出缓冲区, 可选择渲染到 Surface
pub trait MediaCodec: Send {
    /// 获取解码器名称
    fn name(&self) -> &str;

    /// 使用格式 (及可选渲染目标) 配置解码器
    fn configure(&mut self, format: &MediaFormat, surface: Option<Surface>) -> YanResult<()>;

    /// 启动解码器
    fn start(&mut self) -> YanResult<()>;

    /// 在超时内取得一个空闲输入缓冲区
    ///
    /// # 返回
    /// - `Ok(Some(index))`: 取得输入缓冲区
    /// - `Ok(None)`: 超时内暂无可用缓冲区
    fn dequeue_input_buffer(&mut self, timeout: Duration) -> YanResult<Option<usize>>;

    /// 按索引访问输入缓冲区
    fn input_buffer(&mut self, index: usize) -> YanResult<&mut [u8]>;

    /// 旧式整组输入缓冲区访问
    ///
    /// 早期平台只提供数组形式的访问方式. 默认不支持.
    fn input_buffers(&mut self) -> YanResult<&mut [Vec<u8>]> {
        Err(YanError::Unsupported(format!(
            "{} 不支持旧式输入缓冲区数组",
            self.name()
        )))
    }

    /// 把写好数据的输入缓冲区送回解码器
    fn queue_input_buffer(
        &mut self,
        index: usize,
        offset: usize,
        size: usize,
        presentation_time_us: i64,
        flags: BufferFlags,
    ) -> YanResult<()>;

    /// 在超时内取出一个输出缓冲区, 元信息写入 `info`
    fn dequeue_output_buffer(
        &mut self,
        info: &mut BufferInfo,
        timeout: Duration,
    ) -> YanResult<OutputStatus>;

    /// 按索引访问输出缓冲区
    fn output_buffer(&self, index: usize) -> YanResult<&[u8]>;

    /// 旧式整组输出缓冲区访问. 默认不支持.
    fn output_buffers(&self) -> YanResult<&[Vec<u8>]> {
        Err(YanError::Unsupported(format!(
            "{} 不支持旧式输出缓冲区数组",
            self.name()
        )))
    }

    /// 归还输出缓冲区; `render` 为 true 且配置了 Surface 时渲染该帧
    fn release_output_buffer(&mut self, index: usize, render: bool) -> YanResult<()>;

    /// 停止解码 (回到已配置前的状态)
    fn stop(&mut self) -> YanResult<()>;

    /// 重置到未初始化状态
    fn reset(&mut self) -> YanResult<()>;

    /// 释放全部资源, 之后不可再使用
    fn release(&mut self) -> YanResult<()>;
}
