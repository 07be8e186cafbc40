//! 解封装器 (Extractor) trait 定义.
//!
//! 从容器中按轨道读取带时间戳的压缩样本.

use yan_core::YanResult;

use crate::media_format::MediaFormat;

/// 解封装器 trait
///
/// 使用流程:
/// 1. 由 [`ExtractorSource::open`] 按名称打开
/// 2. 遍历 `track_format()` 选出目标轨道并 `select_track()`
/// 3. 循环 `read_sample_data()` + `advance()` 读取样本
/// 4. `release()` 释放
pub trait MediaExtractor: Send {
    /// 轨道数量
    fn track_count(&self) -> usize;

    /// 获取轨道格式 (返回副本, 调用方可自由修改)
    fn track_format(&self, index: usize) -> YanResult<MediaFormat>;

    /// 选中轨道, 后续读取只返回该轨道的样本
    fn select_track(&mut self, index: usize) -> YanResult<()>;

    /// 把当前样本复制到 `buf`
    ///
    /// # 返回
    /// - `Ok(Some(size))`: 样本字节数
    /// - `Ok(None)`: 已没有样本
    fn read_sample_data(&mut self, buf: &mut [u8]) -> YanResult<Option<usize>>;

    /// 当前样本的显示时间戳 (微秒), 没有样本时为 None
    fn sample_time(&self) -> Option<i64>;

    /// 前进到下一个样本, 返回是否仍有样本
    fn advance(&mut self) -> bool;

    /// 释放资源
    fn release(&mut self) -> YanResult<()>;
}

/// 媒体源: 按名称打开压缩媒体数据
pub trait ExtractorSource: Send + Sync {
    /// 打开指定名称的媒体, 返回就绪的解封装器
    fn open(&self, name: &str) -> YanResult<Box<dyn MediaExtractor>>;
}
