//! RAW 视频直通解码器.
//!
//! 输入样本即未压缩帧, 不做任何解压缩, 只校验帧大小并把数据原样交给输出端.
//! 输入缓冲区 i 在解码后直接作为输出缓冲区 i 返回, 归还输出后重新进入空闲池.

use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, trace};
use yan_core::{PixelFormat, YanError, YanResult, mime};

use crate::buffer::{BufferFlags, BufferInfo, OutputStatus};
use crate::capabilities::{IntRange, VideoCapabilities};
use crate::codec::MediaCodec;
use crate::media_format::{KEY_COLOR_FORMAT, MediaFormat};
use crate::surface::Surface;

/// 解码器注册名称
pub const RAW_DECODER_NAME: &str = "yan.raw.decoder";

/// 缓冲区池大小
const BUFFER_COUNT: usize = 4;

/// RAW 解码器的视频能力
pub fn raw_video_capabilities() -> VideoCapabilities {
    VideoCapabilities::new(IntRange::new(2, 4096), IntRange::new(2, 4096))
        .with_max_pixels(4096 * 2304)
}

/// 解码器生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodecState {
    Uninitialized,
    Configured,
    Executing,
    Released,
}

/// 缓冲区槽位归属
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// 在空闲池中
    Free,
    /// 已交给调用方填充输入
    InputOwned,
    /// 已解码, 等待出队
    OutputPending,
    /// 已交给调用方读取输出
    OutputOwned,
}

/// RAW 视频解码器
pub struct RawVideoCodec {
    state: CodecState,
    /// 图像宽度
    width: u32,
    /// 图像高度
    height: u32,
    /// 像素格式
    pixel_format: PixelFormat,
    /// 预计算: 每帧总字节数
    frame_size: usize,
    /// 渲染目标
    surface: Option<Surface>,
    /// 缓冲区池 (输入输出共用)
    buffers: Vec<Vec<u8>>,
    slots: Vec<Slot>,
    infos: Vec<BufferInfo>,
    free: VecDeque<usize>,
    ready: VecDeque<usize>,
    /// 是否已报告过输出格式
    format_announced: bool,
    /// 是否已收到流结束输入
    input_eos: bool,
}

impl RawVideoCodec {
    pub fn create() -> YanResult<Box<dyn MediaCodec>> {
        Ok(Box::new(Self::new()))
    }

    pub fn new() -> Self {
        Self {
            state: CodecState::Uninitialized,
            width: 0,
            height: 0,
            pixel_format: PixelFormat::None,
            frame_size: 0,
            surface: None,
            buffers: Vec::new(),
            slots: Vec::new(),
            infos: Vec::new(),
            free: VecDeque::new(),
            ready: VecDeque::new(),
            format_announced: false,
            input_eos: false,
        }
    }

    fn require(&self, expected: CodecState, op: &str) -> YanResult<()> {
        if self.state != expected {
            return Err(YanError::IllegalState(format!(
                "{op}: 当前状态 {:?}, 需要 {:?}",
                self.state, expected,
            )));
        }
        Ok(())
    }

    fn require_slot(&self, index: usize, expected: Slot, op: &str) -> YanResult<()> {
        match self.slots.get(index) {
            Some(slot) if *slot == expected => Ok(()),
            Some(slot) => Err(YanError::IllegalState(format!(
                "{op}: 缓冲区 {index} 处于 {slot:?}, 需要 {expected:?}",
            ))),
            None => Err(YanError::InvalidArgument(format!(
                "{op}: 缓冲区索引 {index} 越界",
            ))),
        }
    }

    fn recycle(&mut self, index: usize) {
        self.slots[index] = Slot::Free;
        self.free.push_back(index);
    }

    fn clear_buffers(&mut self) {
        self.buffers.clear();
        self.slots.clear();
        self.infos.clear();
        self.free.clear();
        self.ready.clear();
        self.format_announced = false;
        self.input_eos = false;
    }
}

impl Default for RawVideoCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaCodec for RawVideoCodec {
    fn name(&self) -> &str {
        RAW_DECODER_NAME
    }

    fn configure(&mut self, format: &MediaFormat, surface: Option<Surface>) -> YanResult<()> {
        self.require(CodecState::Uninitialized, "configure")?;

        if format.mime() != Some(mime::VIDEO_RAW) {
            return Err(YanError::Unsupported(format!(
                "{RAW_DECODER_NAME} 不支持 {:?}",
                format.mime()
            )));
        }
        let (width, height) = match (format.width(), format.height()) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(YanError::InvalidArgument("宽度和高度不能为空".into())),
        };
        if !raw_video_capabilities().is_size_supported(width, height) {
            return Err(YanError::Unsupported(format!(
                "尺寸 {width}x{height} 超出解码器能力"
            )));
        }
        let pixel_format = match format.string(KEY_COLOR_FORMAT) {
            Some(name) => PixelFormat::from_name(name)
                .ok_or_else(|| YanError::InvalidArgument(format!("未知像素格式: {name}")))?,
            None => PixelFormat::Yuv420p,
        };
        let frame_size = pixel_format
            .frame_size(width, height)
            .ok_or_else(|| YanError::InvalidArgument(format!("无法计算 {pixel_format} 的帧大小")))?;

        self.width = width;
        self.height = height;
        self.pixel_format = pixel_format;
        self.frame_size = frame_size;
        self.surface = surface;
        self.clear_buffers();
        self.buffers = vec![vec![0u8; frame_size]; BUFFER_COUNT];
        self.slots = vec![Slot::Free; BUFFER_COUNT];
        self.infos = vec![BufferInfo::default(); BUFFER_COUNT];
        self.state = CodecState::Configured;

        debug!(
            "配置 rawvideo 解码器: {}x{}, 格式={}, 帧大小={}, surface={:?}",
            self.width, self.height, self.pixel_format, self.frame_size, self.surface,
        );
        Ok(())
    }

    fn start(&mut self) -> YanResult<()> {
        self.require(CodecState::Configured, "start")?;
        self.free = (0..self.buffers.len()).collect();
        self.state = CodecState::Executing;
        Ok(())
    }

    fn dequeue_input_buffer(&mut self, _timeout: Duration) -> YanResult<Option<usize>> {
        // 软件后端从不阻塞, 超时参数只用于接口兼容
        self.require(CodecState::Executing, "dequeue_input_buffer")?;
        if self.input_eos {
            return Ok(None);
        }
        let index = self.free.pop_front();
        if let Some(idx) = index {
            self.slots[idx] = Slot::InputOwned;
        }
        Ok(index)
    }

    fn input_buffer(&mut self, index: usize) -> YanResult<&mut [u8]> {
        self.require(CodecState::Executing, "input_buffer")?;
        self.require_slot(index, Slot::InputOwned, "input_buffer")?;
        Ok(&mut self.buffers[index])
    }

    fn input_buffers(&mut self) -> YanResult<&mut [Vec<u8>]> {
        self.require(CodecState::Executing, "input_buffers")?;
        Ok(&mut self.buffers)
    }

    fn queue_input_buffer(
        &mut self,
        index: usize,
        offset: usize,
        size: usize,
        presentation_time_us: i64,
        flags: BufferFlags,
    ) -> YanResult<()> {
        self.require(CodecState::Executing, "queue_input_buffer")?;
        self.require_slot(index, Slot::InputOwned, "queue_input_buffer")?;

        if offset + size > self.buffers[index].len() {
            self.recycle(index);
            return Err(YanError::InvalidArgument(format!(
                "输入范围 {offset}+{size} 超出缓冲区容量 {}",
                self.frame_size,
            )));
        }
        if size > 0 && size != self.frame_size {
            self.recycle(index);
            return Err(YanError::InvalidData(format!(
                "样本大小 {size} 与预期帧大小 {} 不匹配",
                self.frame_size,
            )));
        }

        let eos = flags.contains(BufferFlags::END_OF_STREAM);
        if eos {
            self.input_eos = true;
        }
        if size == 0 && !eos {
            self.recycle(index);
            return Ok(());
        }

        if offset > 0 {
            self.buffers[index].copy_within(offset..offset + size, 0);
        }
        let mut out_flags = flags & BufferFlags::END_OF_STREAM;
        if size > 0 {
            out_flags |= BufferFlags::KEY_FRAME;
        }
        self.infos[index] = BufferInfo {
            offset: 0,
            size,
            presentation_time_us,
            flags: out_flags,
        };
        self.slots[index] = Slot::OutputPending;
        self.ready.push_back(index);
        trace!("rawvideo 输入 {index}: size={size}, pts={presentation_time_us}");
        Ok(())
    }

    fn dequeue_output_buffer(
        &mut self,
        info: &mut BufferInfo,
        _timeout: Duration,
    ) -> YanResult<OutputStatus> {
        self.require(CodecState::Executing, "dequeue_output_buffer")?;
        if self.ready.is_empty() {
            return Ok(OutputStatus::TryAgainLater);
        }
        if !self.format_announced {
            // 首个输出前先报告一次输出格式
            self.format_announced = true;
            return Ok(OutputStatus::FormatChanged);
        }
        match self.ready.pop_front() {
            Some(idx) => {
                self.slots[idx] = Slot::OutputOwned;
                *info = self.infos[idx];
                Ok(OutputStatus::Buffer(idx))
            }
            None => Ok(OutputStatus::TryAgainLater),
        }
    }

    fn output_buffer(&self, index: usize) -> YanResult<&[u8]> {
        self.require(CodecState::Executing, "output_buffer")?;
        self.require_slot(index, Slot::OutputOwned, "output_buffer")?;
        Ok(&self.buffers[index][..self.infos[index].size])
    }

    fn output_buffers(&self) -> YanResult<&[Vec<u8>]> {
        self.require(CodecState::Executing, "output_buffers")?;
        Ok(&self.buffers)
    }

    fn release_output_buffer(&mut self, index: usize, render: bool) -> YanResult<()> {
        self.require(CodecState::Executing, "release_output_buffer")?;
        self.require_slot(index, Slot::OutputOwned, "release_output_buffer")?;
        let info = self.infos[index];
        if render && info.size > 0 {
            if let Some(surface) = &self.surface {
                surface.render(&self.buffers[index][..info.size], &info);
            }
        }
        self.recycle(index);
        Ok(())
    }

    fn stop(&mut self) -> YanResult<()> {
        match self.state {
            CodecState::Configured | CodecState::Executing => {
                self.clear_buffers();
                self.surface = None;
                self.state = CodecState::Uninitialized;
                Ok(())
            }
            state => Err(YanError::IllegalState(format!("stop: 当前状态 {state:?}"))),
        }
    }

    fn reset(&mut self) -> YanResult<()> {
        if self.state == CodecState::Released {
            return Err(YanError::IllegalState("reset: 解码器已释放".into()));
        }
        self.clear_buffers();
        self.surface = None;
        self.state = CodecState::Uninitialized;
        Ok(())
    }

    fn release(&mut self) -> YanResult<()> {
        self.clear_buffers();
        self.surface = None;
        self.state = CodecState::Released;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RenderTarget;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const POLL: Duration = Duration::from_micros(20);

    fn started_codec(width: u32, height: u32, surface: Option<Surface>) -> RawVideoCodec {
        let mut codec = RawVideoCodec::new();
        codec
            .configure(&MediaFormat::new_video(mime::VIDEO_RAW, width, height), surface)
            .unwrap();
        codec.start().unwrap();
        codec
    }

    /// 取出下一个真正的输出缓冲区 (跳过格式变化通知)
    fn next_output(codec: &mut RawVideoCodec, info: &mut BufferInfo) -> Option<usize> {
        for _ in 0..2 {
            match codec.dequeue_output_buffer(info, POLL).unwrap() {
                OutputStatus::Buffer(idx) => return Some(idx),
                OutputStatus::FormatChanged => continue,
                _ => return None,
            }
        }
        None
    }

    #[test]
    fn test_直通解码一帧() {
        let mut codec = started_codec(4, 2, None);
        let frame_size = PixelFormat::Yuv420p.frame_size(4, 2).unwrap();
        let idx = codec.dequeue_input_buffer(POLL).unwrap().unwrap();
        codec.input_buffer(idx).unwrap()[..frame_size].fill(0x42);
        codec
            .queue_input_buffer(idx, 0, frame_size, 1000, BufferFlags::empty())
            .unwrap();

        let mut info = BufferInfo::default();
        let out = next_output(&mut codec, &mut info).unwrap();
        assert_eq!(info.size, frame_size);
        assert_eq!(info.presentation_time_us, 1000);
        assert!(info.flags.contains(BufferFlags::KEY_FRAME));
        assert!(codec.output_buffer(out).unwrap().iter().all(|&b| b == 0x42));
        codec.release_output_buffer(out, false).unwrap();
    }

    #[test]
    fn test_帧大小不符返回错误并回收缓冲区() {
        let mut codec = started_codec(4, 2, None);
        let idx = codec.dequeue_input_buffer(POLL).unwrap().unwrap();
        let err = codec.queue_input_buffer(idx, 0, 3, 0, BufferFlags::empty());
        assert!(matches!(err, Err(YanError::InvalidData(_))));
        // 缓冲区回到空闲池, 可以再次取出
        let mut seen = 0;
        while codec.dequeue_input_buffer(POLL).unwrap().is_some() {
            seen += 1;
        }
        assert_eq!(seen, BUFFER_COUNT);
    }

    #[test]
    fn test_流结束标志传递到输出() {
        let mut codec = started_codec(4, 2, None);
        let idx = codec.dequeue_input_buffer(POLL).unwrap().unwrap();
        codec
            .queue_input_buffer(idx, 0, 0, 0, BufferFlags::END_OF_STREAM)
            .unwrap();
        assert_eq!(codec.dequeue_input_buffer(POLL).unwrap(), None);

        let mut info = BufferInfo::default();
        next_output(&mut codec, &mut info).unwrap();
        assert!(info.is_end_of_stream());
        assert_eq!(info.size, 0);
    }

    #[test]
    fn test_未启动时操作返回状态错误() {
        let mut codec = RawVideoCodec::new();
        assert!(matches!(
            codec.dequeue_input_buffer(POLL),
            Err(YanError::IllegalState(_))
        ));
        assert!(matches!(codec.start(), Err(YanError::IllegalState(_))));
        assert!(matches!(codec.stop(), Err(YanError::IllegalState(_))));
    }

    #[test]
    fn test_配置不支持的格式() {
        let mut codec = RawVideoCodec::new();
        let avc = MediaFormat::new_video(mime::VIDEO_H264, 4, 4);
        assert!(matches!(codec.configure(&avc, None), Err(YanError::Unsupported(_))));
        let huge = MediaFormat::new_video(mime::VIDEO_RAW, 8192, 8192);
        assert!(matches!(codec.configure(&huge, None), Err(YanError::Unsupported(_))));
    }

    struct CountingTarget(AtomicUsize);

    impl RenderTarget for CountingTarget {
        fn name(&self) -> &str {
            "counting"
        }

        fn render(&self, _frame: &[u8], _info: &BufferInfo) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_渲染到_surface() {
        let target = Arc::new(CountingTarget(AtomicUsize::new(0)));
        let mut codec = started_codec(2, 2, Some(Surface::new(target.clone())));
        let frame_size = PixelFormat::Yuv420p.frame_size(2, 2).unwrap();
        for pts in 0..2 {
            let idx = codec.dequeue_input_buffer(POLL).unwrap().unwrap();
            codec
                .queue_input_buffer(idx, 0, frame_size, pts, BufferFlags::empty())
                .unwrap();
        }
        let mut info = BufferInfo::default();
        let first = next_output(&mut codec, &mut info).unwrap();
        codec.release_output_buffer(first, true).unwrap();
        let second = next_output(&mut codec, &mut info).unwrap();
        codec.release_output_buffer(second, false).unwrap();
        assert_eq!(target.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_旧式数组访问() {
        let mut codec = started_codec(2, 2, None);
        assert_eq!(codec.input_buffers().unwrap().len(), BUFFER_COUNT);
        assert_eq!(codec.output_buffers().unwrap().len(), BUFFER_COUNT);
    }

    #[test]
    fn test_释放幂等() {
        let mut codec = started_codec(2, 2, None);
        codec.stop().unwrap();
        codec.release().unwrap();
        codec.release().unwrap();
        assert!(codec.reset().is_err());
    }
}
