//! 解码驱动核心逻辑.
//!
//! 实现 解封装 → 解码 → (渲染 | 取回原始字节) 管线.
//! 单线程协作式: 调用线程在同一循环中轮询输入和输出, 每次轮询只等待很短的固定超时,
//! 使循环始终能响应总超时.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, trace, warn};
use yan_codec::media_format::{KEY_FRAME_RATE, KEY_MAX_HEIGHT, KEY_MAX_WIDTH, KEY_MIME};
use yan_codec::media_format::{KEY_HEIGHT, KEY_WIDTH};
use yan_codec::{
    BufferFlags, BufferInfo, CodecRegistry, ExtractorSource, MediaCodec, MediaExtractor,
    MediaFormat, OutputStatus, Surface,
};
use yan_core::{YanError, YanResult};
use yan_format::VideoFormat;

use crate::config::PlayerConfig;
use crate::pacing::FramePacer;
use crate::platform::{BufferAccess, PlatformQuirks};
use crate::result::PlayerResult;
use crate::state::PlayerState;

/// 单次出队的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dequeue {
    /// 取到并归还了一帧
    Frame,
    /// 暂无可计数的输出
    Miss,
    /// 流结束
    EndOfStream,
}

/// 解码驱动
///
/// 独占一对解封装器 + 解码器句柄, 其他组件不持有它们的引用.
/// `release()` 保证两者各自只释放一次, 包括部分初始化失败的情况; 析构时也会调用.
pub struct SimplePlayer {
    registry: Arc<CodecRegistry>,
    source: Arc<dyn ExtractorSource>,
    config: PlayerConfig,
    quirks: PlatformQuirks,
    state: PlayerState,
    decoder: Option<Box<dyn MediaCodec>>,
    extractor: Option<Box<dyn MediaExtractor>>,
    track_index: Option<usize>,
    surface: Option<Surface>,
    /// 解封装器已耗尽, 已送出流结束输入
    input_eos: bool,
    frames_decoded: u32,
    /// 未渲染时最后一帧的原始字节
    last_output: Option<Vec<u8>>,
}

impl SimplePlayer {
    pub fn new(
        registry: Arc<CodecRegistry>,
        source: Arc<dyn ExtractorSource>,
        config: PlayerConfig,
    ) -> Self {
        let quirks = PlatformQuirks::resolve(config.api_level);
        Self {
            registry,
            source,
            config,
            quirks,
            state: PlayerState::Uninitialized,
            decoder: None,
            extractor: None,
            track_index: None,
            surface: None,
            input_eos: false,
            frames_decoded: 0,
            last_output: None,
        }
    }

    /// 指定解码器名称, 跳过按格式查找
    pub fn with_codec_name(mut self, name: impl Into<String>) -> Self {
        self.config.codec_name = Some(name.into());
        self
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// 最近一次解码循环计数的帧数
    pub fn frames_decoded(&self) -> u32 {
        self.frames_decoded
    }

    /// 选中的轨道索引
    pub fn track_index(&self) -> Option<usize> {
        self.track_index
    }

    /// 未渲染到 Surface 时, 最后一帧输出的原始字节
    pub fn last_output(&self) -> Option<&[u8]> {
        self.last_output.as_deref()
    }

    /// 解码指定数量的帧: 准备 → 启动 → 解码 → 释放
    ///
    /// 总超时为 `max(min_ms_per_frame, cap) * num_frames + startup_allow_ms`.
    /// `ms_per_frame_cap` 小于 1 时不限制帧间隔.
    pub fn decode_video_frames(
        &mut self,
        surface: Option<Surface>,
        format: &VideoFormat,
        num_frames: u32,
        ms_per_frame_cap: u64,
    ) -> PlayerResult {
        let result = if self.prepare(surface, format).is_err() {
            PlayerResult::default()
        } else if self.start().is_err() {
            PlayerResult::fail_to_start()
        } else {
            let timeout_ms = self.config.decode_timeout_ms(num_frames, ms_per_frame_cap);
            self.decode(num_frames, timeout_ms, ms_per_frame_cap)
        };
        self.release();
        info!("{} 解码结果: {result}", format.to_pretty_string());
        result
    }

    /// 打开媒体源, 选择轨道, 创建并配置解码器
    ///
    /// 失败时释放已获取的资源并进入 `Released`.
    pub fn prepare(&mut self, surface: Option<Surface>, format: &VideoFormat) -> YanResult<()> {
        if self.state != PlayerState::Uninitialized {
            return Err(YanError::IllegalState(format!(
                "prepare: 当前状态 {}",
                self.state
            )));
        }
        match self.try_prepare(surface, format) {
            Ok(()) => {
                self.state = PlayerState::Prepared;
                debug!("准备完成: {}", format.to_pretty_string());
                Ok(())
            }
            Err(e) => {
                error!("准备解码 {} 失败: {e}", format.filename());
                self.release();
                Err(e)
            }
        }
    }

    fn try_prepare(&mut self, surface: Option<Surface>, format: &VideoFormat) -> YanResult<()> {
        let extractor = self.source.open(format.filename())?;
        let extractor = self.extractor.insert(extractor);

        let media_type = format.media_type();
        let track_index = (0..extractor.track_count())
            .find(|&i| {
                extractor
                    .track_format(i)
                    .is_ok_and(|f| f.mime().is_some_and(|m| media_type.matches_mime(m)))
            })
            .ok_or_else(|| {
                YanError::TrackNotFound(format!("{} 中没有{media_type}轨道", format.filename()))
            })?;
        extractor.select_track(track_index)?;
        let mut media_format = extractor.track_format(track_index)?;
        self.track_index = Some(track_index);

        self.apply_video_format(&mut media_format, format);
        self.surface = surface;

        let decoder = self.create_decoder(&mut media_format)?;
        let decoder = self.decoder.insert(decoder);
        debug!("使用解码器 {} 配置格式 {media_format}", decoder.name());
        if let Err(e) = decoder.configure(&media_format, self.surface.clone()) {
            if let Err(reset_err) = decoder.reset() {
                error!("重置解码器失败: {reset_err}");
            }
            return Err(e);
        }
        Ok(())
    }

    /// 用调用方的格式覆盖轨道格式, 并按需设置 ABR 最大尺寸提示
    fn apply_video_format(&self, media_format: &mut MediaFormat, format: &VideoFormat) {
        if let Some(mime) = format.mime_type() {
            media_format.set_string(KEY_MIME, mime);
        }
        if let Some(width) = format.width() {
            media_format.set_integer(KEY_WIDTH, i64::from(width));
        }
        if let Some(height) = format.height() {
            media_format.set_integer(KEY_HEIGHT, i64::from(height));
        }
        if !self.quirks.max_size_hints || !format.is_abr_enabled() {
            return;
        }
        let (Some(width), Some(height)) = (media_format.width(), media_format.height()) else {
            return;
        };
        let (max_width, max_height) = self
            .codec_max_size(media_format)
            .filter(|&(mw, mh)| mw >= width && mh >= height)
            .unwrap_or((width, height));
        media_format.set_integer(KEY_MAX_WIDTH, i64::from(max_width));
        media_format.set_integer(KEY_MAX_HEIGHT, i64::from(max_height));
        debug!("ABR 最大尺寸提示: {max_width}x{max_height}");
    }

    /// 将要使用的解码器支持的最大宽度及该宽度下的最大高度
    fn codec_max_size(&self, media_format: &MediaFormat) -> Option<(u32, u32)> {
        let mime = media_format.mime()?;
        let name = match &self.config.codec_name {
            Some(name) => name.clone(),
            None => self.registry.find_decoder_for_format(media_format)?,
        };
        let caps = self.registry.video_capabilities(&name, mime)?;
        let max_width = caps.supported_widths().upper;
        let max_height = caps.supported_heights_for(max_width)?.upper;
        Some((max_width, max_height))
    }

    fn create_decoder(&self, media_format: &mut MediaFormat) -> YanResult<Box<dyn MediaCodec>> {
        if let Some(name) = &self.config.codec_name {
            return self.registry.create_by_name(name);
        }
        if self.quirks.find_decoder_for_format {
            if self.quirks.strip_frame_rate {
                media_format.remove(KEY_FRAME_RATE);
            }
            let name = self
                .registry
                .find_decoder_for_format(media_format)
                .ok_or_else(|| YanError::CodecNotFound(format!("没有解码器支持 {media_format}")))?;
            return self.registry.create_by_name(&name);
        }
        let mime = media_format
            .mime()
            .ok_or_else(|| YanError::InvalidArgument("轨道格式缺少 MIME".into()))?;
        self.registry.create_decoder_by_type(mime)
    }

    /// 启动解码器; 失败时重置并释放
    pub fn start(&mut self) -> YanResult<()> {
        if self.state != PlayerState::Prepared {
            return Err(YanError::IllegalState(format!("start: 当前状态 {}", self.state)));
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return Err(YanError::Internal("已准备但没有解码器".into()));
        };
        if let Err(e) = decoder.start() {
            error!("启动解码器失败: {e}");
            if let Err(reset_err) = decoder.reset() {
                error!("重置解码器失败: {reset_err}");
            }
            self.release();
            return Err(e);
        }
        self.state = PlayerState::Running;
        Ok(())
    }

    /// 解码循环
    ///
    /// 在解码到 `num_frames` 帧、超过 `timeout_ms` (自循环开始计, 包含启动延迟)、
    /// 遇到流结束或输入出错之一时退出. 报告的时长从首个输出算起.
    pub fn decode(&mut self, num_frames: u32, timeout_ms: u64, ms_per_frame_cap: u64) -> PlayerResult {
        if !self.state.is_active() {
            warn!("decode: 当前状态 {}, 跳过解码", self.state);
            return match self.state {
                PlayerState::Prepared => PlayerResult::fail_to_start(),
                _ => PlayerResult::default(),
            };
        }

        let timeout = Duration::from_millis(timeout_ms);
        let mut pacer = FramePacer::new(
            Duration::from_millis(ms_per_frame_cap),
            self.config.pacing_slack(),
        );
        let mut first_output: Option<Instant> = None;
        self.frames_decoded = 0;

        let loop_start = Instant::now();
        let deadline = loop_start + timeout;
        while self.frames_decoded < num_frames && loop_start.elapsed() < timeout {
            if let Err(e) = self.queue_input() {
                error!("输入入队失败, 终止解码: {e}");
                break;
            }
            match self.dequeue_output() {
                Ok(Dequeue::EndOfStream) => {
                    debug!("收到流结束标志");
                    break;
                }
                Ok(Dequeue::Frame) => {
                    first_output.get_or_insert_with(Instant::now);
                    pacer.pace(deadline);
                    self.frames_decoded += 1;
                }
                Ok(Dequeue::Miss) => {}
                Err(e) => error!("输出出队失败: {e}"),
            }
        }

        let total_time_ms = first_output
            .map_or(PlayerResult::UNSET, |t| t.elapsed().as_millis() as i64);
        debug!(
            "解码循环结束: {}/{} 帧, 总耗时 {:?}, 首帧后 {total_time_ms}ms",
            self.frames_decoded,
            num_frames,
            loop_start.elapsed(),
        );
        PlayerResult::new(true, true, self.frames_decoded == num_frames, total_time_ms)
    }

    /// 尝试送入一个样本; 暂无空闲输入缓冲区不算错误
    fn queue_input(&mut self) -> YanResult<()> {
        if self.input_eos {
            return Ok(());
        }
        let (Some(decoder), Some(extractor)) = (self.decoder.as_mut(), self.extractor.as_mut())
        else {
            return Err(YanError::IllegalState("解码器或解封装器不存在".into()));
        };
        let timeout = self.config.dequeue_timeout();
        let Some(index) = decoder.dequeue_input_buffer(timeout)? else {
            return Ok(());
        };

        let buffer: &mut [u8] = match self.quirks.buffer_access {
            BufferAccess::Legacy => decoder
                .input_buffers()?
                .get_mut(index)
                .map(Vec::as_mut_slice)
                .ok_or_else(|| YanError::Codec(format!("输入缓冲区索引 {index} 越界")))?,
            BufferAccess::Direct => decoder.input_buffer(index)?,
        };
        match extractor.read_sample_data(buffer)? {
            Some(size) if size > 0 => {
                let pts = extractor.sample_time().unwrap_or(0);
                decoder.queue_input_buffer(index, 0, size, pts, BufferFlags::empty())?;
                extractor.advance();
                trace!("送入样本: size={size}, pts={pts}");
            }
            _ => {
                decoder.queue_input_buffer(index, 0, 0, 0, BufferFlags::END_OF_STREAM)?;
                self.input_eos = true;
                self.state = PlayerState::Draining;
                debug!("样本已读完, 送入流结束标志");
            }
        }
        Ok(())
    }

    /// 尝试取出一个输出; 渲染或复制其字节后归还
    fn dequeue_output(&mut self) -> YanResult<Dequeue> {
        let Some(decoder) = self.decoder.as_mut() else {
            return Err(YanError::IllegalState("解码器不存在".into()));
        };
        let mut info = BufferInfo::default();
        let status = decoder.dequeue_output_buffer(&mut info, self.config.dequeue_timeout())?;
        if info.is_end_of_stream() {
            return Ok(Dequeue::EndOfStream);
        }
        let OutputStatus::Buffer(index) = status else {
            trace!("输出状态: {status:?}");
            return Ok(Dequeue::Miss);
        };
        if info.size == 0 && self.quirks.zero_size_output_is_miss {
            decoder.release_output_buffer(index, false)?;
            return Ok(Dequeue::Miss);
        }

        let render = self.surface.is_some();
        if !render {
            let bytes = match self.quirks.buffer_access {
                BufferAccess::Legacy => decoder
                    .output_buffers()?
                    .get(index)
                    .and_then(|buf| buf.get(info.offset..info.offset + info.size))
                    .ok_or_else(|| YanError::Codec(format!("输出缓冲区 {index} 范围无效")))?,
                BufferAccess::Direct => decoder.output_buffer(index)?,
            };
            self.last_output = Some(bytes.to_vec());
        }
        decoder.release_output_buffer(index, render)?;
        Ok(Dequeue::Frame)
    }

    /// 释放解码器与解封装器
    ///
    /// 依次停止 (失败时重置) 并释放解码器, 再释放解封装器. 所有错误只记录不传播.
    /// 可重复调用.
    pub fn release(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            if let Err(e) = decoder.stop() {
                warn!("停止解码器失败: {e}");
                if let Err(e) = decoder.reset() {
                    error!("重置解码器失败: {e}");
                }
            }
            if let Err(e) = decoder.release() {
                error!("释放解码器失败: {e}");
            }
        }
        if let Some(mut extractor) = self.extractor.take() {
            if let Err(e) = extractor.release() {
                error!("释放解封装器失败: {e}");
            }
        }
        if self.state != PlayerState::Released {
            debug!("解码会话释放 (之前状态: {})", self.state);
            self.state = PlayerState::Released;
        }
        self.surface = None;
    }
}

impl Drop for SimplePlayer {
    fn drop(&mut self) {
        self.release();
    }
}
