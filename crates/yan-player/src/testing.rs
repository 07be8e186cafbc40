//! 测试辅助: 可编排行为的解码器与内存素材.
//!
//! 注册表只接受函数指针工厂, 因此脚本经线程局部变量传给工厂.
//! 每个测试在自己的线程上运行, 互不干扰.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use yan_codec::soft::{MemoryAssets, MemoryTrack};
use yan_codec::{
    BufferFlags, BufferInfo, CodecRegistry, IntRange, MediaCodec, MediaFormat, OutputStatus,
    Surface, VideoCapabilities,
};
use yan_core::{PixelFormat, YanError, YanResult, mime};

/// 解码器行为脚本
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub fail_configure: bool,
    pub fail_start: bool,
    pub fail_queue: bool,
    pub fail_stop: bool,
    /// 每第 N 次输出出队返回错误 (0 表示不出错)
    pub fail_dequeue_every: usize,
    /// 每第 N 次输出出队报告大小为 0 (0 表示不出现)
    pub zero_size_every: usize,
    /// 从不产生输出
    pub never_output: bool,
}

/// 调用记录
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<&'static str>>,
    release_output_times: Mutex<Vec<Instant>>,
    configured: Mutex<Option<MediaFormat>>,
}

impl CallLog {
    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    pub fn release_output_times(&self) -> Vec<Instant> {
        self.release_output_times.lock().unwrap().clone()
    }

    pub fn configured_format(&self) -> Option<MediaFormat> {
        self.configured.lock().unwrap().clone()
    }
}

thread_local! {
    static SCRIPT: RefCell<Option<(Script, Arc<CallLog>)>> = const { RefCell::new(None) };
}

/// 为当前线程安装脚本, 返回其调用记录
pub fn install_script(script: Script) -> Arc<CallLog> {
    let log = Arc::new(CallLog::default());
    SCRIPT.with(|s| *s.borrow_mut() = Some((script, Arc::clone(&log))));
    log
}

/// 按脚本行动的解码器
pub struct ScriptedCodec {
    script: Script,
    log: Arc<CallLog>,
    configured: bool,
    started: bool,
    input_eos: bool,
    /// 待输出: (pts, 数据), None 表示流结束
    pending: VecDeque<Option<(i64, Vec<u8>)>>,
    buffers: Vec<Vec<u8>>,
    output_size: usize,
    dequeue_count: usize,
}

impl ScriptedCodec {
    pub const NAME: &'static str = "yan.scripted.decoder";
    const INPUT: usize = 0;
    const OUTPUT: usize = 1;

    pub fn create() -> YanResult<Box<dyn MediaCodec>> {
        let (script, log) = SCRIPT.with(|s| {
            s.borrow()
                .clone()
                .unwrap_or_else(|| (Script::default(), Arc::new(CallLog::default())))
        });
        Ok(Box::new(Self {
            script,
            log,
            configured: false,
            started: false,
            input_eos: false,
            pending: VecDeque::new(),
            buffers: vec![vec![0u8; 256]; 2],
            output_size: 0,
            dequeue_count: 0,
        }))
    }

    fn require_started(&self) -> YanResult<()> {
        if !self.started {
            return Err(YanError::IllegalState("未启动".into()));
        }
        Ok(())
    }
}

impl MediaCodec for ScriptedCodec {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn configure(&mut self, format: &MediaFormat, _surface: Option<Surface>) -> YanResult<()> {
        self.log.record("configure");
        *self.log.configured.lock().unwrap() = Some(format.clone());
        if self.script.fail_configure {
            return Err(YanError::Codec("脚本: 配置失败".into()));
        }
        self.configured = true;
        Ok(())
    }

    fn start(&mut self) -> YanResult<()> {
        self.log.record("start");
        if self.script.fail_start || !self.configured {
            return Err(YanError::Codec("脚本: 启动失败".into()));
        }
        self.started = true;
        Ok(())
    }

    fn dequeue_input_buffer(&mut self, _timeout: Duration) -> YanResult<Option<usize>> {
        self.require_started()?;
        Ok((!self.input_eos).then_some(Self::INPUT))
    }

    fn input_buffer(&mut self, index: usize) -> YanResult<&mut [u8]> {
        self.require_started()?;
        Ok(&mut self.buffers[index])
    }

    fn input_buffers(&mut self) -> YanResult<&mut [Vec<u8>]> {
        self.require_started()?;
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
        self.log.record("queue");
        if self.script.fail_queue {
            return Err(YanError::IllegalState("脚本: 入队失败".into()));
        }
        if flags.contains(BufferFlags::END_OF_STREAM) {
            self.input_eos = true;
            self.pending.push_back(None);
        } else {
            let data = self.buffers[index][offset..offset + size].to_vec();
            self.pending.push_back(Some((presentation_time_us, data)));
        }
        Ok(())
    }

    fn dequeue_output_buffer(
        &mut self,
        info: &mut BufferInfo,
        _timeout: Duration,
    ) -> YanResult<OutputStatus> {
        self.require_started()?;
        self.log.record("dequeue_output");
        self.dequeue_count += 1;
        let n = self.dequeue_count;
        if self.script.never_output {
            return Ok(OutputStatus::TryAgainLater);
        }
        if self.script.fail_dequeue_every > 0 && n % self.script.fail_dequeue_every == 0 {
            return Err(YanError::Codec("脚本: 出队失败".into()));
        }
        match self.pending.pop_front() {
            None => Ok(OutputStatus::TryAgainLater),
            Some(None) => {
                *info = BufferInfo {
                    flags: BufferFlags::END_OF_STREAM,
                    ..BufferInfo::default()
                };
                Ok(OutputStatus::Buffer(Self::OUTPUT))
            }
            Some(Some((pts, data))) => {
                let zero = self.script.zero_size_every > 0 && n % self.script.zero_size_every == 0;
                let size = if zero { 0 } else { data.len() };
                self.buffers[Self::OUTPUT][..data.len()].copy_from_slice(&data);
                self.output_size = size;
                *info = BufferInfo {
                    offset: 0,
                    size,
                    presentation_time_us: pts,
                    flags: BufferFlags::KEY_FRAME,
                };
                Ok(OutputStatus::Buffer(Self::OUTPUT))
            }
        }
    }

    fn output_buffer(&self, index: usize) -> YanResult<&[u8]> {
        self.require_started()?;
        Ok(&self.buffers[index][..self.output_size])
    }

    fn output_buffers(&self) -> YanResult<&[Vec<u8>]> {
        self.require_started()?;
        Ok(&self.buffers)
    }

    fn release_output_buffer(&mut self, _index: usize, _render: bool) -> YanResult<()> {
        self.require_started()?;
        self.log.record("release_output");
        self.log.release_output_times.lock().unwrap().push(Instant::now());
        Ok(())
    }

    fn stop(&mut self) -> YanResult<()> {
        self.log.record("stop");
        if self.script.fail_stop || !self.configured {
            return Err(YanError::IllegalState("脚本: 停止失败".into()));
        }
        self.started = false;
        Ok(())
    }

    fn reset(&mut self) -> YanResult<()> {
        self.log.record("reset");
        self.configured = false;
        self.started = false;
        self.pending.clear();
        Ok(())
    }

    fn release(&mut self) -> YanResult<()> {
        self.log.record("release");
        Ok(())
    }
}

/// 脚本解码器声明的能力
pub fn scripted_capabilities() -> VideoCapabilities {
    VideoCapabilities::new(IntRange::new(2, 1920), IntRange::new(2, 1080))
}

/// 内置解码器 + 脚本解码器
pub fn test_registry() -> Arc<CodecRegistry> {
    let mut registry = CodecRegistry::new();
    yan_codec::register_all(&mut registry);
    registry.register_decoder(
        ScriptedCodec::NAME,
        mime::VIDEO_RAW,
        scripted_capabilities(),
        ScriptedCodec::create,
    );
    Arc::new(registry)
}

/// 只有脚本解码器的注册表, 按格式查找时必然选中它
pub fn scripted_registry() -> Arc<CodecRegistry> {
    let mut registry = CodecRegistry::new();
    registry.register_decoder(
        ScriptedCodec::NAME,
        mime::VIDEO_RAW,
        scripted_capabilities(),
        ScriptedCodec::create,
    );
    Arc::new(registry)
}

/// 含一条 RAW 视频轨道的素材, 第 i 帧所有字节为 i
pub fn raw_assets(name: &str, width: u32, height: u32, frames: usize) -> MemoryAssets {
    let size = PixelFormat::Yuv420p.frame_size(width, height).unwrap();
    let data = (0..frames).map(|i| vec![i as u8; size]).collect();
    let mut assets = MemoryAssets::new();
    assets.insert(name, vec![MemoryTrack::raw_video(width, height, data, 30).unwrap()]);
    assets
}
