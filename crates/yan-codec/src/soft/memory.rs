//! 内存媒体源与解封装器.
//!
//! 轨道与样本全部保存在内存中, 以名称 (通常是测试文件名) 索引.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use log::debug;
use yan_core::{PixelFormat, YanError, YanResult, mime};

use crate::buffer::BufferFlags;
use crate::extractor::{ExtractorSource, MediaExtractor};
use crate::media_format::{KEY_COLOR_FORMAT, KEY_FRAME_RATE, MediaFormat};

/// 一个压缩样本
#[derive(Debug, Clone)]
pub struct MemorySample {
    /// 样本数据
    pub data: Bytes,
    /// 显示时间戳 (微秒)
    pub pts_us: i64,
    /// 标志
    pub flags: BufferFlags,
}

/// 一条轨道: 格式 + 按解码顺序排列的样本
#[derive(Debug, Clone)]
pub struct MemoryTrack {
    pub format: MediaFormat,
    pub samples: Vec<MemorySample>,
}

impl MemoryTrack {
    pub fn new(format: MediaFormat) -> Self {
        Self {
            format,
            samples: Vec::new(),
        }
    }

    /// 追加样本
    pub fn push_sample(&mut self, data: impl Into<Bytes>, pts_us: i64, flags: BufferFlags) {
        self.samples.push(MemorySample {
            data: data.into(),
            pts_us,
            flags,
        });
    }

    /// 由若干 yuv420p 帧构造 RAW 视频轨道
    ///
    /// 时间戳按 `fps` 等间隔递增. 每帧大小必须等于 `width x height` 的 yuv420p 帧大小.
    pub fn raw_video(width: u32, height: u32, frames: Vec<Vec<u8>>, fps: u32) -> YanResult<Self> {
        let frame_size = PixelFormat::Yuv420p
            .frame_size(width, height)
            .ok_or_else(|| YanError::InvalidArgument(format!("无效尺寸 {width}x{height}")))?;
        if fps == 0 {
            return Err(YanError::InvalidArgument("帧率不能为 0".into()));
        }

        let mut format = MediaFormat::new_video(mime::VIDEO_RAW, width, height);
        format.set_integer(KEY_FRAME_RATE, i64::from(fps));
        format.set_string(KEY_COLOR_FORMAT, PixelFormat::Yuv420p.to_string());

        let mut track = Self::new(format);
        let frame_us = 1_000_000 / i64::from(fps);
        for (i, frame) in frames.into_iter().enumerate() {
            if frame.len() != frame_size {
                return Err(YanError::InvalidData(format!(
                    "第 {i} 帧大小 {} 与预期 {frame_size} 不符",
                    frame.len(),
                )));
            }
            track.push_sample(frame, i as i64 * frame_us, BufferFlags::KEY_FRAME);
        }
        Ok(track)
    }
}

/// 内存解封装器
pub struct MemoryExtractor {
    tracks: Arc<Vec<MemoryTrack>>,
    /// 已选中的轨道
    selected: Option<usize>,
    /// 当前样本位置
    cursor: usize,
    released: bool,
}

impl MemoryExtractor {
    pub fn new(tracks: Vec<MemoryTrack>) -> Self {
        Self::from_shared(Arc::new(tracks))
    }

    fn from_shared(tracks: Arc<Vec<MemoryTrack>>) -> Self {
        Self {
            tracks,
            selected: None,
            cursor: 0,
            released: false,
        }
    }

    fn current(&self) -> Option<&MemorySample> {
        let track = &self.tracks[self.selected?];
        track.samples.get(self.cursor)
    }

    fn check_alive(&self) -> YanResult<()> {
        if self.released {
            return Err(YanError::IllegalState("解封装器已释放".into()));
        }
        Ok(())
    }
}

impl MediaExtractor for MemoryExtractor {
    fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn track_format(&self, index: usize) -> YanResult<MediaFormat> {
        self.tracks
            .get(index)
            .map(|t| t.format.clone())
            .ok_or_else(|| YanError::InvalidArgument(format!("轨道索引 {index} 越界")))
    }

    fn select_track(&mut self, index: usize) -> YanResult<()> {
        self.check_alive()?;
        if index >= self.tracks.len() {
            return Err(YanError::InvalidArgument(format!("轨道索引 {index} 越界")));
        }
        self.selected = Some(index);
        self.cursor = 0;
        Ok(())
    }

    fn read_sample_data(&mut self, buf: &mut [u8]) -> YanResult<Option<usize>> {
        self.check_alive()?;
        if self.selected.is_none() {
            return Err(YanError::IllegalState("尚未选择轨道".into()));
        }
        let Some(sample) = self.current() else {
            return Ok(None);
        };
        let size = sample.data.len();
        if buf.len() < size {
            return Err(YanError::InvalidArgument(format!(
                "缓冲区过小: 需要 {size}, 实际 {}",
                buf.len(),
            )));
        }
        buf[..size].copy_from_slice(&sample.data);
        Ok(Some(size))
    }

    fn sample_time(&self) -> Option<i64> {
        if self.released {
            return None;
        }
        self.current().map(|s| s.pts_us)
    }

    fn advance(&mut self) -> bool {
        if self.released {
            return false;
        }
        let Some(track) = self.selected.map(|i| &self.tracks[i]) else {
            return false;
        };
        if self.cursor < track.samples.len() {
            self.cursor += 1;
        }
        self.cursor < track.samples.len()
    }

    fn release(&mut self) -> YanResult<()> {
        self.released = true;
        self.selected = None;
        Ok(())
    }
}

/// 内存媒体源: 名称 → 轨道列表
#[derive(Default)]
pub struct MemoryAssets {
    assets: HashMap<String, Arc<Vec<MemoryTrack>>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加 (或替换) 一个媒体
    pub fn insert(&mut self, name: impl Into<String>, tracks: Vec<MemoryTrack>) {
        self.assets.insert(name.into(), Arc::new(tracks));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }
}

impl ExtractorSource for MemoryAssets {
    fn open(&self, name: &str) -> YanResult<Box<dyn MediaExtractor>> {
        let tracks = self
            .assets
            .get(name)
            .ok_or_else(|| YanError::SourceNotFound(name.to_string()))?;
        debug!("打开内存媒体 {name}: {} 条轨道", tracks.len());
        Ok(Box::new(MemoryExtractor::from_shared(Arc::clone(tracks))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frames(width: u32, height: u32, count: usize) -> Vec<Vec<u8>> {
        let size = PixelFormat::Yuv420p.frame_size(width, height).unwrap();
        (0..count).map(|i| vec![i as u8; size]).collect()
    }

    #[test]
    fn test_按顺序读取样本() {
        let track = MemoryTrack::raw_video(4, 2, gray_frames(4, 2, 3), 25).unwrap();
        let mut ext = MemoryExtractor::new(vec![track]);
        ext.select_track(0).unwrap();

        let mut buf = vec![0u8; 64];
        let mut pts = Vec::new();
        loop {
            match ext.read_sample_data(&mut buf).unwrap() {
                Some(size) => {
                    assert_eq!(size, 12);
                    assert_eq!(buf[0], pts.len() as u8);
                    pts.push(ext.sample_time().unwrap());
                }
                None => break,
            }
            ext.advance();
        }
        assert_eq!(pts, vec![0, 40_000, 80_000]);
        assert_eq!(ext.sample_time(), None);
        assert!(!ext.advance());
    }

    #[test]
    fn test_未选择轨道时读取失败() {
        let track = MemoryTrack::raw_video(2, 2, gray_frames(2, 2, 1), 30).unwrap();
        let mut ext = MemoryExtractor::new(vec![track]);
        let mut buf = [0u8; 16];
        assert!(matches!(
            ext.read_sample_data(&mut buf),
            Err(YanError::IllegalState(_))
        ));
        assert!(ext.select_track(1).is_err());
    }

    #[test]
    fn test_缓冲区过小() {
        let track = MemoryTrack::raw_video(4, 4, gray_frames(4, 4, 1), 30).unwrap();
        let mut ext = MemoryExtractor::new(vec![track]);
        ext.select_track(0).unwrap();
        let mut buf = [0u8; 4];
        assert!(matches!(
            ext.read_sample_data(&mut buf),
            Err(YanError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_帧大小不符拒绝构造() {
        let frames = vec![vec![0u8; 5]];
        assert!(MemoryTrack::raw_video(4, 2, frames, 30).is_err());
        assert!(MemoryTrack::raw_video(4, 2, Vec::new(), 0).is_err());
    }

    #[test]
    fn test_媒体源按名称打开() {
        let mut assets = MemoryAssets::new();
        let track = MemoryTrack::raw_video(2, 2, gray_frames(2, 2, 2), 30).unwrap();
        assets.insert("clip-raw_2x2_30.yuv", vec![track]);

        let ext = assets.open("clip-raw_2x2_30.yuv").unwrap();
        assert_eq!(ext.track_count(), 1);
        assert_eq!(
            ext.track_format(0).unwrap().mime(),
            Some(mime::VIDEO_RAW)
        );
        assert!(matches!(
            assets.open("missing.mp4"),
            Err(YanError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_释放后不可读取() {
        let track = MemoryTrack::raw_video(2, 2, gray_frames(2, 2, 1), 30).unwrap();
        let mut ext = MemoryExtractor::new(vec![track]);
        ext.select_track(0).unwrap();
        ext.release().unwrap();
        let mut buf = [0u8; 16];
        assert!(ext.read_sample_data(&mut buf).is_err());
        assert!(!ext.advance());
    }
}
