//! 解码驱动配置.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use yan_core::{YanError, YanResult};

/// 解码驱动配置
///
/// 所有字段都有默认值, JSON 中可只给出需要覆盖的部分.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// 目标平台 API 级别, 决定缓冲区访问方式等平台差异
    #[serde(default = "default_api_level")]
    pub api_level: u32,
    /// 指定解码器名称; 未指定时按格式查找
    #[serde(default)]
    pub codec_name: Option<String>,
    /// 输入/输出缓冲区单次轮询超时 (微秒)
    #[serde(default = "default_dequeue_timeout_us")]
    pub dequeue_timeout_us: u64,
    /// 计算总超时时每帧至少预留的时间 (毫秒)
    #[serde(default = "default_min_ms_per_frame")]
    pub min_ms_per_frame: u64,
    /// 计算总超时时为启动预留的时间 (毫秒)
    #[serde(default = "default_startup_allow_ms")]
    pub startup_allow_ms: u64,
    /// 帧间隔控制中粗睡眠预留的余量 (毫秒)
    #[serde(default = "default_pacing_slack_ms")]
    pub pacing_slack_ms: u64,
}

fn default_api_level() -> u32 {
    34
}

fn default_dequeue_timeout_us() -> u64 {
    20
}

fn default_min_ms_per_frame() -> u64 {
    200
}

fn default_startup_allow_ms() -> u64 {
    1000
}

fn default_pacing_slack_ms() -> u64 {
    3
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            api_level: default_api_level(),
            codec_name: None,
            dequeue_timeout_us: default_dequeue_timeout_us(),
            min_ms_per_frame: default_min_ms_per_frame(),
            startup_allow_ms: default_startup_allow_ms(),
            pacing_slack_ms: default_pacing_slack_ms(),
        }
    }
}

impl PlayerConfig {
    /// 从 JSON 文本加载
    pub fn from_json(text: &str) -> YanResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| YanError::InvalidArgument(format!("解析播放器配置失败: {e}")))
    }

    /// 单次轮询超时
    pub fn dequeue_timeout(&self) -> Duration {
        Duration::from_micros(self.dequeue_timeout_us)
    }

    /// 帧间隔控制余量
    pub fn pacing_slack(&self) -> Duration {
        Duration::from_millis(self.pacing_slack_ms)
    }

    /// 解码 `num_frames` 帧的总超时 (毫秒)
    ///
    /// `max(min_ms_per_frame, cap) * num_frames + startup_allow_ms`
    pub fn decode_timeout_ms(&self, num_frames: u32, ms_per_frame_cap: u64) -> u64 {
        self.min_ms_per_frame
            .max(ms_per_frame_cap)
            .saturating_mul(u64::from(num_frames))
            .saturating_add(self.startup_allow_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_默认值() {
        let config = PlayerConfig::default();
        assert_eq!(config.api_level, 34);
        assert_eq!(config.codec_name, None);
        assert_eq!(config.dequeue_timeout(), Duration::from_micros(20));
        assert_eq!(config.pacing_slack(), Duration::from_millis(3));
    }

    #[test]
    fn test_从_json_加载部分字段() {
        let config = PlayerConfig::from_json(r#"{"api_level": 19, "codec_name": "yan.raw.decoder"}"#)
            .unwrap();
        assert_eq!(config.api_level, 19);
        assert_eq!(config.codec_name.as_deref(), Some("yan.raw.decoder"));
        assert_eq!(config.min_ms_per_frame, 200);
        assert_eq!(config.startup_allow_ms, 1000);

        assert!(PlayerConfig::from_json("{api_level}").is_err());
    }

    #[test]
    fn test_总超时计算() {
        let config = PlayerConfig::default();
        // 未设帧间隔上限时按每帧 200ms 计
        assert_eq!(config.decode_timeout_ms(10, 0), 200 * 10 + 1000);
        // 上限更大时使用上限
        assert_eq!(config.decode_timeout_ms(10, 500), 500 * 10 + 1000);
        assert_eq!(config.decode_timeout_ms(0, 0), 1000);
    }
}
