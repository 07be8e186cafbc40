//! 输出帧间隔控制.
//!
//! 先粗睡眠 (预留少量余量避免睡过头), 再忙等到目标间隔,
//! 以 CPU 时间换取计时精度.

use std::hint;
use std::thread;
use std::time::{Duration, Instant};

/// 帧间隔控制器
#[derive(Debug, Clone)]
pub struct FramePacer {
    /// 相邻两帧的最小间隔, 为 0 时不限制
    cap: Duration,
    /// 粗睡眠预留的余量
    slack: Duration,
    /// 上一帧放行的时刻
    last_frame: Option<Instant>,
}

impl FramePacer {
    pub fn new(cap: Duration, slack: Duration) -> Self {
        Self {
            cap,
            slack,
            last_frame: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.cap.is_zero()
    }

    /// 等待到距上一帧至少 `cap` 后放行本帧, 返回实际等待时长
    ///
    /// 第一帧不等待. 未启用时立即返回. 等待不会越过 `deadline`.
    pub fn pace(&mut self, deadline: Instant) -> Duration {
        if !self.is_enabled() {
            return Duration::ZERO;
        }
        let start = Instant::now();
        if let Some(last) = self.last_frame {
            let target = (last + self.cap).min(deadline);
            if target > start {
                let delay = target - start;
                if delay > self.slack {
                    thread::sleep(delay - self.slack);
                }
                while Instant::now() < target {
                    hint::spin_loop();
                }
            }
        }
        let now = Instant::now();
        self.last_frame = Some(now);
        now - start
    }
}
