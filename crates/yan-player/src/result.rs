//! 解码会话结果.

use std::fmt;

/// 一次解码会话的结构化结果
///
/// 每个会话只产生一次, 构造后不可修改, 以值的形式返回给调用方.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerResult {
    configure_success: bool,
    start_success: bool,
    decode_success: bool,
    /// 从首个输出到循环结束的毫秒数, 未产生输出时为 [`PlayerResult::UNSET`]
    total_time_ms: i64,
}

impl PlayerResult {
    /// 未设置的时长
    pub const UNSET: i64 = -1;

    pub fn new(
        configure_success: bool,
        start_success: bool,
        decode_success: bool,
        total_time_ms: i64,
    ) -> Self {
        Self {
            configure_success,
            start_success,
            decode_success,
            total_time_ms,
        }
    }

    /// 配置成功但启动失败
    pub fn fail_to_start() -> Self {
        Self::new(true, false, false, Self::UNSET)
    }

    pub fn is_configure_success(&self) -> bool {
        self.configure_success
    }

    pub fn is_start_success(&self) -> bool {
        self.start_success
    }

    pub fn is_decode_success(&self) -> bool {
        self.decode_success
    }

    pub fn total_time(&self) -> i64 {
        self.total_time_ms
    }

    pub fn is_success(&self) -> bool {
        self.configure_success
            && self.start_success
            && self.decode_success
            && self.total_time_ms != Self::UNSET
    }

    /// 第一个失败阶段的描述
    pub fn failure_message(&self) -> &'static str {
        if !self.configure_success {
            "配置解码器失败"
        } else if !self.start_success {
            "启动解码器失败"
        } else if !self.decode_success {
            "未能解码预期数量的帧"
        } else {
            "未能完成解码"
        }
    }
}

impl Default for PlayerResult {
    fn default() -> Self {
        Self::new(false, false, false, Self::UNSET)
    }
}

impl fmt::Display for PlayerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "configure={}, start={}, decode={}, time={}ms",
            self.configure_success, self.start_success, self.decode_success, self.total_time_ms,
        )
    }
}
