//! 解码会话状态.

use std::fmt;

/// 解码会话状态
///
/// `Uninitialized → Prepared → Running → Draining → Released`.
/// 任一阶段失败都经清理路径直接进入 `Released`, 该状态不可离开.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    /// 尚未准备
    Uninitialized,
    /// 已打开媒体源并配置解码器
    Prepared,
    /// 解码器已启动
    Running,
    /// 输入已送完流结束标志, 等待剩余输出
    Draining,
    /// 资源已释放
    Released,
}

impl PlayerState {
    /// 是否可以执行解码循环
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Draining)
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "未初始化",
            Self::Prepared => "已准备",
            Self::Running => "运行中",
            Self::Draining => "排空中",
            Self::Released => "已释放",
        };
        write!(f, "{name}")
    }
}
