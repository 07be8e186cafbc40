//! 渲染目标句柄.
//!
//! 渲染目标是外部资源 (视图、纹理等), 本框架只持有不透明句柄,
//! 从不等待其就绪. 解码器在 `release_output_buffer(index, true)` 时把帧交给它.

use std::fmt;
use std::sync::Arc;

use crate::buffer::BufferInfo;

/// 渲染目标
pub trait RenderTarget: Send + Sync {
    /// 目标名称 (用于日志)
    fn name(&self) -> &str;

    /// 接收一帧已解码数据
    fn render(&self, frame: &[u8], info: &BufferInfo);
}

/// 渲染目标句柄 (可廉价克隆)
#[derive(Clone)]
pub struct Surface {
    target: Arc<dyn RenderTarget>,
}

impl Surface {
    pub fn new(target: Arc<dyn RenderTarget>) -> Self {
        Self { target }
    }

    pub fn name(&self) -> &str {
        self.target.name()
    }

    pub fn render(&self, frame: &[u8], info: &BufferInfo) {
        self.target.render(frame, info);
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("target", &self.target.name())
            .finish()
    }
}
