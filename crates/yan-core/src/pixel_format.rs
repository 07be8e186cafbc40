//! 像素格式定义.
//!
//! 描述未压缩视频帧中像素的存储方式. 软件直通解码器据此计算帧大小,
//! 比较器据此把解码输出转换为 ARGB 位图.

use std::fmt;

/// 像素格式
///
/// 命名规则: 颜色空间 + 排列方式 (P=Planar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// 未指定
    None,
    /// YUV 4:2:0 平面格式, 8 位 (I420)
    Yuv420p,
    /// NV12: Y 平面 + UV 交错, 4:2:0, 8 位
    Nv12,
    /// RGB 各 8 位, 打包
    Rgb24,
    /// RGBA 各 8 位, 打包
    Rgba,
    /// 灰度 8 位
    Gray8,
}

impl PixelFormat {
    /// 平面数量
    pub const fn plane_count(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Yuv420p => 3,
            Self::Nv12 => 2,
            Self::Rgb24 | Self::Rgba | Self::Gray8 => 1,
        }
    }

    /// 是否为 4:2:0 色度子采样
    pub const fn is_yuv420(&self) -> bool {
        matches!(self, Self::Yuv420p | Self::Nv12)
    }

    /// 计算指定平面每行的字节数
    ///
    /// 色度平面宽度向上取整, 奇数宽度的最后一列也有对应色度样本.
    ///
    /// # 返回
    /// - `Some(bytes)`: 该平面每行的字节数
    /// - `None`: 格式为 None 或平面索引超出范围
    pub fn plane_linesize(&self, plane: usize, width: u32) -> Option<usize> {
        if plane >= self.plane_count() as usize {
            return None;
        }
        let w = width as usize;
        let chroma_w = w.div_ceil(2);
        Some(match self {
            Self::Yuv420p => {
                if plane == 0 {
                    w
                } else {
                    chroma_w
                }
            }
            // plane1 为 UV 交错, 每个色度样本 2 字节
            Self::Nv12 => {
                if plane == 0 {
                    w
                } else {
                    chroma_w * 2
                }
            }
            Self::Rgb24 => w * 3,
            Self::Rgba => w * 4,
            Self::Gray8 => w,
            Self::None => return None,
        })
    }

    /// 计算指定平面的行数
    pub fn plane_height(&self, plane: usize, height: u32) -> Option<usize> {
        if plane >= self.plane_count() as usize {
            return None;
        }
        let h = height as usize;
        Some(if self.is_yuv420() && plane > 0 {
            h.div_ceil(2)
        } else {
            h
        })
    }

    /// 计算整帧的字节数
    ///
    /// # 返回
    /// - `Some(bytes)`: 整帧字节数
    /// - `None`: 格式为 None
    pub fn frame_size(&self, width: u32, height: u32) -> Option<usize> {
        if *self == Self::None {
            return None;
        }
        let mut total = 0usize;
        for plane in 0..self.plane_count() as usize {
            let linesize = self.plane_linesize(plane, width)?;
            let plane_h = self.plane_height(plane, height)?;
            total += linesize * plane_h;
        }
        Some(total)
    }

    /// 从名称解析 (与 `Display` 输出一致)
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "yuv420p" => Self::Yuv420p,
            "nv12" => Self::Nv12,
            "rgb24" => Self::Rgb24,
            "rgba" => Self::Rgba,
            "gray8" => Self::Gray8,
            _ => return None,
        })
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Yuv420p => "yuv420p",
            Self::Nv12 => "nv12",
            Self::Rgb24 => "rgb24",
            Self::Rgba => "rgba",
            Self::Gray8 => "gray8",
        };
        write!(f, "{name}")
    }
}
