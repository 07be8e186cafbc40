//! ARGB 位图.
//!
//! 解码输出截图与参考图像共用的光栅类型. 像素按行主序存储,
//! 每个像素为打包的 32 位 `0xAARRGGBB`.

use crate::error::{YanError, YanResult};

/// 打包颜色工具 (`0xAARRGGBB`)
pub mod color {
    /// 由 4 个分量打包颜色
    #[inline]
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
        ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }

    /// 由 RGB 打包不透明颜色
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
        argb(0xFF, r, g, b)
    }

    #[inline]
    pub const fn alpha(c: u32) -> u8 {
        (c >> 24) as u8
    }

    #[inline]
    pub const fn red(c: u32) -> u8 {
        (c >> 16) as u8
    }

    #[inline]
    pub const fn green(c: u32) -> u8 {
        (c >> 8) as u8
    }

    #[inline]
    pub const fn blue(c: u32) -> u8 {
        c as u8
    }

    /// 不透明黑色
    pub const BLACK: u32 = rgb(0, 0, 0);
    /// 不透明白色
    pub const WHITE: u32 = rgb(255, 255, 255);
}

/// ARGB 位图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Bitmap {
    /// 创建全透明黑色位图
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// 创建纯色位图
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// 从行主序像素数组创建位图
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> YanResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(YanError::InvalidArgument(format!(
                "像素数量 {} 与尺寸 {}x{} 不符",
                pixels.len(),
                width,
                height,
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 读取像素
    ///
    /// 坐标越界时 panic, 与切片索引行为一致.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "像素坐标越界: ({x}, {y})");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// 写入像素
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        assert!(x < self.width && y < self.height, "像素坐标越界: ({x}, {y})");
        self.pixels[y as usize * self.width as usize + x as usize] = color;
    }

    /// 全部像素 (行主序)
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// 尺寸与像素内容是否完全相同
    pub fn same_as(&self, other: &Bitmap) -> bool {
        self == other
    }
}
