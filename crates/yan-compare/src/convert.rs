//! 原始帧 → ARGB 位图.
//!
//! 解码器输出按紧凑平面布局 (无行填充) 存储, 由像素格式决定平面数与行宽.
//! YUV → RGB 使用 BT.601 有限范围定点系数.

use yan_core::{Bitmap, PixelFormat, YanError, YanResult, color};

/// BT.601 定点逆变换
#[inline]
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> u32 {
    let y = i32::from(y);
    let u = i32::from(u) - 128;
    let v = i32::from(v) - 128;
    let r = (y + ((v * 359 + 128) >> 8)).clamp(0, 255);
    let g = (y - ((u * 88 + v * 183 + 128) >> 8)).clamp(0, 255);
    let b = (y + ((u * 454 + 128) >> 8)).clamp(0, 255);
    color::rgb(r as u8, g as u8, b as u8)
}

/// 校验数据长度并切出各平面
fn split_planes(
    data: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
) -> YanResult<Vec<(&[u8], usize)>> {
    let expected = format
        .frame_size(width, height)
        .ok_or_else(|| YanError::Unsupported(format!("无法转换像素格式 {format}")))?;
    if data.len() < expected {
        return Err(YanError::InvalidData(format!(
            "帧数据长度 {} 小于 {}x{} {} 所需的 {}",
            data.len(),
            width,
            height,
            format,
            expected,
        )));
    }
    let mut planes = Vec::with_capacity(format.plane_count() as usize);
    let mut offset = 0;
    for plane in 0..format.plane_count() as usize {
        let linesize = format.plane_linesize(plane, width).unwrap_or(0);
        let rows = format.plane_height(plane, height).unwrap_or(0);
        let len = linesize * rows;
        planes.push((&data[offset..offset + len], linesize));
        offset += len;
    }
    Ok(planes)
}

/// 把一帧原始数据转换为位图
///
/// 支持 yuv420p, nv12, rgb24, rgba, gray8. 数据长度不足时返回 `InvalidData`,
/// 多余的尾部字节被忽略.
pub fn frame_to_bitmap(
    data: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
) -> YanResult<Bitmap> {
    let planes = split_planes(data, width, height, format)?;
    let w = width as usize;
    let h = height as usize;
    let mut pixels = Vec::with_capacity(w * h);

    match format {
        PixelFormat::Yuv420p => {
            let (y_plane, y_stride) = planes[0];
            let (u_plane, u_stride) = planes[1];
            let (v_plane, v_stride) = planes[2];
            for row in 0..h {
                for col in 0..w {
                    pixels.push(yuv_to_rgb(
                        y_plane[row * y_stride + col],
                        u_plane[(row / 2) * u_stride + col / 2],
                        v_plane[(row / 2) * v_stride + col / 2],
                    ));
                }
            }
        }
        PixelFormat::Nv12 => {
            let (y_plane, y_stride) = planes[0];
            let (uv_plane, uv_stride) = planes[1];
            for row in 0..h {
                for col in 0..w {
                    let uv = (row / 2) * uv_stride + (col / 2) * 2;
                    pixels.push(yuv_to_rgb(
                        y_plane[row * y_stride + col],
                        uv_plane[uv],
                        uv_plane[uv + 1],
                    ));
                }
            }
        }
        PixelFormat::Rgb24 => {
            let (rgb, stride) = planes[0];
            for row in 0..h {
                for px in rgb[row * stride..row * stride + w * 3].chunks_exact(3) {
                    pixels.push(color::rgb(px[0], px[1], px[2]));
                }
            }
        }
        PixelFormat::Rgba => {
            let (rgba, stride) = planes[0];
            for row in 0..h {
                for px in rgba[row * stride..row * stride + w * 4].chunks_exact(4) {
                    pixels.push(color::argb(px[3], px[0], px[1], px[2]));
                }
            }
        }
        PixelFormat::Gray8 => {
            let (gray, stride) = planes[0];
            for row in 0..h {
                for &g in &gray[row * stride..row * stride + w] {
                    pixels.push(color::rgb(g, g, g));
                }
            }
        }
        _ => {
            return Err(YanError::Unsupported(format!(
                "无法转换像素格式 {format}"
            )));
        }
    }

    Bitmap::from_pixels(width, height, pixels)
}

/// YUV420P → 位图
pub fn yuv420p_to_bitmap(data: &[u8], width: u32, height: u32) -> YanResult<Bitmap> {
    frame_to_bitmap(data, width, height, PixelFormat::Yuv420p)
}

/// RGB24 → 位图
pub fn rgb24_to_bitmap(data: &[u8], width: u32, height: u32) -> YanResult<Bitmap> {
    frame_to_bitmap(data, width, height, PixelFormat::Rgb24)
}
