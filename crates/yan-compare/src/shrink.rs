//! 裁边后双线性放大.
//!
//! 从每条边裁去指定宽度 (可为小数), 再把剩余区域双线性插值放大回原尺寸,
//! 模拟纹理采样时半纹素/整纹素的偏移.

use yan_core::{Bitmap, color};

/// 采样步长: 输出 `n` 个点均匀覆盖 `[border, n - 1 - border]`
///
/// 尺寸为 1 时只有一个采样点, 步长为 0.
fn sample_step(size: u32, border: f64) -> f64 {
    if size <= 1 {
        return 0.0;
    }
    let last = f64::from(size - 1);
    (last - border * 2.0) / last
}

/// 裁边并双线性放大回原尺寸
///
/// 第一个采样点为 `(horizontal, vertical)`, 之后按步长累加.
/// 四邻域索引夹到图像范围内, 每个 RGB 分量独立插值后四舍五入,
/// 输出像素不透明 (alpha 为 0xFF).
pub fn shrink_and_scale_bilinear(input: &Bitmap, horizontal: f64, vertical: f64) -> Bitmap {
    let width = input.width();
    let height = input.height();
    if width == 0 || height == 0 {
        return input.clone();
    }

    let x_inc = sample_step(width, horizontal);
    let y_inc = sample_step(height, vertical);
    let max_x = width as usize - 1;
    let max_y = height as usize - 1;
    let w = width as usize;

    let rgb: Vec<[f64; 3]> = input
        .pixels()
        .iter()
        .map(|&p| {
            [
                f64::from(color::red(p)),
                f64::from(color::green(p)),
                f64::from(color::blue(p)),
            ]
        })
        .collect();

    let mut output = Bitmap::new(width, height);
    let mut y = vertical;
    for y_index in 0..height {
        let mut x = horizontal;
        for x_index in 0..width {
            let left = x.floor().max(0.0) as usize;
            let top = y.floor().max(0.0) as usize;
            let u = x - left as f64;
            let v = y - top as f64;

            let p00 = (1.0 - u) * (1.0 - v);
            let p01 = (1.0 - u) * v;
            let p10 = u * (1.0 - v);
            let p11 = u * v;

            // 舍入误差可能让索引越界
            let right = (left + 1).min(max_x);
            let bottom = (top + 1).min(max_y);
            let left = left.min(max_x);
            let top = top.min(max_y);

            let c00 = &rgb[top * w + left];
            let c01 = &rgb[bottom * w + left];
            let c10 = &rgb[top * w + right];
            let c11 = &rgb[bottom * w + right];

            let mix = |k: usize| -> u8 {
                let value = p00 * c00[k] + p01 * c01[k] + p10 * c10[k] + p11 * c11[k];
                value.round().clamp(0.0, 255.0) as u8
            };
            output.set_pixel(x_index, y_index, color::rgb(mix(0), mix(1), mix(2)));
            x += x_inc;
        }
        y += y_inc;
    }
    output
}
