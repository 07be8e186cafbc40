//! 位图差异计算.

use std::collections::HashMap;
use std::fmt;
use std::ptr;

use log::trace;
use rayon::prelude::*;
use yan_core::Bitmap;

use crate::lab::{Lab, argb_to_lab, euclidean_distance};
use crate::shrink::shrink_and_scale_bilinear;

/// 裁边参数: 左右各裁 `horizontal` 像素, 上下各裁 `vertical` 像素
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderCrop {
    pub horizontal: f64,
    pub vertical: f64,
}

impl BorderCrop {
    pub const fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

impl fmt::Display for BorderCrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.horizontal, self.vertical)
    }
}

/// 两幅位图的差异
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difference {
    /// 最大像素差异; [`Difference::MAX_VALUE`] 表示无法比较
    pub greatest_pixel_difference: u32,
    /// 最大差异首次出现的位置 (列, 行); 无差异或无法比较时为 None
    pub worst_pixel: Option<(u32, u32)>,
    /// 取得该差异的裁边参数; None 表示未做变换
    pub best_match_crop: Option<BorderCrop>,
}

impl Difference {
    /// 输入缺失或尺寸不一致时的哨兵值
    ///
    /// 8 位输入在 Lab 空间中算出的差异不会超过约 200, 与哨兵值不会混淆.
    pub const MAX_VALUE: u32 = u32::MAX;

    /// 无法比较
    pub const fn incomparable() -> Self {
        Self {
            greatest_pixel_difference: Self::MAX_VALUE,
            worst_pixel: None,
            best_match_crop: None,
        }
    }

    /// 完全相同
    pub const fn identical() -> Self {
        Self {
            greatest_pixel_difference: 0,
            worst_pixel: None,
            best_match_crop: None,
        }
    }

    pub fn is_incomparable(&self) -> bool {
        self.greatest_pixel_difference == Self::MAX_VALUE
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_incomparable() {
            return write!(f, "无法比较");
        }
        write!(f, "最大差异 {}", self.greatest_pixel_difference)?;
        if let Some((x, y)) = self.worst_pixel {
            write!(f, " 位于 ({x}, {y})")?;
        }
        if let Some(crop) = self.best_match_crop {
            write!(f, ", 裁边 {crop}")?;
        }
        Ok(())
    }
}

/// 计算两幅位图的最大像素差异
///
/// - 任一输入缺失或尺寸不同: 返回哨兵值 [`Difference::MAX_VALUE`]
/// - 同一对象或内容完全相同: 返回 0
/// - 否则把每个像素转换到 L\*a\*b\* 并求欧氏距离 (四舍五入到整数), 取最大值
///
/// 颜色转换按像素值缓存, 缓存只在本次调用内有效.
pub fn compute_difference(a: Option<&Bitmap>, b: Option<&Bitmap>) -> Difference {
    let (Some(a), Some(b)) = (a, b) else {
        return Difference::incomparable();
    };
    if ptr::eq(a, b) || a.same_as(b) {
        return Difference::identical();
    }
    if a.width() != b.width() || a.height() != b.height() {
        return Difference::incomparable();
    }

    let mut cache: HashMap<u32, Lab> = HashMap::new();
    for &pixel in a.pixels().iter().chain(b.pixels()) {
        cache.entry(pixel).or_insert_with(|| argb_to_lab(pixel));
    }
    trace!("Lab 缓存: {} 种颜色", cache.len());

    let worst = a
        .pixels()
        .par_iter()
        .zip(b.pixels().par_iter())
        .enumerate()
        .filter_map(|(i, (pa, pb))| {
            let d = euclidean_distance(&cache[pa], &cache[pb]);
            (d > 0).then_some((d, i))
        })
        .reduce_with(pick_worst);

    match worst {
        Some((difference, index)) => {
            let width = a.width() as usize;
            Difference {
                greatest_pixel_difference: difference,
                worst_pixel: Some(((index % width) as u32, (index / width) as u32)),
                best_match_crop: None,
            }
        }
        None => Difference::identical(),
    }
}

/// 取差异更大者; 相同时取光栅顺序靠前者
fn pick_worst(x: (u32, usize), y: (u32, usize)) -> (u32, usize) {
    if y.0 > x.0 || (y.0 == x.0 && y.1 < x.1) {
        y
    } else {
        x
    }
}

/// 依次对 `b` 做裁边变换并与 `a` 比较, 返回最小差异
///
/// 未变换的 `b` 总是作为初始候选, 因此结果不会大于 `compute_difference(a, b)`.
/// 只有严格更小的差异才会替换当前结果, 并记录对应的裁边参数.
pub fn compute_minimum_difference(a: &Bitmap, b: &Bitmap, crops: &[BorderCrop]) -> Difference {
    let mut min_diff = compute_difference(Some(a), Some(b));
    for &crop in crops {
        let scaled = shrink_and_scale_bilinear(b, crop.horizontal, crop.vertical);
        let diff = compute_difference(Some(a), Some(&scaled));
        trace!("裁边 {crop}: {diff}");
        if diff.greatest_pixel_difference < min_diff.greatest_pixel_difference {
            min_diff = Difference {
                best_match_crop: Some(crop),
                ..diff
            };
        }
    }
    min_diff
}

/// 由截图尺寸与逻辑尺寸之比生成默认裁边列表
///
/// 半纹素与整纹素偏移, 分别作用于水平、垂直及两者同时.
pub fn default_border_crops(
    captured_width: u32,
    captured_height: u32,
    true_width: u32,
    true_height: u32,
) -> [BorderCrop; 6] {
    let h = f64::from(captured_width) / f64::from(true_width);
    let v = f64::from(captured_height) / f64::from(true_height);
    let hh = 0.5 * h;
    let vh = 0.5 * v;
    [
        BorderCrop::new(hh, 0.0),
        BorderCrop::new(hh, vh),
        BorderCrop::new(0.0, vh),
        BorderCrop::new(h, 0.0),
        BorderCrop::new(h, v),
        BorderCrop::new(0.0, v),
    ]
}

/// 使用默认裁边列表计算最小差异
///
/// `true_width`/`true_height` 是被渲染内容的逻辑尺寸, `a` 是实际截图.
pub fn compute_minimum_difference_for_true_size(
    a: &Bitmap,
    b: &Bitmap,
    true_width: u32,
    true_height: u32,
) -> Difference {
    if true_width == 0 || true_height == 0 {
        return compute_difference(Some(a), Some(b));
    }
    let crops = default_border_crops(a.width(), a.height(), true_width, true_height);
    compute_minimum_difference(a, b, &crops)
}
