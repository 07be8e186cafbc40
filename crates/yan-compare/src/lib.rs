//! # yan-compare
//!
//! Yan 解码准确性验证框架的感知帧差比较器.
//!
//! 把两幅尺寸相同的位图逐像素转换到 CIE L\*a\*b\* 颜色空间,
//! 以欧氏距离的最大值作为差异分数. 为了容忍纹理采样带来的亚像素偏移,
//! 还可以对第二幅图做若干组 "裁边 + 双线性放大" 变换, 取其中最小的差异.
//!
//! - [`compute_difference`]: 单次比较
//! - [`shrink_and_scale_bilinear`]: 裁边后双线性放大回原尺寸
//! - [`compute_minimum_difference`]: 在裁边列表上取最小差异
//! - [`convert`]: 把解码器输出的原始帧转换为位图
//!
//! 比较是纯函数, 无共享可变状态; 逐像素计算用 rayon 并行,
//! 归约结果确定 (差异相同时取光栅顺序中第一个像素).
//!
//! ```rust
//! use yan_compare::compute_difference;
//! use yan_core::{Bitmap, color};
//!
//! let a = Bitmap::filled(2, 2, color::WHITE);
//! let mut b = a.clone();
//! b.set_pixel(0, 0, color::BLACK);
//!
//! let diff = compute_difference(Some(&b), Some(&a));
//! assert_eq!(diff.greatest_pixel_difference, 100);
//! assert_eq!(diff.worst_pixel, Some((0, 0)));
//! ```

pub mod convert;
pub mod difference;
pub mod lab;
pub mod shrink;

// 重导出常用类型
pub use difference::{
    BorderCrop, Difference, compute_difference, compute_minimum_difference,
    compute_minimum_difference_for_true_size, default_border_crops,
};
pub use lab::Lab;
pub use shrink::shrink_and_scale_bilinear;
