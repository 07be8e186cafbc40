//! sRGB → XYZ → CIE L\*a\*b\* 颜色转换.
//!
//! 公式与常量来自 easyrgb.com (2° 观察者, D65 光源). 参考测试数据依赖这里的数值,
//! 常量与分段阈值必须保持不变.

use yan_core::color;

/// sRGB 伽马展开阈值
const SRGB_THRESHOLD: f64 = 0.040_45;
/// Lab 立方根分段阈值
const LAB_THRESHOLD: f64 = 0.008_856;

/// D65 参考白点
const REF_X: f64 = 95.047;
const REF_Y: f64 = 100.0;
const REF_Z: f64 = 108.883;

/// 线性 RGB → XYZ 矩阵 (D65)
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124, 0.3576, 0.1805],
    [0.2126, 0.7152, 0.0722],
    [0.0193, 0.1192, 0.9505],
];

/// CIE XYZ 颜色
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE L\*a\*b\* 颜色
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    /// 与另一颜色的欧氏距离
    pub fn distance(&self, other: &Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

/// 单个 8 位分量的 sRGB 伽马展开, 结果缩放到 [0, 100]
#[inline]
fn linearize(component: u8) -> f64 {
    let c = f64::from(component) / 255.0;
    let linear = if c > SRGB_THRESHOLD {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    };
    linear * 100.0
}

/// 8 位 sRGB → XYZ
pub fn rgb_to_xyz(r: u8, g: u8, b: u8) -> Xyz {
    let rgb = [linearize(r), linearize(g), linearize(b)];
    let row = |m: [f64; 3]| m[0] * rgb[0] + m[1] * rgb[1] + m[2] * rgb[2];
    Xyz {
        x: row(RGB_TO_XYZ[0]),
        y: row(RGB_TO_XYZ[1]),
        z: row(RGB_TO_XYZ[2]),
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > LAB_THRESHOLD {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

/// XYZ → L\*a\*b\*
pub fn xyz_to_lab(xyz: Xyz) -> Lab {
    let x = lab_f(xyz.x / REF_X);
    let y = lab_f(xyz.y / REF_Y);
    let z = lab_f(xyz.z / REF_Z);
    Lab {
        l: 116.0 * y - 16.0,
        a: 500.0 * (x - y),
        b: 200.0 * (y - z),
    }
}

/// 打包 ARGB 像素 → L\*a\*b\* (忽略 alpha)
pub fn argb_to_lab(pixel: u32) -> Lab {
    xyz_to_lab(rgb_to_xyz(
        color::red(pixel),
        color::green(pixel),
        color::blue(pixel),
    ))
}

/// 两个颜色的欧氏距离, 四舍五入到整数
pub fn euclidean_distance(p1: &Lab, p2: &Lab) -> u32 {
    p1.distance(p2).round() as u32
}
