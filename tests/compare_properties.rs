//! 帧差比较器的性质测试.
//!
//! 用固定种子的伪随机位图批量检查比较结果的基本性质.

use yan::compare::{
    BorderCrop, Difference, compute_difference, compute_minimum_difference,
    default_border_crops, shrink_and_scale_bilinear,
};
use yan::core::{Bitmap, color};

/// 线性同余伪随机数
struct Lcg(u64);

impl Lcg {
    fn next_u8(&mut self) -> u8 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as u8
    }
}

fn random_bitmap(rng: &mut Lcg, width: u32, height: u32) -> Bitmap {
    let pixels = (0..width * height)
        .map(|_| color::rgb(rng.next_u8(), rng.next_u8(), rng.next_u8()))
        .collect();
    Bitmap::from_pixels(width, height, pixels).unwrap()
}

const SIZES: [(u32, u32); 4] = [(1, 1), (3, 2), (7, 5), (16, 9)];

#[test]
fn test_自身差异为零() {
    let mut rng = Lcg(1);
    for (w, h) in SIZES {
        let bmp = random_bitmap(&mut rng, w, h);
        let diff = compute_difference(Some(&bmp), Some(&bmp));
        assert_eq!(diff, Difference::identical());
    }
}

#[test]
fn test_差异对称() {
    let mut rng = Lcg(2);
    for (w, h) in SIZES {
        let a = random_bitmap(&mut rng, w, h);
        let b = random_bitmap(&mut rng, w, h);
        let ab = compute_difference(Some(&a), Some(&b)).greatest_pixel_difference;
        let ba = compute_difference(Some(&b), Some(&a)).greatest_pixel_difference;
        assert_eq!(ab, ba, "{w}x{h}");
    }
}

#[test]
fn test_尺寸不同总是哨兵值() {
    let mut rng = Lcg(3);
    let a = random_bitmap(&mut rng, 4, 4);
    for (w, h) in SIZES {
        let b = random_bitmap(&mut rng, w, h);
        let diff = compute_difference(Some(&a), Some(&b));
        assert_eq!(diff.greatest_pixel_difference, Difference::MAX_VALUE);
        assert!(diff.worst_pixel.is_none());
    }
}

#[test]
fn test_最大差异在合理范围内() {
    let mut rng = Lcg(4);
    for (w, h) in SIZES {
        let a = random_bitmap(&mut rng, w, h);
        let b = random_bitmap(&mut rng, w, h);
        let diff = compute_difference(Some(&a), Some(&b));
        assert!(diff.greatest_pixel_difference < 300);
        if diff.greatest_pixel_difference > 0 {
            let (x, y) = diff.worst_pixel.unwrap();
            assert!(x < w && y < h);
        }
    }
}

#[test]
fn test_最小差异不大于未变换差异() {
    let mut rng = Lcg(5);
    for (w, h) in SIZES {
        let a = random_bitmap(&mut rng, w, h);
        let b = random_bitmap(&mut rng, w, h);
        let plain = compute_difference(Some(&a), Some(&b));
        let crops = default_border_crops(w, h, w, h);
        let min = compute_minimum_difference(&a, &b, &crops);
        assert!(min.greatest_pixel_difference <= plain.greatest_pixel_difference);
        match min.best_match_crop {
            Some(crop) => {
                assert!(crops.contains(&crop));
                assert!(min.greatest_pixel_difference < plain.greatest_pixel_difference);
            }
            None => assert_eq!(min, plain),
        }
    }
}

#[test]
fn test_裁边偏移可被找回() {
    // shifted 是 a 水平裁去半像素后的结果, 对 a 做同样的裁边应完全一致
    let mut rng = Lcg(6);
    let a = random_bitmap(&mut rng, 12, 8);
    let shifted = shrink_and_scale_bilinear(&a, 0.5, 0.0);
    let crop = BorderCrop::new(0.5, 0.0);
    let min = compute_minimum_difference(&shifted, &a, &[BorderCrop::new(1.0, 1.0), crop]);
    assert_eq!(min.greatest_pixel_difference, 0);
    assert_eq!(min.best_match_crop, Some(crop));
}
