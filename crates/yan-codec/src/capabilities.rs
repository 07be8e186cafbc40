//! 解码器视频能力描述.
//!
//! 驱动在自适应码率 (ABR) 场景下查询解码器支持的最大分辨率,
//! 用于设置 `max-width`/`max-height` 提示.

/// 闭区间整数范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntRange {
    pub lower: u32,
    pub upper: u32,
}

impl IntRange {
    pub const fn new(lower: u32, upper: u32) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// 视频能力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCapabilities {
    /// 支持的宽度范围
    widths: IntRange,
    /// 支持的高度范围
    heights: IntRange,
    /// 单帧最大像素数 (None 表示只受宽高范围限制)
    max_pixels: Option<u64>,
}

impl VideoCapabilities {
    pub fn new(widths: IntRange, heights: IntRange) -> Self {
        Self {
            widths,
            heights,
            max_pixels: None,
        }
    }

    /// 设置单帧最大像素数
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = Some(max_pixels);
        self
    }

    /// 支持的宽度范围
    pub fn supported_widths(&self) -> IntRange {
        self.widths
    }

    /// 支持的高度范围 (不考虑宽度)
    pub fn supported_heights(&self) -> IntRange {
        self.heights
    }

    /// 指定宽度下支持的高度范围
    ///
    /// 宽度不受支持, 或像素总数限制使该宽度下无可用高度时返回 None.
    pub fn supported_heights_for(&self, width: u32) -> Option<IntRange> {
        if width == 0 || !self.widths.contains(width) {
            return None;
        }
        let mut upper = self.heights.upper;
        if let Some(max_pixels) = self.max_pixels {
            let limit = max_pixels / u64::from(width);
            upper = upper.min(u32::try_from(limit).unwrap_or(u32::MAX));
        }
        (upper >= self.heights.lower).then_some(IntRange::new(self.heights.lower, upper))
    }

    /// 是否支持指定尺寸
    pub fn is_size_supported(&self, width: u32, height: u32) -> bool {
        self.supported_heights_for(width)
            .is_some_and(|heights| heights.contains(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps_1080p() -> VideoCapabilities {
        VideoCapabilities::new(IntRange::new(16, 1920), IntRange::new(16, 1920))
            .with_max_pixels(1920 * 1080)
    }

    #[test]
    fn test_按宽度限制高度() {
        let caps = caps_1080p();
        assert_eq!(caps.supported_heights_for(1920), Some(IntRange::new(16, 1080)));
        assert_eq!(caps.supported_heights_for(1080), Some(IntRange::new(16, 1920)));
        assert_eq!(caps.supported_heights_for(4096), None);
    }

    #[test]
    fn test_尺寸支持判断() {
        let caps = caps_1080p();
        assert!(caps.is_size_supported(1920, 1080));
        assert!(!caps.is_size_supported(1920, 1200));
        assert!(!caps.is_size_supported(8, 8));
    }
}
