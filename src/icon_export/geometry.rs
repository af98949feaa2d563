//! # 尺寸计算模块
//!
//! ## 设计思路
//!
//! 把“按哪条边缩放、缩放到多大、画布如何居中”这类纯计算从像素操作中剥离，
//! 便于单独测试，也让 `ImageHost` 的不同实现共享同一套规则。
//!
//! ## 实现思路
//!
//! - 竖图（高 > 宽）按目标高度缩放，其余（横图、方图）按目标宽度缩放。
//! - 另一条边按比例四舍五入，最小 1 像素。
//! - 画布居中：偏移量 = floor((画布 - 内容) / 2)，奇数差值多出的 1 像素落在右侧/底部。

/// 像素尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_portrait(self) -> bool {
        self.height > self.width
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 等比缩放时对齐的边。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    Width,
    Height,
}

/// 根据源图朝向决定对齐的边。
///
/// 方图按宽度对齐，与横图保持一致。
pub fn fit_axis(source: Size) -> FitAxis {
    if source.is_portrait() {
        FitAxis::Height
    } else {
        FitAxis::Width
    }
}

/// 目标尺寸在对齐边上的长度。
pub fn fit_length(axis: FitAxis, target: Size) -> u32 {
    match axis {
        FitAxis::Width => target.width,
        FitAxis::Height => target.height,
    }
}

/// 将 `source` 等比缩放，使 `axis` 边等于 `length`。
pub fn scale_to(source: Size, axis: FitAxis, length: u32) -> Size {
    let length = length.max(1);
    let scaled = |numerator: u32, denominator: u32| -> u32 {
        let value = (numerator as f64 * length as f64 / denominator.max(1) as f64).round();
        (value as u32).max(1)
    };

    match axis {
        FitAxis::Width => Size::new(length, scaled(source.height, source.width)),
        FitAxis::Height => Size::new(scaled(source.width, source.height), length),
    }
}

/// 将内容居中放到画布上时左上角的偏移。
///
/// 内容大于画布时偏移为负，相当于居中裁剪。
pub fn centered_offset(content: Size, canvas: Size) -> (i64, i64) {
    let axis_offset = |canvas_len: u32, content_len: u32| -> i64 {
        (canvas_len as i64 - content_len as i64).div_euclid(2)
    };

    (
        axis_offset(canvas.width, content.width),
        axis_offset(canvas.height, content.height),
    )
}
