//! # 缩放模块
//!
//! ## 设计思路
//!
//! 优先使用 `fast_image_resize` 的卷积缩放（SIMD，带 alpha 预乘），
//! 失败时回退到 `image::imageops::resize`，保证流程不中断。
//!
//! 图标是大幅缩小的场景，默认使用 Lanczos3 作为带锐化效果的滤镜。

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{ImageBuffer, Rgba, RgbaImage};

use super::ImageError;
use super::geometry::Size;

/// 将 RGBA 图像精确缩放到 `target`。
pub(crate) fn resize_rgba(image: &RgbaImage, target: Size, filter: FilterType) -> RgbaImage {
    if image.dimensions() == (target.width, target.height) {
        return image.clone();
    }

    match resize_with_fast_image_resize(image, target, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}", err);
            image::imageops::resize(image, target.width, target.height, filter)
        }
    }
}

fn resize_with_fast_image_resize(
    image: &RgbaImage,
    target: Size,
    filter: FilterType,
) -> Result<RgbaImage, ImageError> {
    let (src_width, src_height) = image.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        image.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| ImageError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target.width, target.height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ImageError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target.width, target.height, dst_image.into_vec())
        .ok_or_else(|| ImageError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}
