//! # 基于 `image` 的宿主实现
//!
//! ## 设计思路
//!
//! `RasterHost` 用内存中的 RGBA 位图模拟一个“文档”：
//! - 打开时读取字节 → 签名校验 → 读 header 尺寸并做像素上限检查 → 完整解码
//! - 每次缩放/调整画布都直接改写工作图
//! - 快照保存工作图的副本，回退时整体替换，保证每个图标都从原图出发
//!
//! ## 实现思路
//!
//! - 文件签名通过 `infer` 判断，只接受 PNG。
//! - 源图的 ICC 配置会被记住，只有在导出设置要求保留元数据时才写回。
//! - PNG 编码参数固定（默认压缩 + 自适应滤波），相同输入得到逐字节相同的输出。
//! - 几何操作要求标尺单位为像素，否则返回 `ImageError::UnitMismatch`。
//! - 不保留透明度时，先按 alpha 合成到背景色再丢弃 alpha 通道。

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{
    DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageFormat, Rgb, RgbImage, Rgba,
    RgbaImage,
};

use super::config::{ExportConfig, ExportSettings};
use super::geometry::{self, FitAxis, Size};
use super::host::{Checkpoint, ImageHost, RulerUnits};
use super::resize::resize_rgba;
use super::ImageError;

/// 打开的文档。
struct Document {
    source: PathBuf,
    working: RgbaImage,
    history: Vec<RgbaImage>,
    icc_profile: Option<Vec<u8>>,
}

/// 基于 `image` + `fast_image_resize` 的 `ImageHost` 实现。
pub struct RasterHost {
    document: Option<Document>,
    ruler_units: RulerUnits,
    resize_filter: FilterType,
    background: Rgba<u8>,
    max_file_size: u64,
    max_decoded_pixels: u64,
}

impl RasterHost {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            document: None,
            ruler_units: RulerUnits::default(),
            resize_filter: config.resize_filter,
            background: config.background,
            max_file_size: config.max_file_size,
            max_decoded_pixels: config.max_decoded_pixels,
        }
    }

    /// 当前是否有打开的文档。
    ///
    /// 流程本身不需要它，供调用方（包括集成测试）确认运行结束后文档已关闭。
    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    fn document(&self) -> Result<&Document, ImageError> {
        self.document.as_ref().ok_or(ImageError::NoDocument)
    }

    fn document_mut(&mut self) -> Result<&mut Document, ImageError> {
        self.document.as_mut().ok_or(ImageError::NoDocument)
    }

    fn require_pixels(&self) -> Result<(), ImageError> {
        if self.ruler_units != RulerUnits::Pixels {
            return Err(ImageError::UnitMismatch(self.ruler_units));
        }
        Ok(())
    }

    fn read_source_bytes(&self, path: &Path) -> Result<Vec<u8>, ImageError> {
        if !path.is_file() {
            return Err(ImageError::FileSystem(format!("文件不存在：{}", path.display())));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > self.max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                self.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        validate_png_signature(&bytes)?;
        Ok(bytes)
    }

    fn validate_pixel_limits(&self, width: u32, height: u32) -> Result<(), ImageError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > self.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, self.max_decoded_pixels
            )));
        }

        Ok(())
    }
}

impl ImageHost for RasterHost {
    fn open(&mut self, path: &Path) -> Result<(), ImageError> {
        log::info!("📁 打开源图 - 路径: {}", path.display());

        let bytes = self.read_source_bytes(path)?;
        let (header_width, header_height) = inspect_dimensions(&bytes)?;
        self.validate_pixel_limits(header_width, header_height)?;

        let reader = image::ImageReader::with_format(Cursor::new(&bytes), ImageFormat::Png);
        let mut decoder = reader
            .into_decoder()
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;
        let icc_profile = decoder.icc_profile().unwrap_or_else(|e| {
            log::warn!("⚠️ 读取 ICC 配置失败，按无配置处理：{}", e);
            None
        });
        let decoded = DynamicImage::from_decoder(decoder)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

        let working = decoded.to_rgba8();
        log::info!(
            "✅ 源图解码成功 - 尺寸: {}x{} 颜色: {:?} ICC: {}",
            working.width(),
            working.height(),
            decoded.color(),
            icc_profile.is_some()
        );

        if let Some(previous) = self.document.replace(Document {
            source: path.to_path_buf(),
            working,
            history: Vec::new(),
            icc_profile,
        }) {
            log::debug!("替换之前打开的文档：{}", previous.source.display());
        }

        Ok(())
    }

    fn dimensions(&self) -> Result<Size, ImageError> {
        let (width, height) = self.document()?.working.dimensions();
        Ok(Size::new(width, height))
    }

    fn checkpoint(&mut self) -> Result<Checkpoint, ImageError> {
        let document = self.document_mut()?;
        document.history.push(document.working.clone());
        let checkpoint = Checkpoint(document.history.len() - 1);
        log::debug!("记录快照 #{}", checkpoint.0);
        Ok(checkpoint)
    }

    fn resize_proportional(&mut self, axis: FitAxis, length: u32) -> Result<Size, ImageError> {
        self.require_pixels()?;
        let filter = self.resize_filter;
        let document = self.document_mut()?;

        let (width, height) = document.working.dimensions();
        let target = geometry::scale_to(Size::new(width, height), axis, length);
        log::debug!("等比缩放（{:?}）：{}x{} -> {}", axis, width, height, target);

        document.working = resize_rgba(&document.working, target, filter);
        Ok(target)
    }

    fn resize_canvas(&mut self, canvas: Size, background: Rgba<u8>) -> Result<(), ImageError> {
        self.require_pixels()?;
        if canvas.width == 0 || canvas.height == 0 {
            return Err(ImageError::ResourceLimit(format!("画布尺寸无效：{}", canvas)));
        }

        let document = self.document_mut()?;
        let (width, height) = document.working.dimensions();
        let (x, y) = geometry::centered_offset(Size::new(width, height), canvas);
        log::debug!("调整画布：{}x{} -> {}（偏移 {}, {}）", width, height, canvas, x, y);

        let mut resized = RgbaImage::from_pixel(canvas.width, canvas.height, background);
        // replace 不做混合，透明像素原样保留
        image::imageops::replace(&mut resized, &document.working, x, y);
        document.working = resized;
        Ok(())
    }

    fn export_png(&self, path: &Path, settings: &ExportSettings) -> Result<(), ImageError> {
        if settings.png8 {
            return Err(ImageError::Encode("不支持 PNG-8 输出".to_string()));
        }

        let document = self.document()?;
        let (width, height) = document.working.dimensions();

        let mut buffer = Cursor::new(Vec::new());
        let mut encoder = PngEncoder::new_with_quality(
            &mut buffer,
            CompressionType::Default,
            PngFilterType::Adaptive,
        );

        if !settings.strip_metadata {
            if let Some(profile) = &document.icc_profile {
                if let Err(e) = encoder.set_icc_profile(profile.clone()) {
                    log::warn!("⚠️ 写入 ICC 配置失败，忽略：{}", e);
                }
            }
        }

        let result = if settings.transparency {
            encoder.write_image(document.working.as_raw(), width, height, ExtendedColorType::Rgba8)
        } else {
            let rgb = flatten_onto(&document.working, self.background);
            encoder.write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        };
        result.map_err(|e| ImageError::Encode(format!("PNG 编码失败：{}", e)))?;

        std::fs::write(path, buffer.into_inner()).map_err(|e| {
            ImageError::FileSystem(format!("写入文件失败 {}：{}", path.display(), e))
        })
    }

    fn revert_to(&mut self, checkpoint: Checkpoint) -> Result<(), ImageError> {
        let document = self.document_mut()?;
        let snapshot = document.history.get(checkpoint.0).ok_or_else(|| {
            ImageError::ResourceLimit(format!("快照 #{} 不存在", checkpoint.0))
        })?;
        document.working = snapshot.clone();
        document.history.truncate(checkpoint.0 + 1);
        log::debug!("回退到快照 #{}", checkpoint.0);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(document) = self.document.take() {
            log::debug!("关闭文档（不保存）：{}", document.source.display());
        }
    }

    fn ruler_units(&self) -> RulerUnits {
        self.ruler_units
    }

    fn set_ruler_units(&mut self, units: RulerUnits) {
        self.ruler_units = units;
    }
}

/// 按 alpha 将图像合成到不透明背景上，得到 RGB 图像。
fn flatten_onto(image: &RgbaImage, background: Rgba<u8>) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let alpha = a as u32;
        let blend = |fg: u8, bg: u8| -> u8 {
            ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([
            blend(r, background[0]),
            blend(g, background[1]),
            blend(b, background[2]),
        ])
    })
}

/// 通过文件签名（magic bytes）校验输入是否为 PNG。
fn validate_png_signature(bytes: &[u8]) -> Result<(), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::InvalidFormat("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| ImageError::InvalidFormat("无法识别文件类型，请选择有效的 PNG 文件".to_string()))?;

    if kind.mime_type() != "image/png" {
        return Err(ImageError::InvalidFormat(format!(
            "文件不是 PNG 图片：{}",
            kind.mime_type()
        )));
    }

    Ok(())
}

/// 仅通过图片头信息读取宽高，用于完整解码前的像素限制检查。
fn inspect_dimensions(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
    image::ImageReader::with_format(Cursor::new(bytes), ImageFormat::Png)
        .into_dimensions()
        .map_err(|e| ImageError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
}
