//! # 图像能力接口
//!
//! ## 设计思路
//!
//! 导出流程只依赖一组抽象的图像操作：打开、等比缩放、居中调整画布、导出 PNG、
//! 回退到历史快照、关闭文档。具体由哪个图像库实现对流程透明，
//! 测试中也可以替换为记录调用的假实现。
//!
//! 宿主还持有一项全局偏好：标尺单位。几何操作按当前单位解释长度，
//! 因此流程在运行期间切换为像素，并保证退出时恢复（见 `guard::RunState`）。

use std::path::Path;

use image::Rgba;

use super::ImageError;
use super::config::ExportSettings;
use super::geometry::{FitAxis, Size};

/// 标尺单位偏好。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RulerUnits {
    Pixels,
    #[default]
    Inches,
    Centimeters,
    Millimeters,
    Points,
    Percent,
}

/// 历史快照句柄，由 `ImageHost::checkpoint` 返回。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(pub(crate) usize);

/// 图标导出所需的图像处理能力。
pub trait ImageHost {
    /// 打开源文件作为当前文档，替换之前打开的文档。
    fn open(&mut self, path: &Path) -> Result<(), ImageError>;

    /// 当前文档的像素尺寸。
    fn dimensions(&self) -> Result<Size, ImageError>;

    /// 记录当前文档状态，之后可通过 `revert_to` 回到此处。
    fn checkpoint(&mut self) -> Result<Checkpoint, ImageError>;

    /// 等比缩放，使 `axis` 边等于 `length` 像素，返回缩放后的尺寸。
    fn resize_proportional(&mut self, axis: FitAxis, length: u32) -> Result<Size, ImageError>;

    /// 以居中锚点把画布调整为 `canvas`，多出的区域用 `background` 填充，超出部分裁掉。
    fn resize_canvas(&mut self, canvas: Size, background: Rgba<u8>) -> Result<(), ImageError>;

    /// 将当前文档导出为 PNG，已存在的文件会被覆盖。
    fn export_png(&self, path: &Path, settings: &ExportSettings) -> Result<(), ImageError>;

    /// 回退到指定快照。
    fn revert_to(&mut self, checkpoint: Checkpoint) -> Result<(), ImageError>;

    /// 不保存直接关闭当前文档；没有打开的文档时什么都不做。
    fn close(&mut self);

    fn ruler_units(&self) -> RulerUnits;

    fn set_ruler_units(&mut self, units: RulerUnits);
}
