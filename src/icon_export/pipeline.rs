//! # 导出流水线
//!
//! ## 设计思路
//!
//! `IconExporter` 只负责编排：校验源图、按尺寸表逐个生成图标、每个图标后回退快照。
//! 具体的像素操作全部委托给 `ImageHost`，这里不直接依赖任何图像库。
//!
//! ## 实现思路
//!
//! 每个图标固定四步：
//! 1. 竖图按目标高度、其余按目标宽度等比缩放
//! 2. 居中调整画布到目标尺寸，扩展区域填白
//! 3. 导出 PNG 到 `<输出目录>/<文件名>`
//! 4. 回退到源图快照，下一个图标从原图重新开始
//!
//! 任一步失败立即中止，之前已写出的文件保留在磁盘上。

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::config::{ExportConfig, IconSpec, OverwritePolicy, builtin_icon_table};
use super::geometry::{self, Size};
use super::guard::RunState;
use super::host::ImageHost;
use super::ImageError;

/// 已导出的单个图标。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedIcon {
    pub name: String,
    pub path: PathBuf,
    pub size: Size,
    /// 写入前目标文件已存在（已被覆盖）。
    pub replaced: bool,
}

/// 一次完整导出的结果。
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub icons: Vec<ExportedIcon>,
    pub elapsed: Duration,
}

/// 图标导出编排器。
#[derive(Debug, Clone)]
pub struct IconExporter {
    config: ExportConfig,
    table: Vec<IconSpec>,
}

impl IconExporter {
    /// 使用内置尺寸表创建导出器。
    pub fn new(config: ExportConfig) -> Result<Self, ImageError> {
        Ok(Self::with_table(config, builtin_icon_table()?.to_vec()))
    }

    pub fn with_table(config: ExportConfig, table: Vec<IconSpec>) -> Self {
        Self { config, table }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn table(&self) -> &[IconSpec] {
        &self.table
    }

    /// 源图宽高都必须不小于下限。
    pub fn validate_source(&self, source: Size) -> Result<(), ImageError> {
        let min = self.config.min_source_dimension;
        if source.width < min || source.height < min {
            return Err(ImageError::SourceTooSmall {
                width: source.width,
                height: source.height,
                min,
            });
        }
        Ok(())
    }

    /// `OverwritePolicy::Refuse` 下，在写入任何文件前检查所有目标是否已存在。
    pub fn check_collisions(&self, out_dir: &Path) -> Result<(), ImageError> {
        if self.config.overwrite == OverwritePolicy::Replace {
            return Ok(());
        }

        let existing: Vec<String> = self
            .table
            .iter()
            .filter(|spec| spec.output_path(out_dir).exists())
            .map(IconSpec::file_name)
            .collect();

        if existing.is_empty() {
            Ok(())
        } else {
            Err(ImageError::Collision(existing))
        }
    }

    /// 按尺寸表导出全部图标。
    pub fn export_all<H: ImageHost>(
        &self,
        state: &mut RunState<'_, H>,
        out_dir: &Path,
    ) -> Result<ExportReport, ImageError> {
        self.check_collisions(out_dir)?;

        let start_state = state.start_state()?;
        let source = state.host().dimensions()?;
        let total_start = Instant::now();
        let mut icons = Vec::with_capacity(self.table.len());

        log::info!(
            "🚀 开始导出 {} 个图标 - 源图: {} 输出目录: {}",
            self.table.len(),
            source,
            out_dir.display()
        );

        for spec in &self.table {
            let icon_start = Instant::now();
            let exported = self.export_one(state.host(), source, spec, out_dir)?;
            state.host().revert_to(start_state)?;

            log::info!(
                "🖼️ {} -> {}（{}ms）",
                exported.name,
                exported.size,
                icon_start.elapsed().as_millis()
            );
            icons.push(exported);
        }

        let elapsed = total_start.elapsed();
        log::info!("✅ 图标导出完成 - 共 {} 个，耗时 {}ms", icons.len(), elapsed.as_millis());

        Ok(ExportReport { icons, elapsed })
    }

    fn export_one<H: ImageHost>(
        &self,
        host: &mut H,
        source: Size,
        spec: &IconSpec,
        out_dir: &Path,
    ) -> Result<ExportedIcon, ImageError> {
        let target = spec.size();
        let axis = geometry::fit_axis(source);
        host.resize_proportional(axis, geometry::fit_length(axis, target))?;
        host.resize_canvas(target, self.config.background)?;

        let path = spec.output_path(out_dir);
        let replaced = path.exists();
        if replaced {
            log::warn!("⚠️ 覆盖已存在的文件：{}", path.display());
        }
        host.export_png(&path, &self.config.settings)?;

        Ok(ExportedIcon {
            name: spec.name.clone(),
            path,
            size: target,
            replaced,
        })
    }
}
