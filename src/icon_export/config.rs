//! # 配置模块
//!
//! ## 设计思路
//!
//! 图标尺寸表是固定的应用数据，但不写成分支判断：表以 JSON 形式随二进制一起编译
//! （`assets/icons.json`），解析为 `IconSpec` 列表后只读遍历，增删尺寸只需改数据。
//!
//! ## 实现思路
//!
//! - 每条记录要么给出 `width` + `height`，要么只给 `size`（方形图标）。
//!   通过 `#[serde(try_from)]` 在反序列化阶段完成两种写法的归一与校验。
//! - 内置表用 `once_cell::sync::Lazy` 在首次访问时解析，之后零成本复用。
//! - `ExportSettings` 描述输出格式（PNG-24 + 透明 + 去元数据），整次运行不变。
//! - `ExportConfig` 汇总源图下限、缩放滤镜、背景色、覆盖策略与资源上限。

use std::path::{Path, PathBuf};

use image::Rgba;
use image::imageops::FilterType;
use once_cell::sync::Lazy;
use serde::Deserialize;

use super::ImageError;
use super::geometry::Size;

/// 没有 `.png` 扩展名的特殊文件名。
const EXTENSIONLESS_NAMES: [&str; 2] = ["iTunesArtwork", "iTunesArtwork@2x"];

static BUILTIN_TABLE_JSON: &str = include_str!("../../assets/icons.json");

static BUILTIN_TABLE: Lazy<Result<Vec<IconSpec>, String>> =
    Lazy::new(|| parse_icon_table(BUILTIN_TABLE_JSON).map_err(|e| e.to_string()));

/// 单个输出图标的规格。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IconRecord")]
pub struct IconSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// JSON 中的原始记录，两种写法共存。
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IconRecord {
    name: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    size: Option<u32>,
}

impl TryFrom<IconRecord> for IconSpec {
    type Error = String;

    fn try_from(record: IconRecord) -> Result<Self, Self::Error> {
        let (width, height) = match (record.width, record.height, record.size) {
            (Some(width), Some(height), None) => (width, height),
            (None, None, Some(size)) => (size, size),
            _ => {
                return Err(format!(
                    "图标 {} 必须且只能给出 width+height 或 size 其中一种",
                    record.name
                ));
            }
        };

        if record.name.trim().is_empty() {
            return Err("图标名称不能为空".to_string());
        }
        if record.name.contains(['/', '\\']) {
            return Err(format!("图标名称不能包含路径分隔符：{}", record.name));
        }
        if width == 0 || height == 0 {
            return Err(format!("图标 {} 的尺寸必须大于 0", record.name));
        }

        Ok(Self {
            name: record.name,
            width,
            height,
        })
    }
}

impl IconSpec {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    pub fn square(name: impl Into<String>, size: u32) -> Self {
        Self::new(name, size, size)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// 输出文件名。
    ///
    /// `iTunesArtwork` 系列历来没有扩展名，其余统一追加 `.png`。
    pub fn file_name(&self) -> String {
        if EXTENSIONLESS_NAMES.contains(&self.name.as_str()) {
            self.name.clone()
        } else {
            format!("{}.png", self.name)
        }
    }

    pub fn output_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(self.file_name())
    }
}

/// 解析图标尺寸表，并拒绝重复名称。
pub fn parse_icon_table(json: &str) -> Result<Vec<IconSpec>, ImageError> {
    let table: Vec<IconSpec> = serde_json::from_str(json)
        .map_err(|e| ImageError::InvalidFormat(format!("图标尺寸表解析失败：{}", e)))?;

    if table.is_empty() {
        return Err(ImageError::InvalidFormat("图标尺寸表为空".to_string()));
    }

    for (index, spec) in table.iter().enumerate() {
        if table[..index].iter().any(|other| other.file_name() == spec.file_name()) {
            return Err(ImageError::InvalidFormat(format!(
                "图标尺寸表存在重复的输出文件名：{}",
                spec.file_name()
            )));
        }
    }

    Ok(table)
}

/// 内置图标尺寸表（iMessage 应用 / 贴纸包）。
pub fn builtin_icon_table() -> Result<&'static [IconSpec], ImageError> {
    (*BUILTIN_TABLE)
        .as_ref()
        .map(Vec::as_slice)
        .map_err(|e| ImageError::InvalidFormat(e.clone()))
}

/// 输出格式设置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSettings {
    /// `true` 表示 8 位调色板 PNG；本工具只输出 PNG-24。
    pub png8: bool,
    /// 保留 alpha 通道。
    pub transparency: bool,
    /// 丢弃源图携带的元数据（ICC 配置等）。
    pub strip_metadata: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            png8: false,
            transparency: true,
            strip_metadata: true,
        }
    }
}

/// 目标文件已存在时的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// 直接覆盖，不备份也不确认。
    #[default]
    Replace,
    /// 任一目标已存在时，在写入第一个文件前中止。
    Refuse,
}

/// 图标导出配置。
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// 源图宽高的最小值（像素）。
    pub min_source_dimension: u32,
    /// 等比缩放使用的滤镜。
    pub resize_filter: FilterType,
    /// 画布扩展区域的填充色。
    pub background: Rgba<u8>,
    pub overwrite: OverwritePolicy,
    pub settings: ExportSettings,
    /// 读取源文件时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            min_source_dimension: 1024,
            resize_filter: FilterType::Lanczos3,
            background: Rgba([0xFF, 0xFF, 0xFF, 0xFF]),
            overwrite: OverwritePolicy::Replace,
            settings: ExportSettings::default(),
            max_file_size: 200 * 1024 * 1024,
            max_decoded_pixels: 100_000_000,
        }
    }
}
