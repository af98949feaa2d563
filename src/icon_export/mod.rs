//! # 图标导出模块（icon_export）
//!
//! ## 设计思路
//!
//! 该模块把“打开源图 → 校验 → 逐个缩放/裁剪/导出 → 回退”按职责拆分为多个子模块，
//! 流程编排与像素操作解耦，编排层只认识 `ImageHost` 能力接口。
//!
//! - `config`：内置尺寸表、输出格式、导出参数
//! - `geometry`：缩放对齐边、等比尺寸、居中偏移等纯计算
//! - `host`：`ImageHost` 能力接口与标尺单位偏好
//! - `raster`：基于 `image` + `fast_image_resize` 的宿主实现
//! - `resize`：卷积缩放与回退
//! - `guard`：`RunState` RAII，保证关闭文档并恢复偏好
//! - `pipeline`：`IconExporter` 编排整条导出链路
//! - `error`：阶段错误
//!
//! ## 新同事快速上手
//!
//! ```text
//! app::run
//!    ↓
//! guard.rs（RunState：切换像素单位 + 打开源图 + 记录快照）
//!    ↓
//! pipeline.rs（校验尺寸 → 每个图标：缩放 → 画布 → 导出 → 回退）
//!    ↓
//! raster.rs（实际像素操作，resize.rs 负责缩放）
//!    ↓
//! RunState Drop（关闭文档 + 恢复偏好）
//! ```

mod config;
mod error;
mod geometry;
mod guard;
mod host;
mod pipeline;
mod raster;
mod resize;

pub use config::{
    ExportConfig, ExportSettings, IconSpec, OverwritePolicy, builtin_icon_table, parse_icon_table,
};
pub use error::ImageError;
pub use geometry::{FitAxis, Size};
pub use guard::RunState;
pub use host::{Checkpoint, ImageHost, RulerUnits};
pub use pipeline::{ExportReport, ExportedIcon, IconExporter};
pub use raster::RasterHost;
