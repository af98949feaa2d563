//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图标导出链路中的所有阶段错误（加载、解码、缩放、编码、写盘）。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。

use super::RulerUnits;

/// 图标导出统一错误类型。
///
/// 该类型会在应用层被上转为 `AppError`，最终作为一次性提示展示给用户。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("图片太小！至少需要 {min}x{min} 像素（当前 {width}x{height}），宽高比不限。")]
    SourceTooSmall { width: u32, height: u32, min: u32 },

    #[error("输出目录中已存在同名文件，已取消导出：{}", .0.join(", "))]
    Collision(Vec<String>),

    /// 几何操作要求以像素为单位解释长度。
    #[error("标尺单位必须为像素，当前为 {0:?}")]
    UnitMismatch(RulerUnits),

    #[error("当前没有打开的文档")]
    NoDocument,
}

