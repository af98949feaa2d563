//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，区分三类退出：
//! - **用户取消**：不是错误，静默退出，不弹提示
//! - **校验失败**（文件无效、图片太小、输出目录不可用）：提示后退出，不写任何文件
//! - **运行期失败**（写盘失败等）：提示后退出，已写出的文件保留
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` 提供 `From` 转换，`?` 直接上转。
//! - `user_message()` 对取消返回 `None`，调用方据此决定是否提示。

use crate::icon_export::ImageError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 用户在选择框中点了取消
    #[error("")]
    Cancelled,

    /// 输出目录不存在或不是目录
    #[error("输出目录不可用: {0}")]
    OutputDir(String),

    /// 图标导出链路错误（加载 / 校验 / 缩放 / 写盘）
    #[error("{0}")]
    Image(#[from] ImageError),
}

impl AppError {
    /// 展示给用户的提示；取消时为 `None`。
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Cancelled => None,
            other => Some(other.to_string()).filter(|message| !message.is_empty()),
        }
    }
}
