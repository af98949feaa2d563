//! # iMessage 图标生成工具：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main.rs  env_logger 初始化 + 选择交互方式 + 退出码        │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓
//! ┌───────┴──────────────────────────────────────────────────┐
//! │  app::run   选源图 → 校验 → 选目录 → 导出 → 一次性提示     │
//! │                                                          │
//! │  ┌─ error ────────── AppError (取消 / 校验 / 运行期)       │
//! │  ├─ prompt ───────── Prompter (rfd 对话框 / 位置参数)      │
//! │  └─ icon_export ──── 尺寸表 + 流水线 + ImageHost           │
//! │      ├─ guard         RunState (RAII 恢复偏好、关闭文档)   │
//! │      └─ raster        image + fast_image_resize 实现       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，决定提示内容或静默退出 |
//! | [`prompt`] | 源图/输出目录选择与结束提示 |
//! | [`app`] | 单次运行的完整流程 |
//! | [`icon_export`] | 内置尺寸表、图像能力接口与导出流水线 |

pub mod app;
pub mod error;
pub mod icon_export;
pub mod prompt;
