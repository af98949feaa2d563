//! 应用流程模块
//!
//! # 设计思路
//!
//! `run` 是唯一的入口，顺序固定：
//! 选源图 → 打开并校验 → 选输出目录 → 逐个导出 → 一次性提示。
//!
//! 所有错误在这里汇总为一条提示（取消除外），清理由 `RunState` 的 `Drop` 完成，
//! 因此无论从哪个分支退出，文档都会被关闭、标尺单位都会被恢复。

use std::path::Path;

use crate::error::AppError;
use crate::icon_export::{ExportReport, IconExporter, ImageHost, RunState};
use crate::prompt::{NoticeLevel, Prompter};

/// 成功时的提示文案。
pub const SUCCESS_MESSAGE: &str = "iMessage 应用图标已生成！";

/// 一次运行的结果。
#[derive(Debug)]
pub enum Outcome {
    Completed(ExportReport),
    Cancelled,
    Failed(String),
}

/// 执行完整流程并向用户提示结果。
pub fn run<P, H>(prompter: &mut P, host: &mut H, exporter: &IconExporter) -> Outcome
where
    P: Prompter,
    H: ImageHost,
{
    match execute(prompter, host, exporter) {
        Ok(report) => {
            prompter.notify(NoticeLevel::Info, SUCCESS_MESSAGE);
            Outcome::Completed(report)
        }
        Err(err) => match err.user_message() {
            Some(message) => {
                log::error!("❌ 图标导出失败：{}", message);
                prompter.notify(NoticeLevel::Error, &message);
                Outcome::Failed(message)
            }
            None => {
                log::info!("⏭️ 用户取消，未生成任何文件");
                Outcome::Cancelled
            }
        },
    }
}

fn execute<P, H>(prompter: &mut P, host: &mut H, exporter: &IconExporter) -> Result<ExportReport, AppError>
where
    P: Prompter,
    H: ImageHost,
{
    let source = prompter.pick_source().ok_or(AppError::Cancelled)?;

    let mut state = RunState::begin(host);
    let size = state.open(&source)?;
    exporter.validate_source(size)?;

    let out_dir = prompter.pick_output_dir().ok_or(AppError::Cancelled)?;
    ensure_output_dir(&out_dir)?;

    let report = exporter.export_all(&mut state, &out_dir)?;
    Ok(report)
}

/// 输出目录必须存在且可写。
///
/// 可写性以实际创建一个临时文件为准，权限位不考虑属主、ACL 与 root 特权。
fn ensure_output_dir(path: &Path) -> Result<(), AppError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| AppError::OutputDir(format!("{}（{}）", path.display(), e)))?;

    if !metadata.is_dir() {
        return Err(AppError::OutputDir(format!("{} 不是文件夹", path.display())));
    }

    let marker = path.join(format!(".iconset-maker-{}.tmp", std::process::id()));
    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&marker)
        .map_err(|e| AppError::OutputDir(format!("{} 不可写（{}）", path.display(), e)))?;
    if let Err(e) = std::fs::remove_file(&marker) {
        log::warn!("⚠️ 清理写入检查文件失败 {}：{}", marker.display(), e);
    }

    Ok(())
}
