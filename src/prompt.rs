//! 用户交互模块
//!
//! # 设计思路
//!
//! 整个工具只有三处交互：选源图、选输出目录、结束时的一次提示。
//! 抽象为 `Prompter` trait，桌面环境走原生对话框（`rfd`），
//! 命令行直接传两个位置参数，测试中可替换为脚本化实现。
//!
//! # 实现思路
//!
//! - 选择框返回 `None` 即视为取消。
//! - `DialogPrompter` 的文件选择只显示 `.png`。
//! - `ArgsPrompter` 的提示写到 stdout / stderr。

use std::path::PathBuf;

/// 结束提示的级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// 工具所需的交互能力。
pub trait Prompter {
    /// 选择源 PNG；取消返回 `None`。
    fn pick_source(&mut self) -> Option<PathBuf>;

    /// 选择输出目录；取消返回 `None`。
    fn pick_output_dir(&mut self) -> Option<PathBuf>;

    /// 运行结束时的提示。
    fn notify(&mut self, level: NoticeLevel, message: &str);
}

/// 原生对话框实现。
#[derive(Debug, Default)]
pub struct DialogPrompter;

impl Prompter for DialogPrompter {
    fn pick_source(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("选择一张至少 1024x1024 的 PNG 图片")
            .add_filter("PNG", &["png"])
            .pick_file()
    }

    fn pick_output_dir(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new().set_title("选择输出文件夹").pick_folder()
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        let level = match level {
            NoticeLevel::Info => rfd::MessageLevel::Info,
            NoticeLevel::Error => rfd::MessageLevel::Error,
        };

        let _ = rfd::MessageDialog::new()
            .set_level(level)
            .set_title("iconset-maker")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

/// 命令行实现：`iconset-maker <input.png> <output-dir>`。
#[derive(Debug, Clone)]
pub struct ArgsPrompter {
    source: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl ArgsPrompter {
    pub fn new(source: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            output_dir: Some(output_dir.into()),
        }
    }

    /// 恰好两个位置参数时构造；其他数量返回 `None`。
    pub fn from_args(args: &[String]) -> Option<Self> {
        match args {
            [source, output_dir] => Some(Self::new(source, output_dir)),
            _ => None,
        }
    }
}

impl Prompter for ArgsPrompter {
    fn pick_source(&mut self) -> Option<PathBuf> {
        self.source.take()
    }

    fn pick_output_dir(&mut self) -> Option<PathBuf> {
        self.output_dir.take()
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => println!("{}", message),
            NoticeLevel::Error => eprintln!("{}", message),
        }
    }
}
