//! # iMessage 图标生成工具：应用入口
//!
//! 不带参数时弹出原生选择框；传入 `<input.png> <output-dir>` 时直接运行。

use std::process::ExitCode;

use iconset_maker::app::{self, Outcome};
use iconset_maker::icon_export::{ExportConfig, IconExporter, RasterHost};
use iconset_maker::prompt::{ArgsPrompter, DialogPrompter};

const USAGE: &str = "用法: iconset-maker [<input.png> <output-dir>]";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exporter = match IconExporter::new(ExportConfig::default()) {
        Ok(exporter) => exporter,
        Err(err) => {
            log::error!("内置图标尺寸表不可用: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut host = RasterHost::new(exporter.config());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = if args.is_empty() {
        app::run(&mut DialogPrompter, &mut host, &exporter)
    } else if let Some(mut prompter) = ArgsPrompter::from_args(&args) {
        app::run(&mut prompter, &mut host, &exporter)
    } else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match outcome {
        Outcome::Completed(report) => {
            for icon in &report.icons {
                log::debug!("{} -> {}", icon.size, icon.path.display());
            }
            ExitCode::SUCCESS
        }
        Outcome::Cancelled => ExitCode::SUCCESS,
        Outcome::Failed(_) => ExitCode::FAILURE,
    }
}
