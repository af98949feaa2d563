// 端到端测试：通过脚本化的 Prompter 驱动 app::run，在临时目录中检查输出文件。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{ImageFormat, Rgba, RgbaImage};
use iconset_maker::app::{self, Outcome, SUCCESS_MESSAGE};
use iconset_maker::icon_export::{
    ExportConfig, IconExporter, IconSpec, ImageHost, OverwritePolicy, RasterHost, RulerUnits,
};
use iconset_maker::prompt::{NoticeLevel, Prompter};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);

struct ScriptedPrompter {
    source: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    notices: Vec<(NoticeLevel, String)>,
}

impl ScriptedPrompter {
    fn new(source: Option<&Path>, output_dir: Option<&Path>) -> Self {
        Self {
            source: source.map(Path::to_path_buf),
            output_dir: output_dir.map(Path::to_path_buf),
            notices: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn pick_source(&mut self) -> Option<PathBuf> {
        self.source.take()
    }

    fn pick_output_dir(&mut self) -> Option<PathBuf> {
        self.output_dir.take()
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!("{}_{}", prefix, nanos));
    let _ = fs::create_dir_all(&dir);
    dir
}

fn write_gradient_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 251) as u8, (y % 241) as u8, ((x * 3 + y) % 239) as u8, 255])
    });
    img.save_with_format(path, ImageFormat::Png)
        .expect("failed to write test png");
}

fn write_solid_png(path: &Path, width: u32, height: u32, colour: Rgba<u8>) {
    RgbaImage::from_pixel(width, height, colour)
        .save_with_format(path, ImageFormat::Png)
        .expect("failed to write test png");
}

fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.flatten().count()).unwrap_or(0)
}

fn close_to(actual: Rgba<u8>, expected: Rgba<u8>) -> bool {
    actual
        .0
        .iter()
        .zip(expected.0.iter())
        .all(|(a, b)| a.abs_diff(*b) <= 2)
}

fn default_exporter() -> IconExporter {
    IconExporter::new(ExportConfig::default()).expect("builtin table should load")
}

#[test]
fn every_table_entry_is_written_with_exact_dimensions() {
    let work = unique_temp_dir("iconset_it_all_sizes");
    let source = work.join("artwork.png");
    let out = work.join("out");
    fs::create_dir_all(&out).expect("create out dir failed");
    write_gradient_png(&source, 1024, 1024);

    let exporter = default_exporter();
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(Some(&source), Some(&out));

    let outcome = app::run(&mut prompter, &mut host, &exporter);
    let report = match outcome {
        Outcome::Completed(report) => report,
        other => panic!("expected completion, got {:?}", other),
    };

    assert_eq!(report.icons.len(), 15);
    assert_eq!(file_count(&out), 15);
    for spec in exporter.table() {
        let path = out.join(format!("{}.png", spec.name));
        let written = image::open(&path).expect("exported icon should decode");
        assert_eq!(
            (written.width(), written.height()),
            (spec.width, spec.height),
            "{} has wrong size",
            spec.name
        );
        assert_eq!(written.color(), image::ColorType::Rgba8);
    }

    assert_eq!(
        prompter.notices,
        vec![(NoticeLevel::Info, SUCCESS_MESSAGE.to_string())]
    );
    // 源文件不被修改
    let reopened = image::open(&source).expect("source should still decode");
    assert_eq!((reopened.width(), reopened.height()), (1024, 1024));

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn portrait_source_is_fitted_by_height_and_padded_white() {
    let work = unique_temp_dir("iconset_it_portrait");
    let source = work.join("tall.png");
    write_solid_png(&source, 1024, 2048, RED);

    let exporter = IconExporter::with_table(
        ExportConfig::default(),
        vec![IconSpec::new("Icon-1024x768", 1024, 768)],
    );
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(Some(&source), Some(&work));
    assert!(matches!(
        app::run(&mut prompter, &mut host, &exporter),
        Outcome::Completed(_)
    ));

    // 高度对齐 768 后宽 384，左右各留 320 白边
    let icon = image::open(work.join("Icon-1024x768.png"))
        .expect("icon should decode")
        .to_rgba8();
    assert_eq!(*icon.get_pixel(0, 384), WHITE);
    assert_eq!(*icon.get_pixel(319, 384), WHITE);
    assert!(close_to(*icon.get_pixel(512, 0), RED));
    assert!(close_to(*icon.get_pixel(512, 767), RED));
    assert_eq!(*icon.get_pixel(1023, 384), WHITE);

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn landscape_source_is_fitted_by_width_and_padded_white() {
    let work = unique_temp_dir("iconset_it_landscape");
    let source = work.join("wide.png");
    write_solid_png(&source, 2048, 1024, RED);

    let exporter =
        IconExporter::with_table(ExportConfig::default(), vec![IconSpec::square("Icon-29", 29)]);
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(Some(&source), Some(&work));
    assert!(matches!(
        app::run(&mut prompter, &mut host, &exporter),
        Outcome::Completed(_)
    ));

    // 宽度对齐 29 后高 15，上方 7 行、下方 7 行白边
    let icon = image::open(work.join("Icon-29.png"))
        .expect("icon should decode")
        .to_rgba8();
    assert_eq!(*icon.get_pixel(14, 0), WHITE);
    assert_eq!(*icon.get_pixel(14, 6), WHITE);
    assert!(close_to(*icon.get_pixel(14, 14), RED));
    assert_eq!(*icon.get_pixel(14, 28), WHITE);

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn undersized_source_writes_nothing_and_reports_minimum() {
    let work = unique_temp_dir("iconset_it_small");
    let source = work.join("small.png");
    let out = work.join("out");
    fs::create_dir_all(&out).expect("create out dir failed");
    write_gradient_png(&source, 512, 512);

    let exporter = default_exporter();
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(Some(&source), Some(&out));

    let outcome = app::run(&mut prompter, &mut host, &exporter);
    match outcome {
        Outcome::Failed(message) => assert!(message.contains("1024x1024"), "{}", message),
        other => panic!("expected failure, got {:?}", other),
    }

    assert_eq!(file_count(&out), 0);
    assert_eq!(prompter.notices.len(), 1);
    assert_eq!(prompter.notices[0].0, NoticeLevel::Error);
    // 源图太小时不应继续询问输出目录
    assert!(prompter.output_dir.is_some());
    assert!(!host.has_document());

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn cancelling_the_source_prompt_is_silent() {
    let work = unique_temp_dir("iconset_it_cancel_source");

    let exporter = default_exporter();
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(None, Some(&work));

    assert!(matches!(
        app::run(&mut prompter, &mut host, &exporter),
        Outcome::Cancelled
    ));
    assert!(prompter.notices.is_empty());
    assert_eq!(file_count(&work), 0);

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn cancelling_the_output_prompt_is_silent_and_closes_document() {
    let work = unique_temp_dir("iconset_it_cancel_output");
    let source = work.join("artwork.png");
    write_gradient_png(&source, 1024, 1024);

    let exporter = default_exporter();
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(Some(&source), None);

    assert!(matches!(
        app::run(&mut prompter, &mut host, &exporter),
        Outcome::Cancelled
    ));
    assert!(prompter.notices.is_empty());
    assert_eq!(file_count(&work), 1);
    assert!(!host.has_document());

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn repeated_runs_produce_identical_bytes() {
    let work = unique_temp_dir("iconset_it_determinism");
    let source = work.join("artwork.png");
    write_gradient_png(&source, 1024, 1024);

    let exporter = default_exporter();
    let mut outputs = Vec::new();
    for round in 0..2 {
        let out = work.join(format!("out_{}", round));
        fs::create_dir_all(&out).expect("create out dir failed");

        let mut host = RasterHost::new(exporter.config());
        let mut prompter = ScriptedPrompter::new(Some(&source), Some(&out));
        assert!(matches!(
            app::run(&mut prompter, &mut host, &exporter),
            Outcome::Completed(_)
        ));
        outputs.push(out);
    }

    for spec in exporter.table() {
        let first = fs::read(spec.output_path(&outputs[0])).expect("first output missing");
        let second = fs::read(spec.output_path(&outputs[1])).expect("second output missing");
        assert_eq!(first, second, "{} differs between runs", spec.name);
    }

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn existing_file_with_colliding_name_is_replaced() {
    let work = unique_temp_dir("iconset_it_overwrite");
    let source = work.join("artwork.png");
    let out = work.join("out");
    fs::create_dir_all(&out).expect("create out dir failed");
    write_gradient_png(&source, 1024, 1024);
    fs::write(out.join("Icon-29.png"), b"old icon").expect("seed existing file failed");

    let exporter = default_exporter();
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(Some(&source), Some(&out));

    let report = match app::run(&mut prompter, &mut host, &exporter) {
        Outcome::Completed(report) => report,
        other => panic!("expected completion, got {:?}", other),
    };

    let replaced: Vec<&str> = report
        .icons
        .iter()
        .filter(|icon| icon.replaced)
        .map(|icon| icon.name.as_str())
        .collect();
    assert_eq!(replaced, vec!["Icon-29"]);

    let icon = image::open(out.join("Icon-29.png")).expect("replaced icon should decode");
    assert_eq!((icon.width(), icon.height()), (29, 29));

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn refuse_policy_aborts_before_writing_anything() {
    let work = unique_temp_dir("iconset_it_refuse");
    let source = work.join("artwork.png");
    let out = work.join("out");
    fs::create_dir_all(&out).expect("create out dir failed");
    write_gradient_png(&source, 1024, 1024);
    fs::write(out.join("Icon-29.png"), b"old icon").expect("seed existing file failed");

    let config = ExportConfig {
        overwrite: OverwritePolicy::Refuse,
        ..ExportConfig::default()
    };
    let exporter = IconExporter::new(config).expect("builtin table should load");
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(Some(&source), Some(&out));

    match app::run(&mut prompter, &mut host, &exporter) {
        Outcome::Failed(message) => assert!(message.contains("Icon-29.png"), "{}", message),
        other => panic!("expected failure, got {:?}", other),
    }

    assert_eq!(file_count(&out), 1);
    assert_eq!(fs::read(out.join("Icon-29.png")).expect("seed file"), b"old icon");

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn non_png_source_is_rejected_before_any_write() {
    let work = unique_temp_dir("iconset_it_not_png");
    let source = work.join("notes.png");
    let out = work.join("out");
    fs::create_dir_all(&out).expect("create out dir failed");
    fs::write(&source, b"this is a text file").expect("write source failed");

    let exporter = default_exporter();
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(Some(&source), Some(&out));

    assert!(matches!(
        app::run(&mut prompter, &mut host, &exporter),
        Outcome::Failed(_)
    ));
    assert_eq!(file_count(&out), 0);

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn missing_output_dir_is_reported() {
    let work = unique_temp_dir("iconset_it_missing_out");
    let source = work.join("artwork.png");
    write_gradient_png(&source, 1024, 1024);

    let exporter = default_exporter();
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(Some(&source), Some(&work.join("nope")));

    assert!(matches!(
        app::run(&mut prompter, &mut host, &exporter),
        Outcome::Failed(_)
    ));
    assert!(!work.join("nope").exists());

    let _ = fs::remove_dir_all(&work);
}

#[test]
fn ruler_units_are_restored_after_success_and_failure() {
    let work = unique_temp_dir("iconset_it_units");
    let good = work.join("good.png");
    let small = work.join("small.png");
    let out = work.join("out");
    fs::create_dir_all(&out).expect("create out dir failed");
    write_gradient_png(&good, 1024, 1024);
    write_gradient_png(&small, 256, 256);

    let exporter = IconExporter::with_table(
        ExportConfig::default(),
        vec![IconSpec::square("Icon-29", 29)],
    );
    let mut host = RasterHost::new(exporter.config());
    host.set_ruler_units(RulerUnits::Centimeters);

    let mut ok = ScriptedPrompter::new(Some(&good), Some(&out));
    assert!(matches!(app::run(&mut ok, &mut host, &exporter), Outcome::Completed(_)));
    assert_eq!(host.ruler_units(), RulerUnits::Centimeters);

    let mut failing = ScriptedPrompter::new(Some(&small), Some(&out));
    assert!(matches!(app::run(&mut failing, &mut host, &exporter), Outcome::Failed(_)));
    assert_eq!(host.ruler_units(), RulerUnits::Centimeters);
    assert!(!host.has_document());

    let _ = fs::remove_dir_all(&work);
}

#[cfg(unix)]
#[test]
fn read_only_mode_bits_do_not_block_a_writable_dir() {
    use std::os::unix::fs::PermissionsExt;

    let work = unique_temp_dir("iconset_it_mode_bits");
    let source = work.join("source.png");
    let out = work.join("out");
    fs::create_dir_all(&out).expect("create out dir failed");
    write_gradient_png(&source, 1024, 1024);
    fs::set_permissions(&out, fs::Permissions::from_mode(0o555)).expect("chmod failed");

    let direct = out.join("direct.txt");
    let actually_writable = fs::write(&direct, b"x").is_ok();
    let _ = fs::remove_file(&direct);

    let exporter = IconExporter::with_table(
        ExportConfig::default(),
        vec![IconSpec::square("Icon-29", 29)],
    );
    let mut host = RasterHost::new(exporter.config());
    let mut prompter = ScriptedPrompter::new(Some(&source), Some(&out));
    let outcome = app::run(&mut prompter, &mut host, &exporter);

    if actually_writable {
        assert!(matches!(outcome, Outcome::Completed(_)), "{:?}", outcome);
        assert_eq!(file_count(&out), 1);
        assert!(out.join("Icon-29.png").is_file());
    } else {
        assert!(matches!(outcome, Outcome::Failed(_)), "{:?}", outcome);
        assert_eq!(file_count(&out), 0);
    }

    let _ = fs::set_permissions(&out, fs::Permissions::from_mode(0o755));
    let _ = fs::remove_dir_all(&work);
}
