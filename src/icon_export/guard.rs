//! # 运行状态守卫（RAII）
//!
//! ## 设计思路
//!
//! 一次运行会临时改动两样东西：宿主的标尺单位偏好，以及打开的文档。
//! `RunState` 在构造时记下原偏好并切换为像素，`Drop` 时关闭文档（不保存）并恢复偏好，
//! 无论流程成功、出错返回还是 panic 展开，清理都会执行。
//!
//! ## 实现思路
//!
//! - 守卫独占 `&mut H`，运行期间其他代码无法绕过它改动宿主。
//! - 打开源图后立即记录快照，作为每个图标回退的起点。

use std::path::Path;

use super::ImageError;
use super::geometry::Size;
use super::host::{Checkpoint, ImageHost, RulerUnits};

/// 单次运行的状态：原始偏好 + 源图快照。
pub struct RunState<'a, H: ImageHost> {
    host: &'a mut H,
    initial_units: RulerUnits,
    start_state: Option<Checkpoint>,
}

impl<'a, H: ImageHost> RunState<'a, H> {
    /// 记录原偏好并切换为像素单位。
    pub fn begin(host: &'a mut H) -> Self {
        let initial_units = host.ruler_units();
        host.set_ruler_units(RulerUnits::Pixels);
        log::debug!("标尺单位 {:?} -> Pixels", initial_units);

        Self {
            host,
            initial_units,
            start_state: None,
        }
    }

    /// 打开源图并记录起始快照，返回源图尺寸。
    pub fn open(&mut self, path: &Path) -> Result<Size, ImageError> {
        self.host.open(path)?;
        self.start_state = Some(self.host.checkpoint()?);
        self.host.dimensions()
    }

    /// 源图刚打开时的快照。
    pub fn start_state(&self) -> Result<Checkpoint, ImageError> {
        self.start_state.ok_or(ImageError::NoDocument)
    }

    pub fn host(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H: ImageHost> Drop for RunState<'_, H> {
    fn drop(&mut self) {
        self.host.close();
        self.host.set_ruler_units(self.initial_units);
        log::debug!("已关闭文档并恢复标尺单位为 {:?}", self.initial_units);
    }
}
