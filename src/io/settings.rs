use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{LaneOffset, Preset, ViewMode, ViewState};
use crate::timeline::Timeline;

/// View choices remembered between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub mode: ViewMode,
    pub preset: Preset,
    /// Snap granularity in view-units of `mode`.
    pub snap_unit: f64,
    pub lane_offset_px: u32,
    pub max_lanes: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        let mode = ViewMode::Month;
        let preset = mode.default_preset();
        Self {
            mode,
            preset,
            snap_unit: preset.default_snap(),
            lane_offset_px: LaneOffset::default().px() as u32,
            max_lanes: 3,
        }
    }
}

impl From<&ViewState> for ViewSettings {
    fn from(view: &ViewState) -> Self {
        Self {
            mode: view.mode,
            preset: view.preset,
            snap_unit: view.snap_unit,
            lane_offset_px: view.lane_offset.px() as u32,
            max_lanes: view.max_lanes,
        }
    }
}

impl ViewSettings {
    /// Apply to a timeline. Values that no longer validate are skipped with a
    /// warning and the rest still applied; the first failure is returned.
    pub fn apply(&self, timeline: &mut Timeline) -> Result<()> {
        let mut failures = Vec::new();

        timeline.set_mode(self.mode);
        match timeline.set_preset(self.preset) {
            Ok(()) => {
                let snap_known = self
                    .preset
                    .snap_options()
                    .iter()
                    .any(|o| (o.units - self.snap_unit).abs() < 1e-9);
                if snap_known {
                    timeline.set_snap_unit(self.snap_unit);
                }
            }
            Err(e) => failures.push(e),
        }
        if let Err(e) = timeline.set_max_lanes(self.max_lanes) {
            failures.push(e);
        }
        match LaneOffset::from_px(self.lane_offset_px) {
            Ok(offset) => timeline.set_lane_offset(offset),
            Err(e) => failures.push(e),
        }

        for e in &failures {
            tracing::warn!("stored view setting skipped: {}", e);
        }
        match failures.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Where settings live: the platform config dir, or the working directory.
pub fn settings_path() -> PathBuf {
    match directories::ProjectDirs::from("", "", "RustTimelineApp") {
        Some(dirs) => dirs.config_dir().join("settings.json"),
        None => PathBuf::from("settings.json"),
    }
}

/// Missing or unreadable files give the defaults.
pub fn load_settings(path: &Path) -> ViewSettings {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| match serde_json::from_str(&s) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!("ignoring corrupt settings {}: {}", path.display(), e);
                None
            }
        })
        .unwrap_or_default()
}

pub fn save_settings(settings: &ViewSettings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(settings)?)?;
    Ok(())
}
