use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

pub const MAX_LANES_LIMIT: usize = 20;

/// Selects the calendar window and the unit system used for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One day, unit = hours.
    Hour,
    /// Five or seven days, unit = days.
    Week,
    /// One calendar month, unit = days.
    Month,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Hour, ViewMode::Week, ViewMode::Month];

    pub fn presets(self) -> &'static [Preset] {
        match self {
            ViewMode::Hour => &[
                Preset::Hours4,
                Preset::Hours6,
                Preset::Hours12,
                Preset::Hours18,
                Preset::Hours24,
            ],
            ViewMode::Week => &[Preset::WorkWeek, Preset::FullWeek],
            ViewMode::Month => &[Preset::Days7, Preset::Days14, Preset::FullMonth],
        }
    }

    pub fn default_preset(self) -> Preset {
        match self {
            ViewMode::Hour => Preset::Hours24,
            ViewMode::Week => Preset::FullWeek,
            ViewMode::Month => Preset::FullMonth,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Hour => "Hour",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hour" | "day" => Ok(ViewMode::Hour),
            "week" => Ok(ViewMode::Week),
            "month" => Ok(ViewMode::Month),
            _ => Err(TimelineError::UnknownViewMode(s.to_string())),
        }
    }
}

/// A named sub-option of a view mode controlling the visible window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    Hours4,
    Hours6,
    Hours12,
    Hours18,
    Hours24,
    WorkWeek,
    FullWeek,
    Days7,
    Days14,
    FullMonth,
}

impl Preset {
    pub fn mode(self) -> ViewMode {
        match self {
            Preset::Hours4 | Preset::Hours6 | Preset::Hours12 | Preset::Hours18 | Preset::Hours24 => {
                ViewMode::Hour
            }
            Preset::WorkWeek | Preset::FullWeek => ViewMode::Week,
            Preset::Days7 | Preset::Days14 | Preset::FullMonth => ViewMode::Month,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::Hours4 => "4 Hours",
            Preset::Hours6 => "6 Hours",
            Preset::Hours12 => "12 Hours",
            Preset::Hours18 => "18 Hours",
            Preset::Hours24 => "24 Hours",
            Preset::WorkWeek => "Work Week",
            Preset::FullWeek => "Full Week",
            Preset::Days7 => "7 Days",
            Preset::Days14 => "14 Days",
            Preset::FullMonth => "Full Month",
        }
    }

    /// Units that should fit the viewport width without scrolling.
    /// `None` means "the whole window" (full week, full month).
    pub fn visible_units(self) -> Option<f64> {
        match self {
            Preset::Hours4 => Some(4.0),
            Preset::Hours6 => Some(6.0),
            Preset::Hours12 => Some(12.0),
            Preset::Hours18 => Some(18.0),
            Preset::Hours24 => Some(24.0),
            Preset::Days7 => Some(7.0),
            Preset::Days14 => Some(14.0),
            Preset::WorkWeek | Preset::FullWeek | Preset::FullMonth => None,
        }
    }

    /// Short hour windows get 5-minute ticks on the ruler.
    pub fn is_short_hour_window(self) -> bool {
        matches!(self, Preset::Hours4 | Preset::Hours6)
    }

    pub fn snap_options(self) -> &'static [SnapOption] {
        match self.mode() {
            ViewMode::Hour => HOUR_SNAPS,
            ViewMode::Week => WEEK_SNAPS,
            ViewMode::Month if self == Preset::FullMonth => FULL_MONTH_SNAPS,
            ViewMode::Month => SHORT_MONTH_SNAPS,
        }
    }

    pub fn default_snap(self) -> f64 {
        let (options, idx) = match self.mode() {
            ViewMode::Hour => (HOUR_SNAPS, 3),
            ViewMode::Week => (WEEK_SNAPS, 2),
            ViewMode::Month if self == Preset::FullMonth => (FULL_MONTH_SNAPS, 2),
            ViewMode::Month => (SHORT_MONTH_SNAPS, 0),
        };
        options[idx].units
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Preset {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        ViewMode::ALL
            .iter()
            .flat_map(|m| m.presets().iter().copied())
            .find(|p| p.label().to_lowercase() == wanted)
            .ok_or_else(|| TimelineError::UnknownPreset(s.to_string()))
    }
}

/// A selectable snap granularity, in view-units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOption {
    pub label: &'static str,
    pub units: f64,
}

const MINUTE_IN_HOURS: f64 = 1.0 / 60.0;
const MINUTE_IN_DAYS: f64 = 1.0 / 1440.0;

static HOUR_SNAPS: &[SnapOption] = &[
    SnapOption { label: "1 min", units: MINUTE_IN_HOURS },
    SnapOption { label: "5 min", units: 5.0 * MINUTE_IN_HOURS },
    SnapOption { label: "10 min", units: 10.0 * MINUTE_IN_HOURS },
    SnapOption { label: "15 min", units: 15.0 * MINUTE_IN_HOURS },
];

static WEEK_SNAPS: &[SnapOption] = &[
    SnapOption { label: "15 min", units: 15.0 * MINUTE_IN_DAYS },
    SnapOption { label: "30 min", units: 30.0 * MINUTE_IN_DAYS },
    SnapOption { label: "1 hour", units: 60.0 * MINUTE_IN_DAYS },
    SnapOption { label: "2 hours", units: 120.0 * MINUTE_IN_DAYS },
    SnapOption { label: "4 hours", units: 240.0 * MINUTE_IN_DAYS },
];

static FULL_MONTH_SNAPS: &[SnapOption] = &[
    SnapOption { label: "6 hours", units: 0.25 },
    SnapOption { label: "12 hours", units: 0.5 },
    SnapOption { label: "1 day", units: 1.0 },
];

static SHORT_MONTH_SNAPS: &[SnapOption] = &[
    SnapOption { label: "1 hour", units: 60.0 * MINUTE_IN_DAYS },
    SnapOption { label: "2 hours", units: 120.0 * MINUTE_IN_DAYS },
    SnapOption { label: "4 hours", units: 240.0 * MINUTE_IN_DAYS },
];

/// Vertical gap between stacked lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LaneOffset {
    Tight,
    #[default]
    Normal,
    Loose,
}

impl LaneOffset {
    pub const ALL: [LaneOffset; 3] = [LaneOffset::Tight, LaneOffset::Normal, LaneOffset::Loose];

    pub fn px(self) -> f32 {
        match self {
            LaneOffset::Tight => 2.0,
            LaneOffset::Normal => 5.0,
            LaneOffset::Loose => 10.0,
        }
    }

    pub fn from_px(px: u32) -> Result<Self> {
        match px {
            2 => Ok(LaneOffset::Tight),
            5 => Ok(LaneOffset::Normal),
            10 => Ok(LaneOffset::Loose),
            other => Err(TimelineError::InvalidLaneOffset(other)),
        }
    }
}

/// Process-local UI state selecting what the timeline shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub preset: Preset,
    /// Day shown in hour view, the week containing it in week view, its month
    /// in month view.
    pub anchor: NaiveDate,
    pub snap_unit: f64,
    pub lane_offset: LaneOffset,
    pub max_lanes: usize,
}

impl ViewState {
    pub fn new(mode: ViewMode, preset: Preset, anchor: NaiveDate) -> Result<Self> {
        if preset.mode() != mode {
            return Err(TimelineError::PresetMismatch {
                mode: mode.to_string(),
                preset: preset.to_string(),
            });
        }
        let mut view = Self::for_mode(mode, anchor);
        view.preset = preset;
        view.snap_unit = preset.default_snap();
        Ok(view)
    }

    /// A view of `mode` with its default preset.
    pub fn for_mode(mode: ViewMode, anchor: NaiveDate) -> Self {
        let preset = mode.default_preset();
        Self {
            mode,
            preset,
            anchor,
            snap_unit: preset.default_snap(),
            lane_offset: LaneOffset::default(),
            max_lanes: 3,
        }
    }

    /// Switch mode; the preset and snap unit reset to the mode's defaults.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            self.preset = mode.default_preset();
            self.snap_unit = self.preset.default_snap();
        }
    }

    pub fn set_preset(&mut self, preset: Preset) -> Result<()> {
        if preset.mode() != self.mode {
            return Err(TimelineError::PresetMismatch {
                mode: self.mode.to_string(),
                preset: preset.to_string(),
            });
        }
        if self.preset != preset {
            self.preset = preset;
            self.snap_unit = preset.default_snap();
        }
        Ok(())
    }

    pub fn set_max_lanes(&mut self, max_lanes: usize) -> Result<()> {
        if !(1..=MAX_LANES_LIMIT).contains(&max_lanes) {
            return Err(TimelineError::MaxLanesOutOfRange(max_lanes));
        }
        self.max_lanes = max_lanes;
        Ok(())
    }

    /// Move the anchor by whole windows (days, weeks or months).
    pub fn step_anchor(&mut self, steps: i32) {
        self.anchor = match self.mode {
            ViewMode::Hour => self.anchor + chrono::Duration::days(steps as i64),
            ViewMode::Week => self.anchor + chrono::Duration::days(7 * steps as i64),
            ViewMode::Month => {
                let first = self.anchor.with_day(1).unwrap_or(self.anchor);
                let months = Months::new(steps.unsigned_abs());
                let moved = if steps >= 0 {
                    first.checked_add_months(months)
                } else {
                    first.checked_sub_months(months)
                };
                moved.unwrap_or(first)
            }
        };
    }

    pub fn snap_label(&self) -> &'static str {
        self.preset
            .snap_options()
            .iter()
            .find(|o| (o.units - self.snap_unit).abs() < 1e-9)
            .map(|o| o.label)
            .unwrap_or("custom")
    }
}

/// Parse a `YYYY-MM` month anchor into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    let bad = || TimelineError::InvalidMonth(s.to_string());
    let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
    let year: i32 = y.parse().map_err(|_| bad())?;
    let month: u32 = m.parse().map_err(|_| bad())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(bad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn preset_labels_parse_back() {
        for mode in ViewMode::ALL {
            for preset in mode.presets() {
                assert_eq!(preset.label().parse::<Preset>().unwrap(), *preset);
                assert_eq!(preset.mode(), mode);
            }
        }
        assert!("3 Weeks".parse::<Preset>().is_err());
    }

    #[test]
    fn mismatched_preset_is_rejected() {
        let err = ViewState::new(ViewMode::Hour, Preset::WorkWeek, day(2024, 3, 5)).unwrap_err();
        assert!(matches!(err, TimelineError::PresetMismatch { .. }));
    }

    #[test]
    fn mode_switch_resets_preset_and_snap() {
        let mut view = ViewState::new(ViewMode::Hour, Preset::Hours6, day(2024, 3, 5)).unwrap();
        assert!((view.snap_unit - 0.25).abs() < 1e-12);
        view.set_mode(ViewMode::Month);
        assert_eq!(view.preset, Preset::FullMonth);
        assert_eq!(view.snap_unit, 1.0);
        view.set_preset(Preset::Days14).unwrap();
        assert!((view.snap_unit - 1.0 / 24.0).abs() < 1e-12);
        assert_eq!(view.snap_label(), "1 hour");
    }

    #[test]
    fn max_lanes_bounds() {
        let mut view = ViewState::new(ViewMode::Week, Preset::FullWeek, day(2024, 3, 5)).unwrap();
        assert!(view.set_max_lanes(0).is_err());
        assert!(view.set_max_lanes(21).is_err());
        view.set_max_lanes(20).unwrap();
        assert_eq!(view.max_lanes, 20);
    }

    #[test]
    fn month_steps_clamp_to_first_of_month() {
        let mut view = ViewState::new(ViewMode::Month, Preset::FullMonth, day(2024, 1, 31)).unwrap();
        view.step_anchor(1);
        assert_eq!(view.anchor, day(2024, 2, 1));
        view.step_anchor(-2);
        assert_eq!(view.anchor, day(2023, 12, 1));
    }

    #[test]
    fn parses_month_anchor() {
        assert_eq!(parse_month("2024-02").unwrap(), day(2024, 2, 1));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("Feb 2024").is_err());
    }

    #[test]
    fn lane_offset_px_values() {
        assert_eq!(LaneOffset::from_px(10).unwrap(), LaneOffset::Loose);
        assert!(LaneOffset::from_px(3).is_err());
        assert_eq!(LaneOffset::default().px(), 5.0);
    }
}
