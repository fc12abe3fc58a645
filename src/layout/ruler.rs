//! Ruler gridlines, labels and period shading, as plain positioned primitives.
//!
//! Bands come from [`period_bands`] for both the ruler and the bar pane
//! overlay, so both layers shade exactly the same pixels.

use chrono::{Datelike, Weekday};

use super::projection::ViewWindow;
use super::scale::Scale;
use crate::model::{Preset, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Hour or day boundary.
    Major,
    /// Half-hour.
    Minor,
    /// Five-minute tick on short hour windows.
    Fine,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gridline {
    pub x: f32,
    pub kind: TickKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RulerLabel {
    pub x: f32,
    pub text: String,
    pub align: LabelAlign,
}

/// A shaded column (weekend day) in content pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub left: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ruler {
    pub gridlines: Vec<Gridline>,
    pub labels: Vec<RulerLabel>,
    pub bands: Vec<Band>,
}

pub fn build_ruler(window: &ViewWindow, scale: &Scale) -> Ruler {
    let mut ruler = match window.mode {
        ViewMode::Hour => hour_ruler(window, scale),
        ViewMode::Week => day_ruler(window, scale, |date| date.format("%a %d").to_string()),
        ViewMode::Month => day_ruler(window, scale, |date| date.day().to_string()),
    };
    ruler.bands = period_bands(window, scale);
    ruler
}

fn hour_ruler(window: &ViewWindow, scale: &Scale) -> Ruler {
    let hours = window.total_units().round() as u32;
    let fine = window.preset.is_short_hour_window();
    let mut gridlines = Vec::new();
    let mut labels = Vec::new();

    for h in 0..=hours {
        let base = h as f64;
        gridlines.push(Gridline {
            x: scale.x_of(base),
            kind: TickKind::Major,
        });

        let align = if h == 0 {
            LabelAlign::Left
        } else if h == hours {
            LabelAlign::Right
        } else {
            LabelAlign::Center
        };
        labels.push(RulerLabel {
            x: scale.x_of(base),
            text: format!("{:02}", h),
            align,
        });

        if h == hours {
            break;
        }
        gridlines.push(Gridline {
            x: scale.x_of(base + 0.5),
            kind: TickKind::Minor,
        });
        if fine {
            for m in (5..60).step_by(5).filter(|m| *m != 30) {
                gridlines.push(Gridline {
                    x: scale.x_of(base + m as f64 / 60.0),
                    kind: TickKind::Fine,
                });
            }
        }
    }

    Ruler {
        gridlines,
        labels,
        bands: Vec::new(),
    }
}

fn day_ruler(
    window: &ViewWindow,
    scale: &Scale,
    label: impl Fn(chrono::NaiveDate) -> String,
) -> Ruler {
    let days = window.day_count();
    let mut gridlines = Vec::with_capacity(days + 1);
    let mut labels = Vec::with_capacity(days);

    for d in 0..=days {
        gridlines.push(Gridline {
            x: scale.x_of(d as f64),
            kind: TickKind::Major,
        });
        if d < days {
            let (left, width) = scale.span_px(d as f64, d as f64 + 1.0);
            labels.push(RulerLabel {
                x: left + (width / 2.0).floor(),
                text: label(window.day(d)),
                align: LabelAlign::Center,
            });
        }
    }

    Ruler {
        gridlines,
        labels,
        bands: Vec::new(),
    }
}

/// Weekend shading: month view and the 7-day week only.
pub fn period_bands(window: &ViewWindow, scale: &Scale) -> Vec<Band> {
    let shades_weekends = match window.mode {
        ViewMode::Hour => false,
        ViewMode::Week => window.preset == Preset::FullWeek,
        ViewMode::Month => true,
    };
    if !shades_weekends {
        return Vec::new();
    }

    (0..window.day_count())
        .filter(|&d| matches!(window.day(d).weekday(), Weekday::Sat | Weekday::Sun))
        .map(|d| {
            let (left, width) = scale.span_px(d as f64, d as f64 + 1.0);
            Band { left, width }
        })
        .collect()
}
