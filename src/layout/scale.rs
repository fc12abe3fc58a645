use chrono::NaiveDate;

use super::projection::ViewWindow;
use crate::model::{Preset, ViewMode};

/// Width assumed when the host reports a zero, negative or non-finite viewport.
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1200.0;

/// Linear mapping from view-units to pixels for one window and viewport.
///
/// Every pixel position handed to a renderer goes through [`Scale::x_of`], which
/// floors. Ruler gridlines, period bands and bar edges therefore land on the
/// same integer pixel for the same unit value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub total_units: f64,
    pub visible_units: f64,
    pub px_per_unit: f64,
    pub content_px: f64,
}

impl Scale {
    pub fn compute(window: &ViewWindow, viewport_width: f32) -> Self {
        let width = if viewport_width.is_finite() && viewport_width > 0.0 {
            viewport_width as f64
        } else {
            tracing::debug!("viewport width {} unusable, assuming {}", viewport_width, DEFAULT_VIEWPORT_WIDTH);
            DEFAULT_VIEWPORT_WIDTH as f64
        };

        let total_units = window.total_units();
        // Week view always fits the viewport; shorter hour and day presets
        // size units as if only part of the window were shown.
        let visible_units = match window.mode {
            ViewMode::Week => total_units,
            ViewMode::Hour | ViewMode::Month => window
                .preset
                .visible_units()
                .unwrap_or(total_units)
                .min(total_units),
        };
        let px_per_unit = width / visible_units.max(1.0);

        Self {
            total_units,
            visible_units,
            px_per_unit,
            content_px: px_per_unit * total_units,
        }
    }

    /// Pixel offset of a unit position, floored.
    pub fn x_of(&self, units: f64) -> f32 {
        (units * self.px_per_unit).floor() as f32
    }

    pub fn units_of(&self, px: f64) -> f64 {
        px / self.px_per_unit
    }

    /// Floored `(left, width)` of a unit span.
    pub fn span_px(&self, start_unit: f64, end_unit: f64) -> (f32, f32) {
        let left = self.x_of(start_unit);
        (left, self.x_of(end_unit) - left)
    }

    pub fn content_width(&self) -> f32 {
        self.content_px.ceil() as f32
    }

    /// Whether the content is wider than the viewport.
    pub fn scrolls_horizontally(&self) -> bool {
        self.total_units > self.visible_units
    }
}

/// Scale for a mode, preset and anchor without building the window first.
pub fn compute_scale(mode: ViewMode, preset: Preset, anchor: NaiveDate, viewport_width: f32) -> Scale {
    Scale::compute(&ViewWindow::new(mode, preset, anchor), viewport_width)
}
