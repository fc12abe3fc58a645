//! Pointer-driven move / resize state machine.
//!
//! `Idle -> Dragging { Move | ResizeLeft | ResizeRight } -> Idle`. The host
//! wires raw pointer events to [`DragController::begin`],
//! [`update`](DragController::update) and [`end`](DragController::end); the
//! controller only does geometry. It never edits tasks: `end` yields a
//! [`TaskChange`] for the data owner to apply or reject.

use egui::Pos2;

use super::projection::ViewWindow;
use super::scale::Scale;

/// Bars never shrink below this while resizing.
pub const MIN_DRAG_WIDTH_PX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    Move,
    ResizeLeft,
    ResizeRight,
}

impl DragMode {
    /// Decide the gesture from where inside the bar the pointer went down.
    /// `edge_px` is the grab zone at each end.
    pub fn from_offset(offset_x: f32, bar_width: f32, edge_px: f32) -> Self {
        if offset_x <= edge_px {
            DragMode::ResizeLeft
        } else if bar_width - offset_x <= edge_px {
            DragMode::ResizeRight
        } else {
            DragMode::Move
        }
    }
}

/// Geometry of the grabbed bar at pointer-down, in unfloored content pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DragAnchor {
    pub task_id: String,
    pub left_px: f64,
    pub width_px: f64,
    pub pointer_x: f32,
}

/// The mapping a drag session converts pixels through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragContext {
    pub scale: Scale,
    pub window: ViewWindow,
    pub snap_unit: f64,
}

/// Semantic result of a completed gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChange {
    pub task_id: String,
    pub start_unit: f64,
    pub duration_units: f64,
    pub mode: DragMode,
    pub snap_unit: f64,
    /// The segment the gesture started from, so owners can apply relative edits.
    pub from_start_unit: f64,
    pub from_end_unit: f64,
}

impl TaskChange {
    pub fn end_unit(&self) -> f64 {
        self.start_unit + self.duration_units
    }

    /// Shift of the start edge, in view-units.
    pub fn start_delta(&self) -> f64 {
        self.start_unit - self.from_start_unit
    }

    /// Shift of the end edge, in view-units.
    pub fn end_delta(&self) -> f64 {
        self.end_unit() - self.from_end_unit
    }

    pub fn is_noop(&self) -> bool {
        self.start_delta().abs() < 1e-9 && self.end_delta().abs() < 1e-9
    }
}

/// Floating label showing the live date range. Lives exactly as long as the
/// drag session that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipOverlay {
    pub text: String,
    pub pointer: Pos2,
}

/// Live bar geometry while dragging, in unfloored content pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    pub task_id: String,
    pub mode: DragMode,
    pub left_px: f64,
    pub width_px: f64,
}

#[derive(Debug)]
struct DragSession {
    pointer_id: u64,
    mode: DragMode,
    anchor: DragAnchor,
    ctx: DragContext,
    left: f64,
    width: f64,
    tooltip: TooltipOverlay,
}

impl DragSession {
    fn apply(&mut self, pointer: Pos2) {
        let raw_dx = (pointer.x - self.anchor.pointer_x) as f64;
        let dx = snap_px(raw_dx, self.ctx.scale.px_per_unit, self.ctx.snap_unit);
        let left = self.anchor.left_px;
        let width = self.anchor.width_px;

        match self.mode {
            DragMode::Move => {
                self.left = left + dx;
                self.width = width;
            }
            DragMode::ResizeLeft => {
                let right = left + width;
                self.width = (width - dx).max(MIN_DRAG_WIDTH_PX);
                self.left = right - self.width;
            }
            DragMode::ResizeRight => {
                self.left = left;
                self.width = (width + dx).max(MIN_DRAG_WIDTH_PX);
            }
        }

        self.tooltip = TooltipOverlay {
            text: self.range_text(),
            pointer,
        };
    }

    fn range_text(&self) -> String {
        let scale = &self.ctx.scale;
        let start = self.ctx.window.instant_at(scale.units_of(self.left));
        let end = self.ctx.window.instant_at(scale.units_of(self.left + self.width));
        format!("{} → {}", start.format("%d/%m %H:%M"), end.format("%d/%m %H:%M"))
    }

    fn change(&self) -> TaskChange {
        let scale = &self.ctx.scale;
        TaskChange {
            task_id: self.anchor.task_id.clone(),
            start_unit: scale.units_of(self.left),
            duration_units: scale.units_of(self.width),
            mode: self.mode,
            snap_unit: self.ctx.snap_unit,
            from_start_unit: scale.units_of(self.anchor.left_px),
            from_end_unit: scale.units_of(self.anchor.left_px + self.anchor.width_px),
        }
    }
}

/// Single-drag controller; at most one bar can be in flight.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn mode(&self) -> Option<DragMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    /// Start a session. Ignored (returns `false`) without a scale or while
    /// another drag is in progress.
    pub fn begin(
        &mut self,
        pointer_id: u64,
        mode: DragMode,
        anchor: DragAnchor,
        ctx: Option<DragContext>,
    ) -> bool {
        let Some(ctx) = ctx else {
            tracing::debug!("drag ignored: no active scale");
            return false;
        };
        if self.session.is_some() || ctx.scale.px_per_unit <= 0.0 {
            return false;
        }

        let pointer = Pos2::new(anchor.pointer_x, 0.0);
        let mut session = DragSession {
            pointer_id,
            mode,
            left: anchor.left_px,
            width: anchor.width_px,
            anchor,
            ctx,
            tooltip: TooltipOverlay {
                text: String::new(),
                pointer,
            },
        };
        session.tooltip.text = session.range_text();
        tracing::debug!("drag start: {:?} on '{}'", mode, session.anchor.task_id);
        self.session = Some(session);
        true
    }

    /// Track the pointer; events from other pointers are ignored.
    pub fn update(&mut self, pointer_id: u64, pointer: Pos2) -> Option<DragPreview> {
        let session = self.session.as_mut().filter(|s| s.pointer_id == pointer_id)?;
        session.apply(pointer);
        tracing::trace!("drag update: left={:.1} width={:.1}", session.left, session.width);
        self.preview()
    }

    /// Finish the gesture. Always finalizes; the tooltip goes with the session.
    pub fn end(&mut self, pointer_id: u64) -> Option<TaskChange> {
        if self.session.as_ref()?.pointer_id != pointer_id {
            return None;
        }
        let session = self.session.take()?;
        let change = session.change();
        tracing::debug!(
            "drag end: '{}' start={:.4} duration={:.4}",
            change.task_id,
            change.start_unit,
            change.duration_units
        );
        Some(change)
    }

    /// Drop the session without producing a change.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.session.take().is_some();
        if cancelled {
            tracing::debug!("drag cancelled");
        }
        cancelled
    }

    pub fn preview(&self) -> Option<DragPreview> {
        self.session.as_ref().map(|s| DragPreview {
            task_id: s.anchor.task_id.clone(),
            mode: s.mode,
            left_px: s.left,
            width_px: s.width,
        })
    }

    pub fn tooltip(&self) -> Option<&TooltipOverlay> {
        self.session.as_ref().map(|s| &s.tooltip)
    }
}

/// Round a pixel delta to a whole number of snap units.
///
/// Halfway cases round away from zero. Re-snapping a snapped value returns it
/// unchanged.
pub fn snap_px(dx: f64, px_per_unit: f64, snap_unit: f64) -> f64 {
    if px_per_unit <= 0.0 || snap_unit <= 0.0 || !dx.is_finite() {
        return dx;
    }
    let steps = (dx / px_per_unit / snap_unit).round();
    steps * snap_unit * px_per_unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Preset, ViewMode};
    use chrono::NaiveDate;

    const QUARTER_HOUR: f64 = 0.25;

    fn hour_ctx(snap_unit: f64) -> DragContext {
        let window = ViewWindow::new(
            ViewMode::Hour,
            Preset::Hours24,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        );
        // 1200px / 24h = 50px per hour
        DragContext {
            scale: Scale::compute(&window, 1200.0),
            window,
            snap_unit,
        }
    }

    fn anchor(left_px: f64, width_px: f64, pointer_x: f32) -> DragAnchor {
        DragAnchor {
            task_id: "t1".into(),
            left_px,
            width_px,
            pointer_x,
        }
    }

    #[test]
    fn edge_zones_pick_resize() {
        assert_eq!(DragMode::from_offset(3.0, 100.0, 8.0), DragMode::ResizeLeft);
        assert_eq!(DragMode::from_offset(95.0, 100.0, 8.0), DragMode::ResizeRight);
        assert_eq!(DragMode::from_offset(50.0, 100.0, 8.0), DragMode::Move);
        assert_eq!(DragMode::from_offset(6.0, 100.0, 4.0), DragMode::Move);
        assert_eq!(DragMode::from_offset(94.0, 100.0, 4.0), DragMode::Move);
    }

    #[test]
    fn no_scale_means_no_drag() {
        let mut drag = DragController::new();
        assert!(!drag.begin(1, DragMode::Move, anchor(0.0, 50.0, 10.0), None));
        assert!(!drag.is_dragging());
        assert!(drag.update(1, Pos2::new(40.0, 0.0)).is_none());
        assert!(drag.end(1).is_none());
    }

    #[test]
    fn move_snaps_delta() {
        let mut drag = DragController::new();
        // Task 09:00-10:00 -> left 450, width 50
        assert!(drag.begin(1, DragMode::Move, anchor(450.0, 50.0, 470.0), Some(hour_ctx(QUARTER_HOUR))));
        // 20px = 24 minutes -> nearest quarter is 30 minutes = 25px
        let preview = drag.update(1, Pos2::new(490.0, 0.0)).unwrap();
        assert_eq!(preview.left_px, 475.0);
        assert_eq!(preview.width_px, 50.0);
        assert_eq!(drag.tooltip().unwrap().text, "05/03 09:30 → 05/03 10:30");

        let change = drag.end(1).unwrap();
        assert_eq!(change.start_unit, 9.5);
        assert_eq!(change.duration_units, 1.0);
        assert_eq!(change.mode, DragMode::Move);
        assert_eq!(change.start_delta(), 0.5);
        assert!(!drag.is_dragging());
        assert!(drag.tooltip().is_none());
    }

    #[test]
    fn resize_left_keeps_right_edge() {
        let mut drag = DragController::new();
        drag.begin(1, DragMode::ResizeLeft, anchor(450.0, 50.0, 452.0), Some(hour_ctx(QUARTER_HOUR)));
        let preview = drag.update(1, Pos2::new(427.0, 0.0)).unwrap();
        assert_eq!(preview.left_px, 425.0);
        assert_eq!(preview.left_px + preview.width_px, 500.0);
    }

    #[test]
    fn resize_right_keeps_left_edge_and_min_width() {
        let mut drag = DragController::new();
        drag.begin(1, DragMode::ResizeRight, anchor(450.0, 50.0, 498.0), Some(hour_ctx(QUARTER_HOUR)));
        let preview = drag.update(1, Pos2::new(300.0, 0.0)).unwrap();
        assert_eq!(preview.left_px, 450.0);
        assert_eq!(preview.width_px, MIN_DRAG_WIDTH_PX);
    }

    #[test]
    fn resize_left_min_width_pins_right_edge() {
        let mut drag = DragController::new();
        drag.begin(1, DragMode::ResizeLeft, anchor(450.0, 50.0, 452.0), Some(hour_ctx(QUARTER_HOUR)));
        let preview = drag.update(1, Pos2::new(700.0, 0.0)).unwrap();
        assert_eq!(preview.width_px, MIN_DRAG_WIDTH_PX);
        assert_eq!(preview.left_px + preview.width_px, 500.0);
    }

    #[test]
    fn second_begin_is_rejected() {
        let mut drag = DragController::new();
        assert!(drag.begin(1, DragMode::Move, anchor(0.0, 50.0, 10.0), Some(hour_ctx(QUARTER_HOUR))));
        assert!(!drag.begin(2, DragMode::Move, anchor(100.0, 50.0, 110.0), Some(hour_ctx(QUARTER_HOUR))));
        assert!(drag.update(2, Pos2::new(300.0, 0.0)).is_none());
        assert!(drag.end(2).is_none());
        assert!(drag.is_dragging());
    }

    #[test]
    fn cancel_discards_session() {
        let mut drag = DragController::new();
        drag.begin(1, DragMode::Move, anchor(0.0, 50.0, 10.0), Some(hour_ctx(QUARTER_HOUR)));
        drag.update(1, Pos2::new(80.0, 0.0));
        assert!(drag.cancel());
        assert!(drag.tooltip().is_none());
        assert!(drag.end(1).is_none());
    }

    #[test]
    fn pointer_up_without_motion_is_noop_change() {
        let mut drag = DragController::new();
        drag.begin(1, DragMode::Move, anchor(100.0, 50.0, 110.0), Some(hour_ctx(QUARTER_HOUR)));
        assert!(drag.end(1).unwrap().is_noop());
    }

    #[test]
    fn snap_rounds_half_away_from_zero() {
        // 50 px per hour, quarter-hour steps of 12.5px
        assert_eq!(snap_px(6.25, 50.0, QUARTER_HOUR), 12.5);
        assert_eq!(snap_px(-6.25, 50.0, QUARTER_HOUR), -12.5);
        assert_eq!(snap_px(6.0, 50.0, QUARTER_HOUR), 0.0);
        assert_eq!(snap_px(7.0, 0.0, QUARTER_HOUR), 7.0);
    }
}
