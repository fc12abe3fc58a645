//! The timeline widget core: owns view state and derived layout, and turns
//! pointer input into change records for the task owner.

use chrono::NaiveDate;
use egui::{Color32, Pos2, Rect, Vec2};

use crate::error::Result;
use crate::io::demo;
use crate::layout::{
    derive_frame, DragAnchor, DragContext, DragController, DragMode, DragPreview, FrameLayout,
    GeometryIndex, ScrollSync, StyleConfig, TaskChange, TooltipOverlay,
};
use crate::model::view::parse_month;
use crate::model::{LaneOffset, Preset, RawTask, Resource, Task, ViewMode, ViewState};
use crate::ui::theme;

/// Invoked once per completed drag/resize gesture with the original task and
/// the requested change.
pub type ChangeCallback = Box<dyn FnMut(&Task, &TaskChange)>;

/// Number of placeholder rows shown when no resources are supplied.
pub const PLACEHOLDER_RESOURCES: usize = 20;

/// Construction options.
#[derive(Debug, Clone)]
pub struct TimelineConfig {
    pub resources: Vec<Resource>,
    pub tasks: Vec<RawTask>,
    /// `"hour"`, `"week"` or `"month"`.
    pub initial_view: String,
    /// A preset label valid for `initial_view`; its default when `None`.
    pub initial_preset: Option<String>,
    /// `YYYY-MM`; today's date when `None`.
    pub initial_month: Option<String>,
    pub palette: Vec<Color32>,
    pub style: StyleConfig,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            tasks: Vec::new(),
            initial_view: "month".into(),
            initial_preset: None,
            initial_month: None,
            palette: theme::TASK_COLORS.to_vec(),
            style: StyleConfig::default(),
        }
    }
}

/// Everything the derived frame depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayoutKey {
    revision: u64,
    mode: ViewMode,
    preset: Preset,
    anchor: NaiveDate,
    lane_offset: LaneOffset,
    max_lanes: usize,
    width_bits: u32,
}

pub struct Timeline {
    resources: Vec<Resource>,
    tasks: Vec<Task>,
    revision: u64,
    view: ViewState,
    palette: Vec<Color32>,
    style: StyleConfig,
    viewport_width: f32,

    frame_key: Option<LayoutKey>,
    frame: Option<FrameLayout>,

    index: GeometryIndex,
    index_key: Option<(LayoutKey, [u32; 6])>,
    pane_clip: Rect,
    scroll: ScrollSync,
    drag: DragController,

    on_tasks_change: Option<ChangeCallback>,
}

impl Timeline {
    pub fn new(config: TimelineConfig) -> Result<Self> {
        let mode: ViewMode = config.initial_view.parse()?;
        let preset = match config.initial_preset.as_deref() {
            Some(label) => label.parse()?,
            None => mode.default_preset(),
        };
        let anchor = match config.initial_month.as_deref() {
            Some(month) => parse_month(month)?,
            None => chrono::Local::now().date_naive(),
        };
        let view = ViewState::new(mode, preset, anchor)?;
        let mut timeline = Self::with_view(view, config.palette, config.style);
        timeline.set_data(config.resources, &config.tasks);
        Ok(timeline)
    }

    /// An empty timeline for an already validated view.
    pub fn with_view(view: ViewState, palette: Vec<Color32>, style: StyleConfig) -> Self {
        Self {
            resources: Vec::new(),
            tasks: Vec::new(),
            revision: 0,
            view,
            palette,
            style,
            viewport_width: 0.0,
            frame_key: None,
            frame: None,
            index: GeometryIndex::new(),
            index_key: None,
            pane_clip: Rect::NOTHING,
            scroll: ScrollSync::default(),
            drag: DragController::new(),
            on_tasks_change: None,
        }
    }

    pub fn on_tasks_change(&mut self, callback: impl FnMut(&Task, &TaskChange) + 'static) {
        self.on_tasks_change = Some(Box::new(callback));
    }

    // ── Data ────────────────────────────────────────────────────

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn palette(&self) -> &[Color32] {
        &self.palette
    }

    /// Replace resources and tasks together. An empty resource list gets
    /// placeholder rows. Returns the number of task rows skipped.
    pub fn set_data(&mut self, resources: Vec<Resource>, raw: &[RawTask]) -> usize {
        self.resources = if resources.is_empty() {
            demo::placeholder_resources(PLACEHOLDER_RESOURCES)
        } else {
            resources
        };
        self.set_raw_tasks(raw)
    }

    pub fn set_resources(&mut self, resources: Vec<Resource>) {
        self.resources = resources;
        self.invalidate();
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.invalidate();
    }

    /// Normalize and replace the task list. Rows that fail to normalize are
    /// skipped; returns how many.
    pub fn set_raw_tasks(&mut self, raw: &[RawTask]) -> usize {
        let mut skipped = 0;
        let tasks = raw
            .iter()
            .filter_map(|r| match r.normalize(&self.palette) {
                Ok(task) => Some(task),
                Err(e) => {
                    tracing::warn!("skipping task: {}", e);
                    skipped += 1;
                    None
                }
            })
            .collect();
        self.set_tasks(tasks);
        skipped
    }

    fn invalidate(&mut self) {
        self.revision += 1;
        self.drag.cancel();
    }

    // ── View ────────────────────────────────────────────────────

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.view.mode != mode {
            self.drag.cancel();
            self.view.set_mode(mode);
        }
    }

    pub fn set_preset(&mut self, preset: Preset) -> Result<()> {
        self.view.set_preset(preset)?;
        self.drag.cancel();
        Ok(())
    }

    pub fn set_anchor(&mut self, anchor: NaiveDate) {
        if self.view.anchor != anchor {
            self.drag.cancel();
            self.view.anchor = anchor;
        }
    }

    pub fn step_anchor(&mut self, steps: i32) {
        self.drag.cancel();
        self.view.step_anchor(steps);
    }

    pub fn set_snap_unit(&mut self, snap_unit: f64) {
        self.view.snap_unit = snap_unit;
    }

    pub fn set_lane_offset(&mut self, lane_offset: LaneOffset) {
        self.view.lane_offset = lane_offset;
    }

    pub fn set_max_lanes(&mut self, max_lanes: usize) -> Result<()> {
        self.view.set_max_lanes(max_lanes)
    }

    /// Viewport width available to the bar pane, in pixels.
    pub fn resize(&mut self, width: f32) {
        self.viewport_width = width;
    }

    // ── Layout ──────────────────────────────────────────────────

    fn layout_key(&self) -> LayoutKey {
        LayoutKey {
            revision: self.revision,
            mode: self.view.mode,
            preset: self.view.preset,
            anchor: self.view.anchor,
            lane_offset: self.view.lane_offset,
            max_lanes: self.view.max_lanes,
            width_bits: self.viewport_width.to_bits(),
        }
    }

    /// The current frame, re-derived only when an input changed.
    pub fn frame(&mut self) -> &FrameLayout {
        let key = self.layout_key();
        if self.frame_key != Some(key) {
            self.frame = None;
            self.frame_key = Some(key);
        }
        self.frame.get_or_insert_with(|| {
            let frame = derive_frame(
                &self.resources,
                &self.tasks,
                &self.view,
                &self.style,
                self.viewport_width,
            );
            tracing::debug!(
                "layout derived: {} rows, {} bars, {:.1}px/unit",
                frame.rows.len(),
                frame.bars().count(),
                frame.scale.px_per_unit
            );
            frame
        })
    }

    /// The last derived frame, without re-deriving.
    pub fn current_frame(&self) -> Option<&FrameLayout> {
        self.frame.as_ref()
    }

    /// Tell the timeline where the bar pane is on screen and how far it is
    /// scrolled. Rebuilds the hit-test index when the layout, the pane or the
    /// scroll position changed.
    pub fn sync_viewport(&mut self, pane_clip: Rect, scroll_offset: Vec2) {
        self.frame();
        self.scroll.on_scroll(self.view.mode, scroll_offset);
        self.pane_clip = pane_clip;

        let content_origin = pane_clip.min - scroll_offset;
        let key = (
            self.layout_key(),
            [
                content_origin.x.to_bits(),
                content_origin.y.to_bits(),
                pane_clip.min.x.to_bits(),
                pane_clip.min.y.to_bits(),
                pane_clip.max.x.to_bits(),
                pane_clip.max.y.to_bits(),
            ],
        );
        if self.index_key == Some(key) {
            return;
        }
        if let Some(frame) = &self.frame {
            self.index.rebuild(frame.bar_rects(), content_origin, pane_clip);
        }
        self.index_key = Some(key);
    }

    pub fn scroll(&self) -> &ScrollSync {
        &self.scroll
    }

    pub fn index(&self) -> &GeometryIndex {
        &self.index
    }

    // ── Pointer ─────────────────────────────────────────────────

    /// Pointer pressed. Starts a drag if a bar is under the pointer.
    pub fn pointer_down(&mut self, pointer_id: u64, pos: Pos2) -> bool {
        if !self.pane_clip.contains(pos) {
            return false;
        }
        let (Some(frame), Some(hit)) = (&self.frame, self.index.pick(pos)) else {
            return false;
        };
        let Some(bar) = frame.bar(&hit.task_id) else {
            return false;
        };

        let offset = GeometryIndex::offset_in(hit, pos);
        let mode = DragMode::from_offset(offset.x, hit.rect.width(), self.style.edge_grab_px);
        let ppu = frame.scale.px_per_unit;
        let anchor = DragAnchor {
            task_id: bar.task_id.clone(),
            left_px: bar.segment.start_unit * ppu,
            width_px: (bar.segment.span() * ppu).max(self.style.min_bar_width as f64),
            pointer_x: pos.x,
        };
        let ctx = DragContext {
            scale: frame.scale,
            window: frame.window,
            snap_unit: self.view.snap_unit,
        };
        self.drag.begin(pointer_id, mode, anchor, Some(ctx))
    }

    pub fn pointer_move(&mut self, pointer_id: u64, pos: Pos2) -> Option<DragPreview> {
        self.drag.update(pointer_id, pos)
    }

    /// Pointer released: finalize the drag and notify the task owner.
    pub fn pointer_up(&mut self, pointer_id: u64) -> Option<TaskChange> {
        let change = self.drag.end(pointer_id)?;
        match (self.tasks.iter().find(|t| t.id == change.task_id), self.on_tasks_change.as_mut()) {
            (Some(task), Some(callback)) => callback(task, &change),
            (None, _) => tracing::debug!("dropped change for vanished task '{}'", change.task_id),
            (Some(_), None) => {}
        }
        Some(change)
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.mode()
    }

    pub fn drag_preview(&self) -> Option<DragPreview> {
        self.drag.preview()
    }

    pub fn tooltip(&self) -> Option<&TooltipOverlay> {
        self.drag.tooltip()
    }

    /// Bar under the pointer, for hover affordances.
    pub fn hovered(&self, pos: Pos2) -> Option<(&str, DragMode)> {
        if !self.pane_clip.contains(pos) {
            return None;
        }
        self.index.pick(pos).map(|hit| {
            let offset = GeometryIndex::offset_in(hit, pos);
            let mode = DragMode::from_offset(offset.x, hit.rect.width(), self.style.edge_grab_px);
            (hit.task_id.as_str(), mode)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawTimestamp;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn raw(id: &str, resource: &str, start: &str, end: &str) -> RawTask {
        RawTask {
            id: id.into(),
            resource_id: resource.into(),
            start: RawTimestamp::Text(start.into()),
            end: RawTimestamp::Text(end.into()),
            title: id.into(),
            color: None,
        }
    }

    fn hour_timeline() -> Timeline {
        let config = TimelineConfig {
            resources: vec![Resource::new("r1", "Crane"), Resource::new("r2", "Truck")],
            tasks: vec![
                raw("lift", "r1", "2024-03-01 09:00", "2024-03-01 10:00"),
                raw("haul", "r2", "2024-03-01 12:00", "2024-03-01 16:00"),
                raw("bad", "r2", "2024-03-01 16:00", "2024-03-01 12:00"),
            ],
            initial_view: "hour".into(),
            initial_preset: Some("24 Hours".into()),
            initial_month: Some("2024-03".into()),
            ..Default::default()
        };
        let mut timeline = Timeline::new(config).unwrap();
        timeline.resize(1200.0);
        timeline.sync_viewport(
            Rect::from_min_size(Pos2::new(200.0, 50.0), Vec2::new(1200.0, 600.0)),
            Vec2::ZERO,
        );
        timeline
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let timeline = hour_timeline();
        assert_eq!(timeline.tasks().len(), 2);
    }

    #[test]
    fn config_errors_surface() {
        let config = TimelineConfig {
            initial_view: "week".into(),
            initial_preset: Some("14 Days".into()),
            ..Default::default()
        };
        assert!(Timeline::new(config).is_err());

        let config = TimelineConfig {
            initial_month: Some("March".into()),
            ..Default::default()
        };
        assert!(Timeline::new(config).is_err());
    }

    #[test]
    fn empty_resources_get_placeholders() {
        let timeline = Timeline::new(TimelineConfig {
            initial_month: Some("2024-03".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(timeline.resources().len(), PLACEHOLDER_RESOURCES);
    }

    #[test]
    fn frame_is_cached_until_inputs_change() {
        let mut timeline = hour_timeline();
        let first = timeline.frame().clone();
        assert_eq!(timeline.frame(), &first);

        timeline.set_lane_offset(LaneOffset::Loose);
        timeline.set_snap_unit(1.0 / 60.0);
        assert_eq!(timeline.frame().bars().count(), first.bars().count());

        timeline.set_mode(ViewMode::Month);
        assert_eq!(timeline.frame().window.mode, ViewMode::Month);
    }

    #[test]
    fn frame_key_tracks_each_input() {
        let mut timeline = hour_timeline();
        let before = timeline.layout_key();
        assert_eq!(timeline.frame_key, Some(before));

        timeline.resize(1440.0);
        assert_ne!(timeline.layout_key(), before);
        assert_eq!(timeline.frame().scale.content_px, 1440.0);
        assert_eq!(timeline.frame_key, Some(timeline.layout_key()));

        timeline.set_max_lanes(5).unwrap();
        let key = timeline.layout_key();
        assert_ne!(timeline.frame_key, Some(key));
        timeline.frame();
        assert_eq!(timeline.frame_key, Some(key));
    }

    #[test]
    fn edge_zone_comes_from_style() {
        let mut timeline = hour_timeline();
        timeline.style.edge_grab_px = 2.0;
        assert!(timeline.pointer_down(1, Pos2::new(200.0 + 455.0, 60.0)));
        assert_eq!(timeline.drag_mode(), Some(DragMode::Move));
        timeline.cancel_drag();
        assert!(timeline.pointer_down(1, Pos2::new(200.0 + 451.0, 60.0)));
        assert_eq!(timeline.drag_mode(), Some(DragMode::ResizeLeft));
    }

    #[test]
    fn drag_emits_change_through_callback() {
        let mut timeline = hour_timeline();
        let seen: Rc<RefCell<Vec<(String, TaskChange)>>> = Rc::default();
        let sink = seen.clone();
        timeline.on_tasks_change(move |task, change| {
            sink.borrow_mut().push((task.title.clone(), change.clone()));
        });

        // "lift" 09:00-10:00 at 50px/h -> content x 450..500, row 0 bar at y 4..26
        let grab = Pos2::new(200.0 + 475.0, 50.0 + 15.0);
        assert!(timeline.pointer_down(7, grab));
        assert_eq!(timeline.drag_mode(), Some(DragMode::Move));
        timeline.pointer_move(7, grab + Vec2::new(50.0, 0.0));
        assert!(timeline.tooltip().is_some());

        let change = timeline.pointer_up(7).unwrap();
        assert_eq!(change.start_unit, 10.0);
        assert_eq!(change.duration_units, 1.0);
        assert!(timeline.tooltip().is_none());

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "lift");
        // The timeline does not apply the change itself.
        assert_eq!(timeline.task("lift").unwrap().start.format("%H:%M").to_string(), "09:00");
    }

    #[test]
    fn edge_grab_resizes() {
        let mut timeline = hour_timeline();
        assert!(timeline.pointer_down(1, Pos2::new(200.0 + 452.0, 60.0)));
        assert_eq!(timeline.drag_mode(), Some(DragMode::ResizeLeft));
        timeline.cancel_drag();
        assert!(timeline.pointer_down(1, Pos2::new(200.0 + 497.0, 60.0)));
        assert_eq!(timeline.drag_mode(), Some(DragMode::ResizeRight));
    }

    #[test]
    fn pointer_outside_bars_does_nothing() {
        let mut timeline = hour_timeline();
        assert!(!timeline.pointer_down(1, Pos2::new(200.0 + 100.0, 60.0)));
        assert!(!timeline.pointer_down(1, Pos2::new(10.0, 60.0)));
        assert!(timeline.pointer_up(1).is_none());
    }

    #[test]
    fn scroll_moves_hit_targets() {
        let mut timeline = hour_timeline();
        let pane = Rect::from_min_size(Pos2::new(200.0, 50.0), Vec2::new(1200.0, 600.0));
        timeline.sync_viewport(pane, Vec2::new(400.0, 0.0));
        assert_eq!(timeline.scroll().ruler_translation(), Vec2::new(-400.0, 0.0));
        assert!(timeline.hovered(Pos2::new(200.0 + 75.0, 65.0)).is_some());
        assert!(timeline.hovered(Pos2::new(200.0 + 475.0, 65.0)).is_none());
    }
}
