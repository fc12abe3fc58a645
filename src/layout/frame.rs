//! Pure derivation of a complete frame layout from the current inputs.

use std::collections::HashMap;

use egui::{Color32, Pos2, Rect, Vec2};

use super::lanes::{assign_lanes, LaneAssignment, ProjectedTask};
use super::projection::{Segment, ViewWindow};
use super::ruler::{build_ruler, Ruler};
use super::scale::Scale;
use super::style::StyleConfig;
use crate::model::{Resource, Task, ViewState};

/// A positioned bar, in content coordinates (pane top-left is the origin).
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub task_id: String,
    pub title: String,
    pub color: Color32,
    pub lane: usize,
    pub segment: Segment,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub resource: Resource,
    pub top: f32,
    pub height: f32,
    pub lane_count: usize,
    pub bars: Vec<BarLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub window: ViewWindow,
    pub scale: Scale,
    pub rows: Vec<RowLayout>,
    pub ruler: Ruler,
    pub content_size: Vec2,
    /// Tasks whose resource is unknown; left out of the layout.
    pub orphaned: usize,
}

impl FrameLayout {
    pub fn bars(&self) -> impl Iterator<Item = &BarLayout> {
        self.rows.iter().flat_map(|r| r.bars.iter())
    }

    pub fn bar(&self, task_id: &str) -> Option<&BarLayout> {
        self.bars().find(|b| b.task_id == task_id)
    }

    pub fn bar_rects(&self) -> impl Iterator<Item = (&str, Rect)> {
        self.bars().map(|b| (b.task_id.as_str(), b.rect))
    }
}

pub fn derive_scale(view: &ViewState, viewport_width: f32) -> (ViewWindow, Scale) {
    let window = ViewWindow::new(view.mode, view.preset, view.anchor);
    let scale = Scale::compute(&window, viewport_width);
    (window, scale)
}

/// Project every task into its resource's row. Returns the rows (in resource
/// order) and the number of tasks whose resource does not exist.
pub fn derive_segments<'a>(
    resources: &[Resource],
    tasks: &'a [Task],
    window: &ViewWindow,
) -> (Vec<Vec<ProjectedTask<'a>>>, usize) {
    let mut row_of: HashMap<&str, usize> = HashMap::with_capacity(resources.len());
    for (i, r) in resources.iter().enumerate() {
        row_of.entry(r.id.as_str()).or_insert(i);
    }

    let mut rows: Vec<Vec<ProjectedTask<'a>>> = vec![Vec::new(); resources.len()];
    let mut orphaned = 0;
    for task in tasks {
        let Some(&row) = row_of.get(task.resource_id.as_str()) else {
            orphaned += 1;
            continue;
        };
        if let Some(segment) = window.project(task) {
            rows[row].push(ProjectedTask { task, segment });
        }
    }
    (rows, orphaned)
}

pub fn derive_lanes(rows: Vec<Vec<ProjectedTask<'_>>>, max_lanes: usize) -> Vec<LaneAssignment<'_>> {
    rows.into_iter().map(|items| assign_lanes(items, max_lanes)).collect()
}

pub fn derive_frame(
    resources: &[Resource],
    tasks: &[Task],
    view: &ViewState,
    style: &StyleConfig,
    viewport_width: f32,
) -> FrameLayout {
    let (window, scale) = derive_scale(view, viewport_width);
    let (segments, orphaned) = derive_segments(resources, tasks, &window);
    let lanes = derive_lanes(segments, view.max_lanes);
    let lane_offset = view.lane_offset.px();

    let right_limit = scale.x_of(scale.total_units);
    let mut top = 0.0;
    let mut rows = Vec::with_capacity(resources.len());
    for (resource, assignment) in resources.iter().zip(lanes) {
        let height = style.row_height(assignment.lane_count, lane_offset);
        let bars = assignment
            .placed
            .into_iter()
            .map(|placed| {
                let (mut left, width) = scale.span_px(placed.segment.start_unit, placed.segment.end_unit);
                let width = width.max(style.min_bar_width);
                // Widened bars stay inside the window, like their segments.
                if left + width > right_limit {
                    left = (right_limit - width).max(0.0);
                }
                let y = top + style.lane_y(placed.lane, lane_offset);
                BarLayout {
                    task_id: placed.task.id.clone(),
                    title: placed.task.title.clone(),
                    color: placed.task.color,
                    lane: placed.lane,
                    segment: placed.segment,
                    rect: Rect::from_min_size(
                        Pos2::new(left, y),
                        Vec2::new(width, style.bar_height),
                    ),
                }
            })
            .collect();

        rows.push(RowLayout {
            resource: resource.clone(),
            top,
            height,
            lane_count: assignment.lane_count,
            bars,
        });
        top += height;
    }

    if orphaned > 0 {
        tracing::debug!("{} task(s) reference unknown resources and were skipped", orphaned);
    }

    let ruler = build_ruler(&window, &scale);
    FrameLayout {
        window,
        scale,
        rows,
        ruler,
        content_size: Vec2::new(scale.content_width(), top),
        orphaned,
    }
}
