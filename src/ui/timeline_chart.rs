use egui::{Align2, CursorIcon, Painter, Pos2, Rect, Rounding, Sense, Stroke, Ui, UiBuilder, Vec2};

use crate::layout::{DragMode, FrameLayout, LabelAlign, TickKind, ViewWindow};
use crate::model::ViewMode;
use crate::timeline::Timeline;
use crate::ui::{resource_panel, theme};

/// Mouse input has no pointer id of its own.
const MOUSE_POINTER: u64 = 0;

/// What happened in the chart this frame.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// Escape dropped an in-flight drag.
    pub cancelled: bool,
    pub dragging: bool,
}

/// Render the timeline: fixed ruler on top, resource names on the left and the
/// scrollable bar pane.
pub fn show_timeline(timeline: &mut Timeline, ui: &mut Ui) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let style = *timeline.style();
    let full = ui.available_rect_before_wrap();
    let split_x = full.left() + style.name_column_width;
    let split_y = full.top() + style.header_height;

    let corner_rect = Rect::from_min_max(full.min, Pos2::new(split_x, split_y));
    let ruler_rect = Rect::from_min_max(Pos2::new(split_x, full.top()), Pos2::new(full.right(), split_y));
    let names_rect = Rect::from_min_max(Pos2::new(full.left(), split_y), Pos2::new(split_x, full.bottom()));
    let pane_rect = Rect::from_min_max(Pos2::new(split_x, split_y), full.max);

    if ui.input(|i| i.key_pressed(egui::Key::Escape)) && timeline.cancel_drag() {
        interaction.cancelled = true;
    }

    timeline.resize(pane_rect.width());
    let content_size = timeline.frame().content_size;

    let pane = ui.allocate_new_ui(UiBuilder::new().max_rect(pane_rect), |ui| {
        egui::ScrollArea::both()
            .id_salt("timeline-pane")
            .auto_shrink([false, false])
            .drag_to_scroll(false)
            .show(ui, |ui| {
                let size = content_size.max(ui.available_size());
                let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
                (response, painter)
            })
    });
    let output = pane.inner;
    let (response, painter) = output.inner;
    timeline.sync_viewport(output.inner_rect, output.state.offset);

    handle_pointer(timeline, ui, response.contains_pointer());
    interaction.dragging = timeline.is_dragging();

    let Some(frame) = timeline.current_frame() else {
        return interaction;
    };
    let origin = response.rect.min;

    draw_rows(&painter, origin, frame, response.rect.width());
    draw_bars(&painter, origin, frame, timeline, style.min_bar_width);
    draw_ruler(&ui.painter_at(ruler_rect), ruler_rect, frame, timeline.scroll().ruler_translation());
    draw_corner(&ui.painter_at(corner_rect), corner_rect, &frame.window);
    resource_panel::show_resource_names(
        &ui.painter_at(names_rect),
        names_rect,
        frame,
        &style,
        timeline.palette(),
        timeline.scroll().name_column_offset(),
    );

    set_cursor(timeline, ui);
    if let Some(tip) = timeline.tooltip() {
        egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), egui::Id::new("timeline-drag-tip"), |ui| {
            ui.label(&tip.text);
        });
    }

    interaction
}

fn handle_pointer(timeline: &mut Timeline, ui: &Ui, pane_hovered: bool) {
    let (pressed, released, origin, latest) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.press_origin(),
            i.pointer.latest_pos(),
        )
    });

    if pressed && pane_hovered {
        if let Some(pos) = origin {
            timeline.pointer_down(MOUSE_POINTER, pos);
        }
    }
    if timeline.is_dragging() {
        if let Some(pos) = latest {
            timeline.pointer_move(MOUSE_POINTER, pos);
        }
    }
    if released {
        timeline.pointer_up(MOUSE_POINTER);
    }
}

fn set_cursor(timeline: &Timeline, ui: &Ui) {
    let mode = match timeline.drag_mode() {
        Some(mode) => Some(mode),
        None => ui
            .input(|i| i.pointer.hover_pos())
            .and_then(|pos| timeline.hovered(pos).map(|(_, mode)| mode)),
    };
    let icon = match (mode, timeline.is_dragging()) {
        (Some(DragMode::ResizeLeft | DragMode::ResizeRight), _) => CursorIcon::ResizeHorizontal,
        (Some(DragMode::Move), true) => CursorIcon::Grabbing,
        (Some(DragMode::Move), false) => CursorIcon::Grab,
        (None, _) => return,
    };
    ui.ctx().set_cursor_icon(icon);
}

fn draw_rows(painter: &Painter, origin: Pos2, frame: &FrameLayout, width: f32) {
    let height = frame.content_size.y.max(painter.clip_rect().bottom() - origin.y);
    painter.rect_filled(Rect::from_min_size(origin, Vec2::new(width, height)), 0.0, theme::BG_DARK);

    for (i, row) in frame.rows.iter().enumerate() {
        let top = origin.y + row.top;
        if i % 2 == 1 {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(origin.x, top), Vec2::new(width, row.height)),
                0.0,
                theme::BG_ROW_ODD,
            );
        }
        painter.line_segment(
            [
                Pos2::new(origin.x, top + row.height),
                Pos2::new(origin.x + width, top + row.height),
            ],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }

    // Same band and gridline pixels as the ruler.
    for band in &frame.ruler.bands {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(origin.x + band.left, origin.y), Vec2::new(band.width, height)),
            0.0,
            theme::BAND_FILL,
        );
    }
    for line in &frame.ruler.gridlines {
        let color = match line.kind {
            TickKind::Major => theme::TICK_MINOR,
            TickKind::Minor => theme::TICK_FINE,
            TickKind::Fine => continue,
        };
        let x = origin.x + line.x;
        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, color),
        );
    }
}

fn draw_bars(painter: &Painter, origin: Pos2, frame: &FrameLayout, timeline: &Timeline, min_width: f32) {
    let preview = timeline.drag_preview();
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    for bar in frame.bars() {
        let mut rect = bar.rect;
        let dragged = preview.as_ref().filter(|p| p.task_id == bar.task_id);
        if let Some(p) = dragged {
            let left = p.left_px.floor() as f32;
            let right = ((p.left_px + p.width_px).floor() as f32).max(left + min_width);
            rect = Rect::from_min_max(Pos2::new(left, rect.top()), Pos2::new(right, rect.bottom()));
        }
        let rect = rect.translate(origin.to_vec2());
        if !painter.clip_rect().intersects(rect) {
            continue;
        }

        painter.rect_filled(rect.translate(Vec2::new(1.0, 2.0)), rounding, egui::Color32::from_black_alpha(35));
        painter.rect_filled(rect, rounding, bar.color);
        if dragged.is_some() {
            painter.rect_stroke(rect.expand(1.5), rounding, Stroke::new(2.0, theme::BORDER_ACCENT));
        }

        if rect.width() > 30.0 {
            let galley = painter.layout_no_wrap(bar.title.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
            let text_pos = Pos2::new(rect.left() + 6.0, rect.center().y - galley.size().y / 2.0);
            painter
                .with_clip_rect(rect.intersect(painter.clip_rect()))
                .galley(text_pos, galley, theme::TEXT_ON_BAR);
        }
    }
}

fn draw_ruler(painter: &Painter, rect: Rect, frame: &FrameLayout, translation: Vec2) {
    painter.rect_filled(rect, 0.0, theme::BG_HEADER);
    let left = rect.left() + translation.x;

    for band in &frame.ruler.bands {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(left + band.left, rect.top()), Vec2::new(band.width, rect.height())),
            0.0,
            theme::BAND_FILL,
        );
    }

    for line in &frame.ruler.gridlines {
        let (height, color) = match line.kind {
            TickKind::Major => (rect.height() * 0.5, theme::TICK_MAJOR),
            TickKind::Minor => (rect.height() * 0.3, theme::TICK_MINOR),
            TickKind::Fine => (rect.height() * 0.15, theme::TICK_FINE),
        };
        let x = left + line.x;
        painter.line_segment(
            [Pos2::new(x, rect.bottom() - height), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, color),
        );
    }

    let label_y = rect.top() + rect.height() * 0.3;
    for label in &frame.ruler.labels {
        let (anchor, dx) = match label.align {
            LabelAlign::Left => (Align2::LEFT_CENTER, 3.0),
            LabelAlign::Center => (Align2::CENTER_CENTER, 0.0),
            LabelAlign::Right => (Align2::RIGHT_CENTER, -3.0),
        };
        painter.text(
            Pos2::new(left + label.x + dx, label_y),
            anchor,
            &label.text,
            theme::font_sub(),
            theme::TEXT_SECONDARY,
        );
    }

    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_corner(painter: &Painter, rect: Rect, window: &ViewWindow) {
    painter.rect_filled(rect, 0.0, theme::BG_HEADER);
    painter.text(
        rect.left_center() + Vec2::new(10.0, 0.0),
        Align2::LEFT_CENTER,
        window_caption(window),
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );
    painter.line_segment(
        [rect.right_top(), rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn window_caption(window: &ViewWindow) -> String {
    match window.mode {
        ViewMode::Hour => window.start.format("%a %d %b %Y").to_string(),
        ViewMode::Week => {
            let last = window.day(window.day_count().saturating_sub(1));
            format!("{} - {}", window.start.format("%d %b"), last.format("%d %b %Y"))
        }
        ViewMode::Month => window.start.format("%B %Y").to_string(),
    }
}
