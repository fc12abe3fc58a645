use egui::{Align2, Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::layout::{FrameLayout, StyleConfig};
use crate::model::Resource;
use crate::model::task::palette_color;
use crate::ui::theme;

/// Paint the resource name column. It has no scrollbar of its own: rows are
/// shifted by the bar pane's vertical offset so they stay level with the bars.
pub fn show_resource_names(
    painter: &Painter,
    rect: Rect,
    frame: &FrameLayout,
    style: &StyleConfig,
    palette: &[Color32],
    offset_y: f32,
) {
    painter.rect_filled(rect, 0.0, theme::BG_PANEL);
    let top = rect.top() - offset_y;

    for (i, row) in frame.rows.iter().enumerate() {
        let row_rect = Rect::from_min_size(
            Pos2::new(rect.left(), top + row.top),
            Vec2::new(rect.width(), row.height),
        );
        if !row_rect.intersects(rect) {
            continue;
        }
        if i % 2 == 1 {
            painter.rect_filled(row_rect, 0.0, theme::BG_ROW_ODD);
        }

        let color = marker_color(&row.resource, palette);
        // Level with the first lane
        let dot = Pos2::new(
            row_rect.left() + 12.0,
            row_rect.top() + style.row_padding + style.bar_height / 2.0,
        );
        painter.circle_filled(dot, 3.5, color);

        let name = painter.layout_no_wrap(row.resource.name.clone(), theme::font_bar(), theme::TEXT_PRIMARY);
        let text_pos = Pos2::new(dot.x + 10.0, dot.y - name.size().y / 2.0);
        painter
            .with_clip_rect(row_rect.intersect(rect).shrink2(Vec2::new(4.0, 0.0)))
            .galley(text_pos, name, theme::TEXT_PRIMARY);

        if row.lane_count > 1 {
            painter.text(
                Pos2::new(row_rect.right() - 8.0, dot.y),
                Align2::RIGHT_CENTER,
                format!("×{}", row.lane_count),
                theme::font_sub(),
                theme::TEXT_DIM,
            );
        }

        painter.line_segment(
            [row_rect.left_bottom(), row_rect.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }

    painter.line_segment(
        [rect.right_top(), rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}


/// Same color an uncolored task of this resource gets.
fn marker_color(resource: &Resource, palette: &[Color32]) -> Color32 {
    palette_color(&resource.id, palette)
}
