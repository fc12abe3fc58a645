use egui::Vec2;

use crate::model::ViewMode;

/// Follows the bar pane's scrollbar, the only real one.
///
/// The ruler never scrolls; it is translated by the negative horizontal
/// offset. The resource name column mirrors the vertical offset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollSync {
    offset: Vec2,
    ruler_translate_x: f32,
    name_column_offset_y: f32,
}

impl ScrollSync {
    /// Record a scroll of the bar pane. Returns `true` if anything moved.
    pub fn on_scroll(&mut self, mode: ViewMode, offset: Vec2) -> bool {
        let translate_x = match mode {
            // Week content is exactly viewport-wide.
            ViewMode::Week => 0.0,
            ViewMode::Hour | ViewMode::Month => -offset.x,
        };
        let changed = self.offset != offset || self.ruler_translate_x != translate_x;
        self.offset = offset;
        self.ruler_translate_x = translate_x;
        self.name_column_offset_y = offset.y;
        changed
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn ruler_translation(&self) -> Vec2 {
        Vec2::new(self.ruler_translate_x, 0.0)
    }

    pub fn name_column_offset(&self) -> f32 {
        self.name_column_offset_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ruler_follows_horizontal_scroll() {
        let mut sync = ScrollSync::default();
        assert!(sync.on_scroll(ViewMode::Month, Vec2::new(320.0, 48.0)));
        assert_eq!(sync.ruler_translation(), Vec2::new(-320.0, 0.0));
        assert_eq!(sync.name_column_offset(), 48.0);
        assert!(!sync.on_scroll(ViewMode::Month, Vec2::new(320.0, 48.0)));
    }

    #[test]
    fn week_view_is_exempt() {
        let mut sync = ScrollSync::default();
        sync.on_scroll(ViewMode::Week, Vec2::new(15.0, 90.0));
        assert_eq!(sync.ruler_translation(), Vec2::ZERO);
        assert_eq!(sync.name_column_offset(), 90.0);
    }
}
