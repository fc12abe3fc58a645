/// Row and bar dimensions, passed explicitly to layout and rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleConfig {
    /// Space above the first lane and below the last one.
    pub row_padding: f32,
    pub bar_height: f32,
    pub header_height: f32,
    pub name_column_width: f32,
    /// Grab zone at each bar edge that starts a resize instead of a move.
    pub edge_grab_px: f32,
    /// Bars are never rendered narrower than this.
    pub min_bar_width: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            row_padding: 4.0,
            bar_height: 22.0,
            header_height: 44.0,
            name_column_width: 180.0,
            edge_grab_px: 8.0,
            min_bar_width: 4.0,
        }
    }
}

impl StyleConfig {
    pub fn lane_y(&self, lane: usize, lane_offset: f32) -> f32 {
        self.row_padding + lane as f32 * (self.bar_height + lane_offset)
    }

    pub fn row_height(&self, lane_count: usize, lane_offset: f32) -> f32 {
        let lanes = lane_count.max(1) as f32;
        2.0 * self.row_padding + lanes * self.bar_height + (lanes - 1.0) * lane_offset
    }
}
