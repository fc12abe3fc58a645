//! Snapshot of rendered bar rectangles for pointer hit-testing.
//!
//! Bars in neighbouring lanes can overlap (lane offsets are small and the
//! overflow lane stacks bars on top of each other), so "topmost shape wins"
//! is not good enough. [`GeometryIndex::pick`] returns the containing bar whose
//! vertical center is closest to the pointer.

use egui::{Pos2, Rect, Vec2};

/// A captured bar in viewport (screen) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BarHit {
    pub task_id: String,
    pub rect: Rect,
    /// Left edge in content coordinates, before scrolling.
    pub content_left: f32,
}

#[derive(Debug, Default)]
pub struct GeometryIndex {
    entries: Vec<BarHit>,
    generation: u64,
}

impl GeometryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot.
    ///
    /// `bars` are `(task_id, content_rect)` pairs; `content_origin` is where
    /// content `(0, 0)` currently sits on screen (pane origin minus scroll
    /// offset). Only bars intersecting `clip` are captured.
    pub fn rebuild<'a>(
        &mut self,
        bars: impl IntoIterator<Item = (&'a str, Rect)>,
        content_origin: Pos2,
        clip: Rect,
    ) {
        let shift = content_origin.to_vec2();
        self.entries = bars
            .into_iter()
            .filter_map(|(id, rect)| {
                let screen = rect.translate(shift);
                screen.intersects(clip).then(|| BarHit {
                    task_id: id.to_string(),
                    rect: screen,
                    content_left: rect.left(),
                })
            })
            .collect();
        self.generation += 1;
        tracing::debug!(
            "geometry index rebuilt: {} bars (generation {})",
            self.entries.len(),
            self.generation
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    /// The containing bar whose vertical center is nearest `pointer.y`.
    /// Ties go to the first bar captured.
    pub fn pick(&self, pointer: Pos2) -> Option<&BarHit> {
        let mut best: Option<(&BarHit, f32)> = None;
        for hit in self.entries.iter().filter(|h| h.rect.contains(pointer)) {
            let distance = (hit.rect.center().y - pointer.y).abs();
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((hit, distance)),
            }
        }
        best.map(|(hit, _)| hit)
    }

    /// Offset of the pointer inside a bar, along x.
    pub fn offset_in(hit: &BarHit, pointer: Pos2) -> Vec2 {
        pointer - hit.rect.min
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_min_size(Pos2::new(x, y), Vec2::new(w, h))
    }

    fn everything() -> Rect {
        Rect::EVERYTHING
    }

    #[test]
    fn picks_nearest_vertical_center() {
        let mut index = GeometryIndex::new();
        // Two overlapping lanes: centers at y=11 and y=16.
        index.rebuild(
            [("upper", rect(0.0, 0.0, 100.0, 22.0)), ("lower", rect(0.0, 5.0, 100.0, 22.0))],
            Pos2::ZERO,
            everything(),
        );
        assert_eq!(index.pick(Pos2::new(50.0, 6.0)).unwrap().task_id, "upper");
        assert_eq!(index.pick(Pos2::new(50.0, 20.0)).unwrap().task_id, "lower");
        assert!(index.pick(Pos2::new(150.0, 6.0)).is_none());
    }

    #[test]
    fn equidistant_goes_to_first() {
        let mut index = GeometryIndex::new();
        index.rebuild(
            [("a", rect(0.0, 0.0, 10.0, 10.0)), ("b", rect(0.0, 0.0, 10.0, 10.0))],
            Pos2::ZERO,
            everything(),
        );
        assert_eq!(index.pick(Pos2::new(5.0, 5.0)).unwrap().task_id, "a");
    }

    #[test]
    fn rects_follow_scroll() {
        let mut index = GeometryIndex::new();
        let bars = [("bar", rect(300.0, 40.0, 50.0, 20.0))];
        index.rebuild(bars, Pos2::new(100.0, 50.0), everything());
        assert!(index.pick(Pos2::new(410.0, 100.0)).is_some());

        // Scrolled 200px right: content origin moves left.
        index.rebuild(bars, Pos2::new(-100.0, 50.0), everything());
        assert!(index.pick(Pos2::new(410.0, 100.0)).is_none());
        let hit = index.pick(Pos2::new(210.0, 100.0)).unwrap();
        assert_eq!(hit.content_left, 300.0);
        assert_eq!(index.generation(), 2);
    }

    #[test]
    fn bars_outside_clip_are_skipped() {
        let mut index = GeometryIndex::new();
        index.rebuild(
            [("seen", rect(0.0, 0.0, 10.0, 10.0)), ("hidden", rect(500.0, 0.0, 10.0, 10.0))],
            Pos2::ZERO,
            rect(0.0, 0.0, 100.0, 100.0),
        );
        assert_eq!(index.len(), 1);
    }
}
