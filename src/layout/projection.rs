//! Mapping wall-clock intervals onto a view's scalar unit axis.
//!
//! Hour view measures hours from midnight of the anchor day. Week and month
//! views measure fractional days from the first day of the window. Tasks are
//! intersected with the window, never tested for containment, so overnight
//! and multi-day tasks show up clipped at the window edges.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::model::{Preset, Task, ViewMode};

const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Minimum rendered span in hour view: 5 minutes.
pub const MIN_SPAN_HOURS: f64 = 1.0 / 12.0;
/// Minimum rendered span in week/month view: 30 minutes.
pub const MIN_SPAN_DAYS: f64 = 1.0 / 48.0;

/// A task interval in view-units, clipped to the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start_unit: f64,
    pub end_unit: f64,
    pub label: String,
}

impl Segment {
    pub fn span(&self) -> f64 {
        self.end_unit - self.start_unit
    }
}

/// The concrete calendar window a view shows, plus its unit system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewWindow {
    pub mode: ViewMode,
    pub preset: Preset,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ViewWindow {
    pub fn new(mode: ViewMode, preset: Preset, anchor: NaiveDate) -> Self {
        let (first, days) = match mode {
            ViewMode::Hour => (anchor, 1),
            ViewMode::Week => match preset {
                Preset::WorkWeek => {
                    let back = anchor.weekday().num_days_from_monday() as i64;
                    (anchor - Duration::days(back), 5)
                }
                _ => {
                    let back = anchor.weekday().num_days_from_sunday() as i64;
                    (anchor - Duration::days(back), 7)
                }
            },
            ViewMode::Month => {
                let first = anchor.with_day(1).unwrap_or(anchor);
                (first, days_in_month(first) as i64)
            }
        };
        let start = first.and_time(chrono::NaiveTime::MIN);
        Self {
            mode,
            preset,
            start,
            end: start + Duration::days(days),
        }
    }

    /// Length of one view-unit in milliseconds.
    pub fn unit_ms(&self) -> f64 {
        match self.mode {
            ViewMode::Hour => MS_PER_HOUR,
            ViewMode::Week | ViewMode::Month => MS_PER_DAY,
        }
    }

    pub fn min_span_units(&self) -> f64 {
        match self.mode {
            ViewMode::Hour => MIN_SPAN_HOURS,
            ViewMode::Week | ViewMode::Month => MIN_SPAN_DAYS,
        }
    }

    /// 24 in hour view, 5 or 7 in week view, days-in-month in month view.
    pub fn total_units(&self) -> f64 {
        self.to_units(self.end)
    }

    pub fn to_units(&self, t: NaiveDateTime) -> f64 {
        (t - self.start).num_milliseconds() as f64 / self.unit_ms()
    }

    /// Inverse of [`to_units`](Self::to_units), rounded to the millisecond.
    pub fn instant_at(&self, units: f64) -> NaiveDateTime {
        self.start + Duration::milliseconds((units * self.unit_ms()).round() as i64)
    }

    /// Number of whole days covered (1 in hour view).
    pub fn day_count(&self) -> usize {
        (self.end.date() - self.start.date()).num_days() as usize
    }

    pub fn day(&self, index: usize) -> NaiveDate {
        self.start.date() + Duration::days(index as i64)
    }

    /// Intersect `task` with the window and express it in view-units.
    ///
    /// Returns `None` when the task lies wholly outside. Spans shorter than
    /// the mode's minimum are widened to it, staying inside the window.
    pub fn project(&self, task: &Task) -> Option<Segment> {
        let ends_before = task.end < self.start || (task.end == self.start && task.start < task.end);
        if ends_before || task.start >= self.end {
            return None;
        }

        let clipped_start = task.start.max(self.start);
        let clipped_end = task.end.min(self.end).max(clipped_start);

        let total = self.total_units();
        let min = self.min_span_units();
        let mut start_unit = self.to_units(clipped_start);
        let mut end_unit = self.to_units(clipped_end);

        if end_unit - start_unit < min {
            end_unit = start_unit + min;
            if end_unit > total {
                end_unit = total;
                start_unit = (total - min).max(0.0);
            }
        }

        Some(Segment {
            start_unit,
            end_unit,
            label: task.title.clone(),
        })
    }
}

/// Project `task` without keeping the window around.
pub fn project(task: &Task, mode: ViewMode, preset: Preset, anchor: NaiveDate) -> Option<Segment> {
    ViewWindow::new(mode, preset, anchor).project(task)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(first + Duration::days(31));
    (next - first).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn task(start: NaiveDateTime, end: NaiveDateTime) -> Task {
        Task::new("t", "r", "Shift", start, end)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn hour_view_clips_overnight_task() {
        let t = task(at(2024, 3, 4, 22, 0), at(2024, 3, 5, 6, 0));

        let evening = project(&t, ViewMode::Hour, Preset::Hours24, day(2024, 3, 4)).unwrap();
        assert_eq!(evening.start_unit, 22.0);
        assert_eq!(evening.end_unit, 24.0);

        let morning = project(&t, ViewMode::Hour, Preset::Hours24, day(2024, 3, 5)).unwrap();
        assert_eq!(morning.start_unit, 0.0);
        assert_eq!(morning.end_unit, 6.0);

        assert!(project(&t, ViewMode::Hour, Preset::Hours24, day(2024, 3, 6)).is_none());
    }

    #[test]
    fn task_ending_at_window_start_is_hidden() {
        let t = task(at(2024, 3, 4, 20, 0), at(2024, 3, 5, 0, 0));
        assert!(project(&t, ViewMode::Hour, Preset::Hours24, day(2024, 3, 5)).is_none());
    }

    #[test]
    fn full_week_starts_sunday_and_work_week_monday() {
        // 2024-03-06 is a Wednesday.
        let full = ViewWindow::new(ViewMode::Week, Preset::FullWeek, day(2024, 3, 6));
        assert_eq!(full.start, at(2024, 3, 3, 0, 0));
        assert_eq!(full.total_units(), 7.0);

        let work = ViewWindow::new(ViewMode::Week, Preset::WorkWeek, day(2024, 3, 6));
        assert_eq!(work.start, at(2024, 3, 4, 0, 0));
        assert_eq!(work.total_units(), 5.0);

        let t = task(at(2024, 3, 8, 12, 0), at(2024, 3, 9, 12, 0));
        let seg = work.project(&t).unwrap();
        assert_eq!(seg.start_unit, 4.5);
        assert_eq!(seg.end_unit, 5.0);
    }

    #[test]
    fn month_window_covers_calendar_month() {
        let w = ViewWindow::new(ViewMode::Month, Preset::FullMonth, day(2024, 2, 17));
        assert_eq!(w.start, at(2024, 2, 1, 0, 0));
        assert_eq!(w.end, at(2024, 3, 1, 0, 0));
        assert_eq!(w.total_units(), 29.0);
        assert_eq!(w.day_count(), 29);
    }

    #[test]
    fn zero_length_task_gets_minimum_width() {
        let t = task(at(2024, 3, 5, 10, 0), at(2024, 3, 5, 10, 0));
        let seg = project(&t, ViewMode::Hour, Preset::Hours24, day(2024, 3, 5)).unwrap();
        assert_eq!(seg.start_unit, 10.0);
        assert!((seg.span() - MIN_SPAN_HOURS).abs() < 1e-12);
    }

    #[test]
    fn minimum_width_stays_inside_window() {
        let t = task(at(2024, 3, 5, 23, 58), at(2024, 3, 6, 0, 0));
        let seg = project(&t, ViewMode::Hour, Preset::Hours24, day(2024, 3, 5)).unwrap();
        assert_eq!(seg.end_unit, 24.0);
        assert!((seg.start_unit - (24.0 - MIN_SPAN_HOURS)).abs() < 1e-12);
    }

    #[test]
    fn instant_at_inverts_to_units() {
        let w = ViewWindow::new(ViewMode::Month, Preset::FullMonth, day(2024, 3, 1));
        let t = at(2024, 3, 17, 13, 45);
        assert_eq!(w.instant_at(w.to_units(t)), t);
    }
}
