//! Greedy interval partitioning of one resource row into lanes.

use super::projection::Segment;
use crate::model::Task;

/// Touching intervals (end == next start, within this tolerance) share a lane.
pub const LANE_EPSILON: f64 = 1e-6;

/// A task together with its projected segment.
#[derive(Debug, Clone)]
pub struct ProjectedTask<'a> {
    pub task: &'a Task,
    pub segment: Segment,
}

#[derive(Debug, Clone)]
pub struct PlacedTask<'a> {
    pub task: &'a Task,
    pub segment: Segment,
    pub lane: usize,
}

#[derive(Debug, Clone)]
pub struct LaneAssignment<'a> {
    pub placed: Vec<PlacedTask<'a>>,
    /// Always at least 1, never above the cap.
    pub lane_count: usize,
}

/// Assign each item the lowest lane that is free at its start.
///
/// Items are visited in `(start_unit, end_unit)` order. When every open lane
/// is busy and `max_lanes` lanes are already open, the item is forced into
/// the last lane, whose end is extended to cover it. Overflowing bars stack
/// there instead of being dropped.
pub fn assign_lanes(mut items: Vec<ProjectedTask<'_>>, max_lanes: usize) -> LaneAssignment<'_> {
    let max_lanes = max_lanes.max(1);
    items.sort_by(|a, b| {
        a.segment
            .start_unit
            .total_cmp(&b.segment.start_unit)
            .then(a.segment.end_unit.total_cmp(&b.segment.end_unit))
    });

    let mut lane_ends: Vec<f64> = Vec::new();
    let mut placed = Vec::with_capacity(items.len());

    for item in items {
        let start = item.segment.start_unit;
        let end = item.segment.end_unit;

        let lane = match lane_ends.iter().position(|&e| e <= start + LANE_EPSILON) {
            Some(free) => {
                lane_ends[free] = end;
                free
            }
            None if lane_ends.len() < max_lanes => {
                lane_ends.push(end);
                lane_ends.len() - 1
            }
            None => {
                let last = lane_ends.len() - 1;
                lane_ends[last] = lane_ends[last].max(end);
                last
            }
        };

        placed.push(PlacedTask {
            task: item.task,
            segment: item.segment,
            lane,
        });
    }

    LaneAssignment {
        placed,
        lane_count: lane_ends.len().max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tasks(n: usize) -> Vec<Task> {
        let t = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| Task::new(format!("t{i}"), "r", format!("Task {i}"), t, t))
            .collect()
    }

    fn items<'a>(tasks: &'a [Task], spans: &[(f64, f64)]) -> Vec<ProjectedTask<'a>> {
        tasks
            .iter()
            .zip(spans)
            .map(|(task, &(s, e))| ProjectedTask {
                task,
                segment: Segment {
                    start_unit: s,
                    end_unit: e,
                    label: task.title.clone(),
                },
            })
            .collect()
    }

    fn lane_of(result: &LaneAssignment<'_>, id: &str) -> usize {
        result.placed.iter().find(|p| p.task.id == id).unwrap().lane
    }

    #[test]
    fn empty_row_has_one_lane() {
        let result = assign_lanes(Vec::new(), 4);
        assert_eq!(result.lane_count, 1);
        assert!(result.placed.is_empty());
    }

    #[test]
    fn touching_intervals_share_a_lane() {
        let ts = tasks(3);
        let result = assign_lanes(items(&ts, &[(0.0, 2.0), (2.0, 4.0), (4.0, 5.0)]), 5);
        assert_eq!(result.lane_count, 1);
        assert!(result.placed.iter().all(|p| p.lane == 0));
    }

    #[test]
    fn reuses_lowest_free_lane() {
        let ts = tasks(4);
        // t0 [0,4) lane 0; t1 [1,2) lane 1; t2 [3,5) lane 1 (free again); t3 [4,6) lane 0
        let result = assign_lanes(items(&ts, &[(0.0, 4.0), (1.0, 2.0), (3.0, 5.0), (4.0, 6.0)]), 5);
        assert_eq!(result.lane_count, 2);
        assert_eq!(lane_of(&result, "t0"), 0);
        assert_eq!(lane_of(&result, "t1"), 1);
        assert_eq!(lane_of(&result, "t2"), 1);
        assert_eq!(lane_of(&result, "t3"), 0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let ts = tasks(3);
        let result = assign_lanes(items(&ts, &[(5.0, 6.0), (0.0, 10.0), (1.0, 2.0)]), 5);
        assert_eq!(lane_of(&result, "t1"), 0);
        assert_eq!(lane_of(&result, "t2"), 1);
        assert_eq!(lane_of(&result, "t0"), 1);
    }

    #[test]
    fn overflow_goes_to_last_lane() {
        let ts = tasks(4);
        let result = assign_lanes(items(&ts, &[(0.0, 10.0), (0.0, 10.0), (0.0, 10.0), (0.0, 10.0)]), 2);
        assert_eq!(result.lane_count, 2);
        assert_eq!(result.placed.iter().filter(|p| p.lane == 1).count(), 3);
    }

    #[test]
    fn zero_cap_is_treated_as_one() {
        let ts = tasks(2);
        let result = assign_lanes(items(&ts, &[(0.0, 1.0), (0.5, 1.5)]), 0);
        assert_eq!(result.lane_count, 1);
    }
}
