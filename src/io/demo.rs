//! Deterministic demo data.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::file::Dataset;
use crate::layout::projection::days_in_month;
use crate::model::{RawTask, Resource};

pub const DEMO_SEED: u64 = 20_240_301;
pub const DEMO_RESOURCES: usize = 20;
pub const DEMO_TASKS_PER_RESOURCE: usize = 6;

const TITLES: &[&str] = &[
    "Inspection",
    "Delivery",
    "Maintenance",
    "Night shift",
    "Setup",
    "Training",
    "Transfer",
    "Standby",
];

/// `count` rows named "Resource 1".."Resource N".
pub fn placeholder_resources(count: usize) -> Vec<Resource> {
    (0..count)
        .map(|i| Resource::new(format!("res-{}", i + 1), format!("Resource {}", i + 1)))
        .collect()
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN))
}

fn row(id: String, resource_id: &str, title: &str, start: NaiveDateTime, end: NaiveDateTime) -> RawTask {
    RawTask {
        id,
        resource_id: resource_id.to_string(),
        start: start.into(),
        end: end.into(),
        title: title.to_string(),
        color: None,
    }
}

/// Seeded random tasks spread over the month of `anchor`.
///
/// The first task of the first resource always runs from 22:00 on `anchor` to
/// 06:00 the next morning.
pub fn generate(seed: u64, anchor: NaiveDate, resources: usize, tasks_per_resource: usize) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let month_start = anchor.with_day(1).unwrap_or(anchor);
    let days = days_in_month(month_start) as i64;

    let resource_list = placeholder_resources(resources);
    let mut tasks = Vec::with_capacity(resources * tasks_per_resource);
    for (r, resource) in resource_list.iter().enumerate() {
        for t in 0..tasks_per_resource {
            let id = format!("{}-task-{}", resource.id, t + 1);
            let title = TITLES[rng.random_range(0..TITLES.len())];
            if r == 0 && t == 0 {
                let next = anchor + Duration::days(1);
                tasks.push(row(id, &resource.id, "Night shift", at(anchor, 22, 0), at(next, 6, 0)));
                continue;
            }
            let day = month_start + Duration::days(rng.random_range(0..days));
            let start = at(day, rng.random_range(0..24), rng.random_range(0..4) * 15);
            let end = start + Duration::minutes(rng.random_range(1..=24) * 30);
            tasks.push(row(id, &resource.id, title, start, end));
        }
    }

    tracing::debug!("generated {} demo tasks with seed {}", tasks.len(), seed);
    Dataset {
        resources: resource_list,
        tasks,
        skipped: 0,
    }
}

/// The default demo dataset for the month of `anchor`.
pub fn demo_dataset(anchor: NaiveDate) -> Dataset {
    generate(DEMO_SEED, anchor, DEMO_RESOURCES, DEMO_TASKS_PER_RESOURCE)
}

/// Month-boundary edge cases on two resources: an overnight task crossing a
/// day boundary, a short task starting at 00:30 on the 1st, and a short task
/// at the very end of the month.
pub fn edge_case_dataset(month: NaiveDate) -> Dataset {
    let first = month.with_day(1).unwrap_or(month);
    let last = first + Duration::days(days_in_month(first) as i64 - 1);
    let resources = vec![Resource::new("edge-a", "Edge A"), Resource::new("edge-b", "Edge B")];
    let tasks = vec![
        row(
            "overnight".into(),
            "edge-a",
            "Overnight",
            at(first + Duration::days(9), 22, 0),
            at(first + Duration::days(10), 6, 0),
        ),
        row("first-half-hour".into(), "edge-b", "Early", at(first, 0, 30), at(first, 0, 40)),
        row("month-end".into(), "edge-b", "Late", at(last, 23, 45), at(last, 23, 55)),
    ];
    Dataset {
        resources,
        tasks,
        skipped: 0,
    }
}
