use chrono::{DateTime, NaiveDate, NaiveDateTime};
use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

/// Bar color used when neither the task nor the palette supplies one.
pub const DEFAULT_TASK_COLOR: Color32 = Color32::from_rgb(70, 130, 180); // Steel blue

/// A normalized, time-bounded bar on a resource row.
///
/// The timeline never mutates tasks in place; edits leave as
/// [`TaskChange`](crate::layout::drag::TaskChange) records and come back as a
/// new task list.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub resource_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
    pub color: Color32,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        resource_id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            resource_id: resource_id.into(),
            start,
            end,
            title: title.into(),
            color: DEFAULT_TASK_COLOR,
        }
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }
}

/// A start/end value as it arrives from a data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Unix milliseconds, interpreted as UTC wall-clock time.
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    pub fn to_instant(&self) -> Option<NaiveDateTime> {
        match self {
            RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms).map(|d| d.naive_utc()),
            RawTimestamp::Text(s) => parse_instant(s),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawTimestamp::Millis(ms) => ms.to_string(),
            RawTimestamp::Text(s) => s.clone(),
        }
    }
}

impl From<NaiveDateTime> for RawTimestamp {
    fn from(value: NaiveDateTime) -> Self {
        RawTimestamp::Text(value.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

/// Serializable task row, as found in dataset files or handed over by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    pub id: String,
    pub resource_id: String,
    pub start: RawTimestamp,
    pub end: RawTimestamp,
    #[serde(default)]
    pub title: String,
    /// `#RRGGBB` or `#RRGGBBAA`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl RawTask {
    /// Convert to a [`Task`], resolving timestamps and picking a color.
    ///
    /// Tasks without a (valid) color get `palette[hash(resource_id) % len]`,
    /// so every task of a resource shares a color.
    pub fn normalize(&self, palette: &[Color32]) -> Result<Task> {
        let start = self.start.to_instant().ok_or_else(|| TimelineError::InvalidTimestamp {
            task_id: self.id.clone(),
            value: self.start.describe(),
        })?;
        let end = self.end.to_instant().ok_or_else(|| TimelineError::InvalidTimestamp {
            task_id: self.id.clone(),
            value: self.end.describe(),
        })?;
        if end < start {
            return Err(TimelineError::InvalidInterval {
                task_id: self.id.clone(),
            });
        }

        let explicit = self.color.as_deref().and_then(|c| match parse_hex_color(c) {
            Ok(color) => Some(color),
            Err(e) => {
                tracing::debug!("task '{}': ignoring color: {}", self.id, e);
                None
            }
        });

        Ok(Task {
            id: self.id.clone(),
            resource_id: self.resource_id.clone(),
            start,
            end,
            title: self.title.clone(),
            color: explicit.unwrap_or_else(|| palette_color(&self.resource_id, palette)),
        })
    }
}

impl From<&Task> for RawTask {
    fn from(task: &Task) -> Self {
        let [r, g, b, _] = task.color.to_array();
        Self {
            id: task.id.clone(),
            resource_id: task.resource_id.clone(),
            start: task.start.into(),
            end: task.end.into(),
            title: task.title.clone(),
            color: Some(format!("#{:02X}{:02X}{:02X}", r, g, b)),
        }
    }
}

/// Stable string hash (`h = h * 31 + c`) used for palette selection.
pub fn resource_hash(id: &str) -> u32 {
    id.chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32))
}

/// Deterministic palette pick for a resource id.
pub fn palette_color(resource_id: &str, palette: &[Color32]) -> Color32 {
    if palette.is_empty() {
        return DEFAULT_TASK_COLOR;
    }
    palette[resource_hash(resource_id) as usize % palette.len()]
}

/// Try parsing a timestamp string with several common formats.
///
/// Text with an offset is converted to UTC, like millisecond timestamps.
/// Text without one is taken as is.
fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn parse_hex_color(s: &str) -> std::result::Result<Color32, String> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(format!("Invalid hex color '{}'", s));
    }
    let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string());
    match s.len() {
        6 => Ok(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Color32::from_rgba_unmultiplied(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)?,
        )),
        _ => Err(format!("Invalid hex color '{}': expected 6 or 8 hex digits", s)),
    }
}
