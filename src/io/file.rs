use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{RawTask, Resource, Task};

/// Resources and raw task rows as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub tasks: Vec<RawTask>,
    /// Rows dropped while loading.
    #[serde(skip)]
    pub skipped: usize,
}

#[derive(Deserialize)]
struct DatasetFile {
    #[serde(default)]
    resources: Vec<Resource>,
    #[serde(default)]
    tasks: Vec<serde_json::Value>,
}

/// Parse a dataset from JSON text. Task rows with the wrong shape are skipped.
pub fn parse_dataset(json: &str) -> Result<Dataset> {
    let file: DatasetFile = serde_json::from_str(json)?;
    let mut skipped = 0;
    let tasks = file
        .tasks
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value::<RawTask>(row) {
            Ok(task) => Some(task),
            Err(e) => {
                tracing::warn!("task row {}: {}", i + 1, e);
                skipped += 1;
                None
            }
        })
        .collect();
    Ok(Dataset {
        resources: file.resources,
        tasks,
        skipped,
    })
}

/// Load a dataset from a JSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let json = std::fs::read_to_string(path)?;
    let dataset = parse_dataset(&json)?;
    tracing::info!(
        "loaded {}: {} resources, {} tasks ({} skipped)",
        path.display(),
        dataset.resources.len(),
        dataset.tasks.len(),
        dataset.skipped
    );
    Ok(dataset)
}

/// Save resources and tasks to a JSON file.
pub fn save_dataset(resources: &[Resource], tasks: &[Task], path: &Path) -> Result<()> {
    let dataset = Dataset {
        resources: resources.to_vec(),
        tasks: tasks.iter().map(RawTask::from).collect(),
        skipped: 0,
    };
    let json = serde_json::to_string_pretty(&dataset)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawTimestamp;

    #[test]
    fn bad_rows_are_skipped_and_counted() {
        let json = r#"{
            "resources": [{ "id": "r1", "name": "Crane" }],
            "tasks": [
                { "id": "a", "resourceId": "r1", "start": 1709283600000, "end": "2024-03-01T12:00" },
                { "id": "b", "resourceId": "r1" },
                "not a task"
            ]
        }"#;
        let dataset = parse_dataset(json).unwrap();
        assert_eq!(dataset.resources.len(), 1);
        assert_eq!(dataset.tasks.len(), 1);
        assert_eq!(dataset.skipped, 2);
        assert_eq!(dataset.tasks[0].start, RawTimestamp::Millis(1_709_283_600_000));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let dataset = parse_dataset("{}").unwrap();
        assert!(dataset.resources.is_empty());
        assert!(dataset.tasks.is_empty());
        assert!(parse_dataset("[").is_err());
    }
}
