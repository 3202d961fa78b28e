use serde::{Deserialize, Serialize};

use crate::model::Task;

/// Storage key for the task snapshot
pub const TASKS_KEY: &str = "tasks";
/// Storage key for the display name (plain text)
pub const USER_NAME_KEY: &str = "userName";
/// Storage key for the reminder toggle (`"true"` / `"false"`)
pub const NOTIFICATIONS_KEY: &str = "notificationsEnabled";

/// The full serialized state of the task collection. Fully replaced on
/// every save; no deltas, no versioning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Encode the collection for storage
pub fn encode(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Snapshot {
        tasks: tasks.to_vec(),
    })
}

/// Decode a stored snapshot leniently. Unparseable text or a wrong shape
/// degrades to an empty snapshot; an individual record that is not
/// task-shaped is dropped. Never an error.
pub fn decode(text: &str) -> Snapshot {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!("stored snapshot is not valid JSON, starting empty: {err}");
            return Snapshot::default();
        }
    };

    let records = match value.get(TASKS_KEY).and_then(|t| t.as_array()) {
        Some(records) => records,
        None => {
            tracing::warn!("stored snapshot has no task list, starting empty");
            return Snapshot::default();
        }
    };

    let mut tasks = Vec::with_capacity(records.len());
    let mut dropped = 0usize;
    for record in records {
        match serde_json::from_value::<Task>(record.clone()) {
            Ok(task) => match sanitize(task) {
                Some(task) => tasks.push(task),
                None => dropped += 1,
            },
            Err(_) => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::warn!(dropped, "dropped malformed task records from snapshot");
    }

    Snapshot { tasks }
}

/// Enforce the invariants a form would have validated: titles and sub-task
/// descriptions must be non-empty. Progress is clamped during
/// deserialization. Returns `None` when the whole record is unusable.
pub fn sanitize(mut task: Task) -> Option<Task> {
    let title = task.title.trim();
    if title.is_empty() {
        return None;
    }
    task.title = title.to_string();
    task.sub_tasks.retain(|st| !st.description.trim().is_empty());
    Some(task)
}
