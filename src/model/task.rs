use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A progress-tracked child item of a task. No deadline of its own; the
/// description is fixed at creation (delete and re-add to change it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub description: String,
    /// Percent complete, 0–100. Out-of-range snapshot values are clamped.
    #[serde(deserialize_with = "deserialize_progress")]
    pub progress: u8,
}

impl SubTask {
    pub fn new(id: String, description: String) -> Self {
        SubTask {
            id,
            description,
            progress: 0,
        }
    }
}

/// A user-defined unit of work with a deadline and priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier, assigned at creation, never reused
    pub id: String,
    pub title: String,
    pub priority: Priority,
    pub deadline: DateTime<Utc>,
    /// Free-text notes; empty means absent
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
    /// Insertion order is display order
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    /// Whether the sub-task list is shown. View state, but persisted.
    #[serde(default)]
    pub expanded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set once the 24-hour reminder has fired, so it never refires
    #[serde(default, skip_serializing_if = "is_false")]
    pub reminded_24h: bool,
    /// Set once the 1-hour reminder has fired
    #[serde(default, skip_serializing_if = "is_false")]
    pub reminded_1h: bool,
}

impl Task {
    /// Create a new task with the given fields, timestamped at `now`
    pub fn new(
        id: String,
        title: String,
        priority: Priority,
        deadline: DateTime<Utc>,
        notes: String,
        now: DateTime<Utc>,
    ) -> Self {
        Task {
            id,
            title,
            priority,
            deadline,
            notes,
            completed: false,
            sub_tasks: Vec::new(),
            expanded: false,
            created_at: now,
            updated_at: now,
            reminded_24h: false,
            reminded_1h: false,
        }
    }

    /// Record a semantic mutation of this task or one of its sub-tasks
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Mean of sub-task progress values, rounded to the nearest integer.
    /// 0 when there are no sub-tasks. Derived, never stored.
    pub fn overall_progress(&self) -> u8 {
        if self.sub_tasks.is_empty() {
            return 0;
        }
        let total: u32 = self.sub_tasks.iter().map(|st| u32::from(st.progress)).sum();
        (f64::from(total) / self.sub_tasks.len() as f64).round() as u8
    }

    pub fn sub_task(&self, sub_task_id: &str) -> Option<&SubTask> {
        self.sub_tasks.iter().find(|st| st.id == sub_task_id)
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn deserialize_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, 100) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task() -> Task {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        Task::new(
            "t-1".into(),
            "Write report".into(),
            Priority::Medium,
            now + chrono::Duration::days(2),
            String::new(),
            now,
        )
    }

    #[test]
    fn overall_progress_empty_is_zero() {
        let task = sample_task();
        assert_eq!(task.overall_progress(), 0);
    }

    #[test]
    fn overall_progress_is_rounded_mean() {
        let mut task = sample_task();
        task.sub_tasks.push(SubTask::new("s-1".into(), "draft".into()));
        task.sub_tasks.push(SubTask::new("s-2".into(), "review".into()));
        task.sub_tasks[0].progress = 20;
        task.sub_tasks[1].progress = 60;
        assert_eq!(task.overall_progress(), 40);

        task.sub_tasks[0].progress = 33;
        task.sub_tasks[1].progress = 34;
        // 33.5 rounds away from zero
        assert_eq!(task.overall_progress(), 34);
    }

    #[test]
    fn touch_updates_timestamp() {
        let mut task = sample_task();
        let later = task.created_at + chrono::Duration::minutes(5);
        task.touch(later);
        assert_eq!(task.updated_at, later);
        assert_eq!(task.created_at, later - chrono::Duration::minutes(5));
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn task_wire_names_are_camel_case() {
        let task = sample_task();
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("subTasks").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        // Reminder flags are omitted while unset
        assert!(json.get("reminded24h").is_none());
        assert!(json.get("reminded1h").is_none());
    }

    #[test]
    fn reminder_flags_round_trip_when_set() {
        let mut task = sample_task();
        task.reminded_24h = true;
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"reminded24h\":true"));
        let back: Task = serde_json::from_str(&json).unwrap();
        assert!(back.reminded_24h);
        assert!(!back.reminded_1h);
    }

    #[test]
    fn sub_task_progress_clamped_on_deserialize() {
        let st: SubTask =
            serde_json::from_str(r#"{"id":"s","description":"d","progress":150}"#).unwrap();
        assert_eq!(st.progress, 100);
        let st: SubTask =
            serde_json::from_str(r#"{"id":"s","description":"d","progress":-3}"#).unwrap();
        assert_eq!(st.progress, 0);
    }
}
