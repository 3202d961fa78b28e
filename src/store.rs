use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::io::kv::{KvError, KvStore};
use crate::io::snapshot::{self, Snapshot, NOTIFICATIONS_KEY, TASKS_KEY, USER_NAME_KEY};
use crate::model::{Priority, Settings, SubTask, Task};
use crate::ops::reminders::ReminderKind;
use crate::time::Clock;

/// Error type for store operations.
///
/// Missing ids are deliberately not here: operating on a task that no
/// longer exists is a silent no-op, not a failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("could not encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] KvError),
}

/// The canonical in-memory task collection.
///
/// Owns the tasks (insertion-ordered), the user settings, a key/value
/// backend, and a clock. Every mutation writes through to the backend
/// before returning; on a write failure the in-memory state keeps the
/// mutation and stays authoritative for the rest of the session.
///
/// Single-threaded by design: one in-flight operation at a time, no
/// locking.
pub struct TaskStore {
    tasks: Vec<Task>,
    settings: Settings,
    backend: Box<dyn KvStore>,
    clock: Arc<dyn Clock>,
}

impl TaskStore {
    /// Load the persisted snapshot and settings from `backend`. A missing,
    /// unreadable, or malformed snapshot starts an empty collection;
    /// startup never fails on bad stored data.
    pub fn open(backend: Box<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        let tasks = match backend.get(TASKS_KEY) {
            Ok(Some(text)) => snapshot::decode(&text).tasks,
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!("could not read stored tasks, starting empty: {err}");
                Vec::new()
            }
        };

        let user_name = match backend.get(USER_NAME_KEY) {
            Ok(name) => name.filter(|n| !n.trim().is_empty()),
            Err(_) => None,
        };
        let notifications_enabled = matches!(
            backend.get(NOTIFICATIONS_KEY).ok().flatten().as_deref(),
            Some("true")
        );

        TaskStore {
            tasks,
            settings: Settings {
                user_name,
                notifications_enabled,
            },
            backend,
            clock,
        }
    }

    // --- Accessors ---

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // --- Task mutations ---

    /// Create a task and return its assigned id
    pub fn create(
        &mut self,
        title: &str,
        priority: Priority,
        deadline: DateTime<Utc>,
        notes: &str,
    ) -> Result<String, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let now = self.clock.now();
        let task = Task::new(
            new_id(),
            title.to_string(),
            priority,
            deadline,
            notes.trim().to_string(),
            now,
        );
        let id = task.id.clone();
        self.tasks.push(task);
        self.persist_tasks()?;
        Ok(id)
    }

    /// Overwrite the four mutable fields of a task. A missing id is a
    /// no-op (the task was deleted while an edit form was open).
    pub fn update(
        &mut self,
        id: &str,
        title: &str,
        priority: Priority,
        deadline: DateTime<Utc>,
        notes: &str,
    ) -> Result<(), StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let now = self.clock.now();
        let task = match self.find_mut(id) {
            Some(task) => task,
            None => return Ok(()),
        };
        task.title = title.to_string();
        task.priority = priority;
        task.deadline = deadline;
        task.notes = notes.trim().to_string();
        task.touch(now);
        self.persist_tasks()
    }

    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(());
        }
        self.persist_tasks()
    }

    pub fn toggle_complete(&mut self, id: &str) -> Result<(), StoreError> {
        let now = self.clock.now();
        let task = match self.find_mut(id) {
            Some(task) => task,
            None => return Ok(()),
        };
        task.completed = !task.completed;
        task.touch(now);
        self.persist_tasks()
    }

    /// Persisted view state; not a semantic edit, so `updated_at` is left
    /// alone.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> Result<(), StoreError> {
        let task = match self.find_mut(id) {
            Some(task) => task,
            None => return Ok(()),
        };
        task.expanded = expanded;
        self.persist_tasks()
    }

    // --- Sub-task mutations ---

    /// Append a sub-task and return its assigned id. A missing parent or
    /// blank description is a no-op.
    pub fn add_sub_task(
        &mut self,
        task_id: &str,
        description: &str,
    ) -> Result<Option<String>, StoreError> {
        let description = description.trim();
        if description.is_empty() {
            return Ok(None);
        }
        let now = self.clock.now();
        let task = match self.find_mut(task_id) {
            Some(task) => task,
            None => return Ok(None),
        };
        let sub = SubTask::new(new_id(), description.to_string());
        let sub_id = sub.id.clone();
        task.sub_tasks.push(sub);
        task.touch(now);
        self.persist_tasks()?;
        Ok(Some(sub_id))
    }

    pub fn set_sub_task_progress(
        &mut self,
        task_id: &str,
        sub_task_id: &str,
        progress: u8,
    ) -> Result<(), StoreError> {
        let progress = progress.min(100);
        let now = self.clock.now();
        let task = match self.find_mut(task_id) {
            Some(task) => task,
            None => return Ok(()),
        };
        let sub = match task.sub_tasks.iter_mut().find(|st| st.id == sub_task_id) {
            Some(sub) => sub,
            None => return Ok(()),
        };
        sub.progress = progress;
        task.touch(now);
        self.persist_tasks()
    }

    pub fn delete_sub_task(&mut self, task_id: &str, sub_task_id: &str) -> Result<(), StoreError> {
        let now = self.clock.now();
        let task = match self.find_mut(task_id) {
            Some(task) => task,
            None => return Ok(()),
        };
        let before = task.sub_tasks.len();
        task.sub_tasks.retain(|st| st.id != sub_task_id);
        if task.sub_tasks.len() == before {
            return Ok(());
        }
        task.touch(now);
        self.persist_tasks()
    }

    // --- Reminder bookkeeping ---

    /// Flag a fired reminder threshold so it never refires. Bookkeeping,
    /// not a user edit: `updated_at` is left alone. Idempotent.
    pub fn mark_reminded(&mut self, task_id: &str, kind: ReminderKind) -> Result<(), StoreError> {
        let task = match self.find_mut(task_id) {
            Some(task) => task,
            None => return Ok(()),
        };
        match kind {
            ReminderKind::TwentyFourHour => task.reminded_24h = true,
            ReminderKind::OneHour => task.reminded_1h = true,
        }
        self.persist_tasks()
    }

    // --- Bulk operations ---

    /// Remove every task and the persisted snapshot with them
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.tasks.clear();
        self.backend.remove(TASKS_KEY)?;
        Ok(())
    }

    /// The full serialized state of the collection
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.tasks.clone(),
        }
    }

    /// Fully replace the collection. Records are sanitized the same way a
    /// stored snapshot is (restore bypasses form validation).
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), StoreError> {
        self.tasks = snapshot
            .tasks
            .into_iter()
            .filter_map(snapshot::sanitize)
            .collect();
        self.persist_tasks()
    }

    // --- Settings ---

    /// Save the display name; blank input is a no-op
    pub fn set_user_name(&mut self, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        self.settings.user_name = Some(name.to_string());
        self.backend.set(USER_NAME_KEY, name)?;
        Ok(())
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.settings.notifications_enabled = enabled;
        self.backend
            .set(NOTIFICATIONS_KEY, if enabled { "true" } else { "false" })?;
        Ok(())
    }

    // --- Helpers ---

    fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn persist_tasks(&mut self) -> Result<(), StoreError> {
        let text = snapshot::encode(&self.tasks)?;
        self.backend.set(TASKS_KEY, &text)?;
        Ok(())
    }
}

/// Collision-resistant opaque id, unique for the lifetime of the
/// collection
fn new_id() -> String {
    Uuid::new_v4().to_string()
}
