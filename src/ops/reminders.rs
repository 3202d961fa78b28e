use chrono::{DateTime, Utc};

use crate::model::Task;

/// How many upcoming tasks the reminder list shows by default
pub const UPCOMING_LIMIT: usize = 10;

/// Which pre-deadline threshold a reminder belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    TwentyFourHour,
    OneHour,
}

impl ReminderKind {
    /// Notification body for this threshold
    pub fn message(self) -> &'static str {
        match self {
            ReminderKind::TwentyFourHour => "Due in 24 hours",
            ReminderKind::OneHour => "Due in 1 hour",
        }
    }
}

/// A reminder threshold that has been crossed and not yet flagged.
/// The caller must mark the task so the same threshold never fires twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub task_id: String,
    pub title: String,
    pub kind: ReminderKind,
}

/// Incomplete, not-yet-overdue tasks sorted ascending by deadline,
/// truncated to `limit`. The sort is stable, so deadline ties keep
/// insertion order.
pub fn upcoming_reminders(tasks: &[Task], now: DateTime<Utc>, limit: usize) -> Vec<&Task> {
    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.completed && t.deadline >= now)
        .collect();
    upcoming.sort_by_key(|t| t.deadline);
    upcoming.truncate(limit);
    upcoming
}

/// Reminder thresholds crossed as of `now`: the 24-hour reminder fires in
/// the window (23, 24] hours before the deadline, the 1-hour reminder in
/// (0, 1]. Already-flagged and completed tasks never fire.
pub fn due_reminders(tasks: &[Task], now: DateTime<Utc>) -> Vec<DueReminder> {
    let mut due = Vec::new();
    for task in tasks {
        if task.completed {
            continue;
        }
        let hours_until = (task.deadline - now).num_seconds() as f64 / 3600.0;

        if hours_until > 23.0 && hours_until <= 24.0 && !task.reminded_24h {
            due.push(DueReminder {
                task_id: task.id.clone(),
                title: task.title.clone(),
                kind: ReminderKind::TwentyFourHour,
            });
        }
        if hours_until > 0.0 && hours_until <= 1.0 && !task.reminded_1h {
            due.push(DueReminder {
                task_id: task.id.clone(),
                title: task.title.clone(),
                kind: ReminderKind::OneHour,
            });
        }
    }
    due
}
