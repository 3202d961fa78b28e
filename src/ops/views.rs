use chrono::{DateTime, Duration, Utc};

use crate::model::Task;

/// Temporal state of a task relative to a given instant. Completion wins
/// over everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Overdue,
    DueToday,
    Upcoming,
    Completed,
}

/// Which tasks a list view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Pending,
    Completed,
    Overdue,
}

/// Aggregate completion statistics over the whole collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    /// Incomplete and not yet overdue (the notification badge count)
    pub upcoming: usize,
    /// round(completed / total * 100); 0 when there are no tasks
    pub completion_percentage: u8,
}

/// Classify a task relative to `now`
pub fn classify(task: &Task, now: DateTime<Utc>) -> TaskStatus {
    if task.completed {
        return TaskStatus::Completed;
    }
    if task.deadline < now {
        return TaskStatus::Overdue;
    }
    if task.deadline.date_naive() == now.date_naive() {
        return TaskStatus::DueToday;
    }
    TaskStatus::Upcoming
}

/// Incomplete with a deadline strictly in the past
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    !task.completed && task.deadline < now
}

/// Filter a task list by status. Input order is preserved; no sorting.
pub fn filter_by_status(tasks: &[Task], filter: StatusFilter, now: DateTime<Utc>) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| match filter {
            StatusFilter::All => true,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Completed => task.completed,
            StatusFilter::Overdue => is_overdue(task, now),
        })
        .collect()
}

/// Aggregate statistics at `now`
pub fn compute_stats(tasks: &[Task], now: DateTime<Utc>) -> Stats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let pending = total - completed;
    let overdue = tasks.iter().filter(|t| is_overdue(t, now)).count();
    let upcoming = tasks
        .iter()
        .filter(|t| !t.completed && t.deadline >= now)
        .count();
    let completion_percentage = if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as u8
    } else {
        0
    };
    Stats {
        total,
        completed,
        pending,
        overdue,
        upcoming,
        completion_percentage,
    }
}

/// Human-readable countdown to a deadline.
///
/// Day and hour counts are floors of the instant difference, so a deadline
/// 36 hours out reads "Tomorrow", not "2 days left".
pub fn format_countdown(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = deadline - now;
    if diff < Duration::zero() {
        return "Overdue".to_string();
    }
    let days = diff.num_days();
    let hours = (diff - Duration::days(days)).num_hours();

    if days == 0 && hours < 24 {
        format!("{} hours left", hours)
    } else if days == 0 {
        "Today".to_string()
    } else if days == 1 {
        "Tomorrow".to_string()
    } else {
        format!("{} days left", days)
    }
}
