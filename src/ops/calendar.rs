use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::model::Task;

/// One day cell in a month grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Day of month, 1-based
    pub day: u32,
    /// Tasks whose deadline falls on this day
    pub task_count: usize,
    pub is_today: bool,
}

/// A month of day cells plus the blank cells before the 1st.
/// Weeks start on Sunday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    /// 1-based month
    pub month: u32,
    /// Blank cells before the 1st (the Sunday-based weekday of the 1st)
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

/// All tasks whose deadline falls on the given calendar day,
/// time-of-day ignored. Completed tasks are included.
pub fn tasks_on_date<'a>(tasks: &'a [Task], date: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.deadline.date_naive() == date)
        .collect()
}

/// Incomplete tasks due on the calendar day of `now`
pub fn today_agenda(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| !t.completed && t.deadline.date_naive() == now.date_naive())
        .collect()
}

/// Build the grid for a 1-based month. `None` for an invalid year/month.
pub fn month_grid(tasks: &[Task], year: i32, month: u32, today: NaiveDate) -> Option<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let leading_blanks = first.weekday().num_days_from_sunday();

    let mut days = Vec::new();
    let mut date = first;
    while date.month() == month {
        days.push(DayCell {
            date,
            day: date.day(),
            task_count: tasks
                .iter()
                .filter(|t| t.deadline.date_naive() == date)
                .count(),
            is_today: date == today,
        });
        date = date.succ_opt()?;
    }

    Some(MonthGrid {
        year,
        month,
        leading_blanks,
        days,
    })
}
