use time::{Date, Duration, Month};

use crate::model::Task;

/// Where a due date sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// No due date.
    None,
    /// Due before today.
    Overdue,
    /// Due today.
    Today,
    /// Due tomorrow.
    Tomorrow,
    /// Due after tomorrow.
    Future,
}

impl DueStatus {
    /// Classify an optional due date against `today`.
    #[must_use]
    pub fn classify(due: Option<Date>, today: Date) -> Self {
        let Some(due) = due else {
            return Self::None;
        };
        if due < today {
            Self::Overdue
        } else if due == today {
            Self::Today
        } else if today.next_day() == Some(due) {
            Self::Tomorrow
        } else {
            Self::Future
        }
    }
}

/// A task is flagged overdue only while it is still open.
#[must_use]
pub fn is_overdue(task: &Task, today: Date) -> bool {
    !task.completed && DueStatus::classify(task.due_date, today) == DueStatus::Overdue
}

/// Short label for a due date: `Today`, `Tomorrow`, or `Mon DD`.
#[must_use]
pub fn due_label(due: Date, today: Date) -> String {
    match DueStatus::classify(Some(due), today) {
        DueStatus::Today => "Today".to_owned(),
        DueStatus::Tomorrow => "Tomorrow".to_owned(),
        _ => format!("{} {:02}", month_abbrev(due.month()), due.day()),
    }
}

const fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Shortcut due dates offered next to the date input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickDate {
    /// Today.
    Today,
    /// Today + 1 day.
    Tomorrow,
    /// Today + 7 days.
    NextWeek,
}

impl QuickDate {
    /// Resolve against `today`.
    #[must_use]
    pub const fn resolve(self, today: Date) -> Date {
        let days = match self {
            Self::Today => 0,
            Self::Tomorrow => 1,
            Self::NextWeek => 7,
        };
        today.saturating_add(Duration::days(days))
    }
}
