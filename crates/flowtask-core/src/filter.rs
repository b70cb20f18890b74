use std::fmt;

use crate::model::{Priority, Task};
use crate::text_matcher::TextMatcher;

/// Priority criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriorityFilter {
    /// No priority restriction.
    #[default]
    All,
    /// Only tasks with exactly this priority.
    Only(Priority),
}

impl PriorityFilter {
    fn admits(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => task.priority == priority,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(priority) => priority.fmt(f),
        }
    }
}

/// Completion-status criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Both active and completed tasks.
    #[default]
    All,
    /// Tasks not yet completed.
    Active,
    /// Completed tasks.
    Completed,
}

impl StatusFilter {
    /// Lowercase token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    const fn admits(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Criteria combined by intersection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive title search; empty means no search.
    pub search: String,
    /// Priority criterion.
    pub priority: PriorityFilter,
    /// Status criterion.
    pub status: StatusFilter,
}

impl TaskFilter {
    /// Returns true when the filter admits every task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.priority == PriorityFilter::All
            && self.status == StatusFilter::All
    }

    /// Whether a single task passes every active criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        TextMatcher::new(&self.search).is_none_or(|matcher| matcher.matches(task))
            && self.priority.admits(task)
            && self.status.admits(task)
    }

    /// Apply the filter, preserving input order.
    #[must_use]
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        apply_filters(tasks, self)
    }
}

/// Narrow `tasks` by search term, then priority, then status.
///
/// Each step only runs when its criterion is active. Ordering is stable.
#[must_use]
pub fn apply_filters(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    let mut filtered: Vec<&Task> = tasks.iter().collect();

    if let Some(matcher) = TextMatcher::new(&filter.search) {
        filtered.retain(|task| matcher.matches(task));
    }

    if filter.priority != PriorityFilter::All {
        filtered.retain(|task| filter.priority.admits(task));
    }

    if filter.status != StatusFilter::All {
        filtered.retain(|task| filter.status.admits(task));
    }

    filtered.into_iter().cloned().collect()
}
