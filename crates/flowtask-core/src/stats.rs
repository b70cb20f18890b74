use serde::Serialize;

use crate::model::Task;

/// Progress counters over an (unfiltered) task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    /// Number of tasks in the workflow.
    pub total: usize,
    /// Tasks not yet completed.
    pub active: usize,
    /// Completed tasks.
    pub completed: usize,
}

impl TaskStats {
    /// Count tasks by completion state.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }

    /// Completed share in whole percent, rounded half up; 0 for an empty collection.
    #[must_use]
    pub const fn progress_percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 200 + self.total) / (self.total * 2)
    }
}

/// Filtered tasks split into the two groups the list view shows.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    /// Tasks still to do, in input order.
    pub active: Vec<&'a Task>,
    /// Completed tasks, in input order.
    pub completed: Vec<&'a Task>,
}

impl<'a> Partition<'a> {
    /// Split a (usually filtered) slice by completion.
    #[must_use]
    pub fn of(tasks: &'a [Task]) -> Self {
        let (completed, active): (Vec<&Task>, Vec<&Task>) = tasks.iter().partition(|task| task.completed);
        Self { active, completed }
    }

    /// Returns true when both groups are empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}
