use time::OffsetDateTime;

use crate::model::{DueDatePatch, NewTask, Task, TaskId, TaskPatch};

/// Next identifier: one past the largest existing id, or [`TaskId::FIRST`] for an empty collection.
///
/// Returns `None` once the largest id has reached [`TaskId::MAX`].
#[must_use]
pub fn next_task_id<'a, I>(tasks: I) -> Option<TaskId>
where
    I: IntoIterator<Item = &'a Task>,
{
    match tasks.into_iter().map(|task| task.id).max() {
        Some(largest) => largest.next(),
        None => Some(TaskId::FIRST),
    }
}

/// Build a fresh task record from creation input.
#[must_use]
pub fn materialize(id: TaskId, input: NewTask, now: OffsetDateTime) -> Task {
    let NewTask {
        title,
        description,
        priority,
        due_date,
    } = input;

    Task {
        id,
        title,
        description: description.unwrap_or_default(),
        completed: false,
        priority: priority.unwrap_or_default(),
        due_date,
        created_at: now,
        completed_at: None,
    }
}

/// Merge a patch onto an existing record.
///
/// `completed_at` is recomputed on every merge, whether or not the patch
/// touches `completed`: `now` when the merged task is completed, `None` otherwise.
#[must_use]
pub fn merge(existing: &Task, patch: TaskPatch, now: OffsetDateTime) -> Task {
    let TaskPatch {
        title,
        description,
        completed,
        priority,
        due_date,
    } = patch;

    let mut merged = existing.clone();
    if let Some(title) = title {
        merged.title = title;
    }
    if let Some(description) = description {
        merged.description = description;
    }
    if let Some(completed) = completed {
        merged.completed = completed;
    }
    if let Some(priority) = priority {
        merged.priority = priority;
    }
    match due_date {
        Some(DueDatePatch::Set(date)) => merged.due_date = Some(date),
        Some(DueDatePatch::Clear) => merged.due_date = None,
        None => {}
    }
    merged.completed_at = merged.completed.then_some(now);
    merged
}
