//! Client-side task cache kept in sync with a [`TaskStore`].
//!
//! Every intent awaits store confirmation before the cache changes; a failed
//! store call leaves the cache exactly as it was.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use flowtask_core::{
    DueDatePatch, NewTask, Priority, Task, TaskFilter, TaskId, TaskPatch, TaskStats, apply_filters,
};
use time::Date;
use tracing::{debug, info, warn};

use crate::outcome::{Outcome, SkipReason, TaskAction};
use crate::task_store::TaskStore;

/// Fields collected by the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Raw title input.
    pub title: String,
    /// Raw description input.
    pub description: String,
    /// Selected priority.
    pub priority: Priority,
    /// Selected due date.
    pub due_date: Option<Date>,
}

impl TaskDraft {
    /// Draft with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Full field set submitted by the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    /// Edited title.
    pub title: String,
    /// Edited description.
    pub description: String,
    /// Edited priority.
    pub priority: Priority,
    /// Edited due date (`None` clears it).
    pub due_date: Option<Date>,
}

impl TaskEdit {
    /// Prefill the edit form from the current record.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date,
        }
    }

    fn into_patch(self, title: String) -> TaskPatch {
        TaskPatch {
            title: Some(title),
            description: Some(self.description.trim().to_owned()),
            completed: None,
            priority: Some(self.priority),
            due_date: Some(DueDatePatch::from(self.due_date)),
        }
    }
}

/// Orchestrates user intents against the store and owns the client cache.
///
/// Cache order is newest-first after [`load`](Self::load); additions are
/// prepended rather than re-sorted.
pub struct TaskBoard<S> {
    store: S,
    cache: Mutex<Vec<Task>>,
}

impl<S> TaskBoard<S> {
    /// Board over `store` with an empty cache.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            cache: Mutex::new(Vec::new()),
        }
    }

    /// Expose the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn cache(&self) -> MutexGuard<'_, Vec<Task>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the cached collection in display order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.cache().clone()
    }

    /// Cached copy of one task.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.cache().iter().find(|task| task.id == id).cloned()
    }

    /// Number of cached tasks, regardless of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache().len()
    }

    /// Returns true when the cache holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache().is_empty()
    }

    /// Cached tasks that pass `filter`, in display order.
    #[must_use]
    pub fn visible(&self, filter: &TaskFilter) -> Vec<Task> {
        apply_filters(&self.cache(), filter)
    }

    /// Progress counters over the unfiltered cache.
    #[must_use]
    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.cache())
    }

    fn replace_cached(&self, updated: &Task) {
        let mut cache = self.cache();
        if let Some(slot) = cache.iter_mut().find(|task| task.id == updated.id) {
            slot.clone_from(updated);
        }
    }

    fn failed<E: Into<anyhow::Error>>(action: TaskAction, error: E) -> Outcome {
        let error = error.into();
        warn!(%action, error = %error, "Task action failed");
        Outcome::Failed { action, error }
    }
}

impl<S: TaskStore> TaskBoard<S> {
    /// Fetch the full collection and cache it newest-first by `createdAt`.
    pub async fn load(&self) -> Outcome {
        let mut tasks = match self.store.get_all().await {
            Ok(tasks) => tasks,
            Err(err) => return Self::failed(TaskAction::Load, err),
        };
        tasks.sort_by_key(|task| Reverse(task.created_at));
        let count = tasks.len();
        *self.cache() = tasks;
        debug!(count, "Loaded tasks");
        Outcome::Loaded { count }
    }

    /// Create a task from the add form and prepend it to the cache.
    ///
    /// Blank titles are skipped without contacting the store.
    pub async fn add(&self, draft: TaskDraft) -> Outcome {
        let title = draft.title.trim();
        if title.is_empty() {
            debug!("Ignoring task with empty title");
            return Outcome::Skipped(SkipReason::EmptyTitle);
        }

        let input = NewTask {
            title: title.to_owned(),
            description: Some(draft.description.trim().to_owned()),
            priority: Some(draft.priority),
            due_date: draft.due_date,
        };
        match self.store.create(input).await {
            Ok(task) => {
                self.cache().insert(0, task.clone());
                info!(task = %task.id, "Added task");
                Outcome::Added(task)
            }
            Err(err) => Self::failed(TaskAction::Add, err),
        }
    }

    /// Flip completion of a cached task.
    pub async fn toggle(&self, id: TaskId) -> Outcome {
        let Some(current) = self.task(id) else {
            debug!(task = %id, "Ignoring toggle for task missing from cache");
            return Outcome::Skipped(SkipReason::UnknownTask);
        };

        match self
            .store
            .update(id, TaskPatch::completion(!current.completed))
            .await
        {
            Ok(updated) => {
                self.replace_cached(&updated);
                info!(task = %id, completed = updated.completed, "Toggled task");
                if updated.completed {
                    Outcome::Completed(updated)
                } else {
                    Outcome::Reopened(updated)
                }
            }
            Err(err) => Self::failed(TaskAction::Update, err),
        }
    }

    /// Submit the full edited field set for a task.
    ///
    /// Blank titles are skipped without contacting the store.
    pub async fn edit(&self, id: TaskId, edit: TaskEdit) -> Outcome {
        let title = edit.title.trim().to_owned();
        if title.is_empty() {
            debug!(task = %id, "Ignoring edit with empty title");
            return Outcome::Skipped(SkipReason::EmptyTitle);
        }

        match self.store.update(id, edit.into_patch(title)).await {
            Ok(updated) => {
                self.replace_cached(&updated);
                info!(task = %id, "Edited task");
                Outcome::Updated(updated)
            }
            Err(err) => Self::failed(TaskAction::Update, err),
        }
    }

    /// Delete a task and drop it from the cache.
    pub async fn delete(&self, id: TaskId) -> Outcome {
        match self.store.delete(id).await {
            Ok(removed) => {
                self.cache().retain(|task| task.id != id);
                info!(task = %id, "Deleted task");
                Outcome::Deleted(removed)
            }
            Err(err) => Self::failed(TaskAction::Delete, err),
        }
    }

    /// Remove every cached completed task through one bulk delete.
    pub async fn clear_completed(&self) -> Outcome {
        let ids: Vec<TaskId> = self
            .cache()
            .iter()
            .filter(|task| task.completed)
            .map(|task| task.id)
            .collect();
        if ids.is_empty() {
            debug!("No completed tasks to clear");
            return Outcome::Skipped(SkipReason::NothingToClear);
        }

        match self.store.bulk_delete(&ids).await {
            Ok(removed) => {
                let cleared: HashSet<TaskId> = ids.iter().copied().collect();
                self.cache().retain(|task| !cleared.contains(&task.id));
                info!(requested = ids.len(), removed = removed.len(), "Cleared completed tasks");
                Outcome::Cleared {
                    requested: ids.len(),
                    removed,
                }
            }
            Err(err) => Self::failed(TaskAction::ClearCompleted, err),
        }
    }
}
