//! Typed results of orchestrated user intents and the notices they produce.

use std::fmt;

use flowtask_core::Task;

/// User intent, used to name what failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Initial fetch of the collection.
    Load,
    /// Creating a task.
    Add,
    /// Toggling completion or editing fields.
    Update,
    /// Deleting one task.
    Delete,
    /// Clearing every completed task.
    ClearCompleted,
}

impl TaskAction {
    /// Failure message shown for this action.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "Failed to load tasks. Please try again.",
            Self::Add => "Failed to add task. Please try again.",
            Self::Update => "Failed to update task. Please try again.",
            Self::Delete => "Failed to delete task. Please try again.",
            Self::ClearCompleted => "Failed to clear completed tasks. Please try again.",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ClearCompleted => "clear completed",
        })
    }
}

/// Why an intent was a no-op without contacting the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The title was empty after trimming.
    EmptyTitle,
    /// The targeted task is not in the client cache.
    UnknownTask,
    /// No cached task is completed.
    NothingToClear,
}

/// Result of one orchestrated intent.
#[derive(Debug)]
pub enum Outcome {
    /// The collection was (re)loaded.
    Loaded {
        /// Number of tasks now cached.
        count: usize,
    },
    /// A task was created and prepended to the cache.
    Added(Task),
    /// A task transitioned to completed.
    Completed(Task),
    /// A task transitioned back to active.
    Reopened(Task),
    /// A task's fields were edited.
    Updated(Task),
    /// A task was deleted.
    Deleted(Task),
    /// Completed tasks were cleared.
    Cleared {
        /// Number of completed tasks the clear was issued for.
        requested: usize,
        /// Records the store actually removed.
        removed: Vec<Task>,
    },
    /// The intent was guarded out before reaching the store.
    Skipped(SkipReason),
    /// The store rejected the operation; the cache is unchanged.
    Failed {
        /// Intent that failed.
        action: TaskAction,
        /// Store error.
        error: anyhow::Error,
    },
}

impl Outcome {
    /// Returns true when the store confirmed the intent.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Skipped(_) | Self::Failed { .. })
    }

    /// Returns true when the store rejected the intent.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Task affected by a single-task outcome.
    #[must_use]
    pub const fn task(&self) -> Option<&Task> {
        match self {
            Self::Added(task)
            | Self::Completed(task)
            | Self::Reopened(task)
            | Self::Updated(task)
            | Self::Deleted(task) => Some(task),
            _ => None,
        }
    }

    /// User-facing notification, if the outcome warrants one.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        let notice = match self {
            Self::Loaded { .. }
            | Self::Skipped(SkipReason::EmptyTitle | SkipReason::UnknownTask) => return None,
            Self::Added(_) => Notice::success("Task added successfully!"),
            Self::Completed(_) => Notice::success("Task completed! Great job!"),
            Self::Reopened(_) => Notice::info("Task moved back to active"),
            Self::Updated(_) => Notice::success("Task updated successfully"),
            Self::Deleted(_) => Notice::success("Task deleted successfully"),
            Self::Cleared { requested, .. } => {
                Notice::success(format!("Cleared {requested} completed tasks"))
            }
            Self::Skipped(SkipReason::NothingToClear) => Notice::info("No completed tasks to clear"),
            Self::Failed { action, .. } => Notice::error(action.failure_message()),
        };
        Some(notice)
    }
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmed success.
    Success,
    /// Neutral information.
    Info,
    /// Failure the user may retry.
    Error,
}

/// Toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    /// Informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    /// Error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
