use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};
use thiserror::Error;
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Identifier of a task (positive integer assigned by the store).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Identifier handed out when the collection is empty.
    pub const FIRST: Self = Self(1);

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Largest identifier the store will hand out or accept from a seed.
    pub const MAX: Self = Self(u64::MAX - 1);

    /// The identifier directly following this one, or `None` past [`TaskId::MAX`].
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if self.0 >= Self::MAX.0 {
            return None;
        }
        Some(Self(self.0 + 1))
    }

    /// Returns true for ids in `1..=TaskId::MAX`.
    #[must_use]
    pub const fn in_range(self) -> bool {
        self.0 >= Self::FIRST.0 && self.0 <= Self::MAX.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Failure to parse a user-supplied task identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskIdParseError {
    /// The input is not an unsigned integer.
    #[error("invalid task id '{input}': {source}")]
    NotANumber {
        /// Text as supplied.
        input: String,
        /// Why the integer parse failed.
        #[source]
        source: ParseIntError,
    },
    /// Zero is never assigned.
    #[error("task ids start at 1, got 0")]
    Zero,
}

impl FromStr for TaskId {
    type Err = TaskIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s.trim().parse().map_err(|source| TaskIdParseError::NotANumber {
            input: s.to_owned(),
            source,
        })?;
        if value == 0 {
            return Err(TaskIdParseError::Zero);
        }
        Ok(Self(value))
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default urgency.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Every priority, highest first (the order selectors present them in).
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Lowercase token used in JSON and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single task record as held by the store and the client cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier.
    #[serde(rename = "Id")]
    pub id: TaskId,
    /// Short summary, already trimmed by the caller.
    pub title: String,
    /// Free-form description (lightweight markup, rendered by the view only).
    #[serde(default)]
    pub description: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Optional calendar due date.
    #[serde(default, with = "iso_date::option")]
    pub due_date: Option<Date>,
    /// Creation instant, written once by the store.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Completion instant, present iff `completed` after the latest update.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

/// Input accepted by the store's `create` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Task title (callers trim before submitting).
    pub title: String,
    /// Optional description; absent becomes an empty string.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional priority; absent becomes [`Priority::Medium`].
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Optional due date.
    #[serde(default, with = "iso_date::option")]
    pub due_date: Option<Date>,
}

impl NewTask {
    /// Input carrying only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Patch for the due date, distinguishing "clear" from "leave untouched".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDatePatch {
    /// Set the due date.
    Set(Date),
    /// Remove the due date.
    Clear,
}

impl From<Option<Date>> for DueDatePatch {
    fn from(value: Option<Date>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }
}

/// Partial update merged onto an existing task. `None` leaves a field untouched.
///
/// The identifier and creation timestamp are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement completion flag.
    pub completed: Option<bool>,
    /// Replacement priority.
    pub priority: Option<Priority>,
    /// Due date change.
    pub due_date: Option<DueDatePatch>,
}

impl TaskPatch {
    /// Patch that only touches the completion flag.
    #[must_use]
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Returns true when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}
