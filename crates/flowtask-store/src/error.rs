//! Error types for task store operations.

use std::path::PathBuf;

use flowtask_core::TaskId;
use thiserror::Error;

/// Errors that can occur during `MemoryStore` operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No task carries the requested identifier.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// The seed file could not be read.
    #[error("Failed to read seed file {path}: {source}")]
    SeedRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The seed JSON is not an array of task records.
    #[error("Failed to parse seed tasks: {0}")]
    SeedParse(#[from] serde_json::Error),

    /// Two seed records share an identifier.
    #[error("Duplicate task id in seed: {0}")]
    DuplicateSeedId(TaskId),

    /// A seed record carries an id outside `1..=TaskId::MAX`.
    #[error("Task id out of range in seed: {0}")]
    SeedIdOutOfRange(TaskId),

    /// Every identifier has been handed out.
    #[error("No task ids left to assign")]
    IdsExhausted,
}

impl StoreError {
    /// Returns true when the error means the targeted task does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_))
    }
}
