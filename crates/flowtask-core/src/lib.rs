//! Domain types and pure derivations for `flowtask`: task records, the
//! identity/timestamp policy, the filter pipeline, and progress statistics.

/// Due-date classification and quick-date shortcuts.
pub mod due;
/// Filter criteria and the filtering pipeline.
pub mod filter;
/// Identifier assignment and `createdAt`/`completedAt` derivation.
pub mod lifecycle;
/// Task records, identifiers, and mutation payloads.
pub mod model;
/// Progress counters and display partitions.
pub mod stats;
/// Case-insensitive title search.
pub mod text_matcher;

pub use due::{DueStatus, QuickDate, due_label, is_overdue};
pub use filter::{PriorityFilter, StatusFilter, TaskFilter, apply_filters};
pub use model::{DueDatePatch, NewTask, Priority, Task, TaskId, TaskIdParseError, TaskPatch};
pub use stats::{Partition, TaskStats};
