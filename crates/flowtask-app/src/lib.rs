//! Application layer logic for flowtask.
//!
//! This crate orchestrates user intents against a task store, keeps the client
//! cache, and loads project configuration for the command-line front end.

pub mod board;
pub mod config;
pub mod filter_util;
pub mod outcome;
pub mod task_store;

// Re-exports for convenience
pub use board::{TaskBoard, TaskDraft, TaskEdit};
pub use config::{LatencyConfig, ProjectConfig, StoreConfig, ViewConfig};
pub use filter_util::{
    FilterBuildError, FilterBuildResult, TaskFilterBuilder, parse_due_date, parse_priority,
    parse_priority_filter, parse_status_filter,
};
pub use outcome::{Notice, NoticeLevel, Outcome, SkipReason, TaskAction};
pub use task_store::TaskStore;
