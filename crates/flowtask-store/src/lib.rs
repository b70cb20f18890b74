//! In-memory task store standing in for a remote task API.
//!
//! Every operation waits out a simulated latency before it touches the
//! collection, then works on owned copies so callers never alias store state.

pub mod clock;
pub mod error;
pub mod latency;

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use flowtask_core::lifecycle::{materialize, merge, next_task_id};
use flowtask_core::{NewTask, Task, TaskId, TaskPatch};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::StoreError;
pub use latency::LatencyProfile;

use latency::pause;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Authoritative in-memory task collection.
///
/// Cloning yields another handle onto the same collection.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tasks: Arc<Mutex<Vec<Task>>>,
    clock: Arc<dyn Clock>,
    latency: LatencyProfile,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with the wall clock and the default latency profile.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Store pre-populated with `tasks`, kept in the given order.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(tasks)),
            clock: Arc::new(SystemClock),
            latency: LatencyProfile::default(),
        }
    }

    /// Parse a JSON array of task records into a store.
    ///
    /// # Errors
    /// Returns [`StoreError::SeedParse`] for malformed JSON,
    /// [`StoreError::SeedIdOutOfRange`] for an id of 0 or past [`TaskId::MAX`],
    /// and [`StoreError::DuplicateSeedId`] when two records share an id.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let tasks: Vec<Task> = serde_json::from_str(json)?;
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !task.id.in_range() {
                return Err(StoreError::SeedIdOutOfRange(task.id));
            }
            if !seen.insert(task.id) {
                return Err(StoreError::DuplicateSeedId(task.id));
            }
        }
        debug!(count = tasks.len(), "Loaded seed tasks");
        Ok(Self::with_tasks(tasks))
    }

    /// Read and parse a seed file.
    ///
    /// # Errors
    /// Returns [`StoreError::SeedRead`] when the file cannot be read, or any
    /// error from [`MemoryStore::from_json`].
    pub fn from_seed_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| StoreError::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the latency profile.
    #[must_use]
    pub const fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Active latency profile.
    #[must_use]
    pub const fn latency(&self) -> &LatencyProfile {
        &self.latency
    }

    /// Copy of every task in insertion order.
    pub async fn get_all(&self) -> Vec<Task> {
        pause(self.latency.get_all).await;
        let tasks = self.tasks.lock().await.clone();
        debug!(count = tasks.len(), "Listed tasks");
        tasks
    }

    /// Copy of a single task.
    ///
    /// # Errors
    /// Returns [`StoreError::TaskNotFound`] when no task has `id`.
    pub async fn get_by_id(&self, id: TaskId) -> StoreResult<Task> {
        pause(self.latency.get_by_id).await;
        let tasks = self.tasks.lock().await;
        tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or(StoreError::TaskNotFound(id))
    }

    /// Append a new task; the store assigns `Id` and `createdAt`.
    ///
    /// # Errors
    /// Returns [`StoreError::IdsExhausted`] once the largest id is [`TaskId::MAX`].
    pub async fn create(&self, input: NewTask) -> StoreResult<Task> {
        pause(self.latency.create).await;
        let mut tasks = self.tasks.lock().await;
        let id = next_task_id(tasks.iter()).ok_or(StoreError::IdsExhausted)?;
        let task = materialize(id, input, self.clock.now());
        tasks.push(task.clone());
        drop(tasks);
        info!(task = %task.id, "Created task");
        Ok(task)
    }

    /// Merge `patch` onto the stored record and replace it in place.
    ///
    /// `completedAt` is recomputed on every update, see [`merge`].
    ///
    /// # Errors
    /// Returns [`StoreError::TaskNotFound`] when no task has `id`.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        pause(self.latency.update).await;
        let mut tasks = self.tasks.lock().await;
        let slot = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::TaskNotFound(id))?;
        let updated = merge(slot, patch, self.clock.now());
        slot.clone_from(&updated);
        drop(tasks);
        info!(task = %id, completed = updated.completed, "Updated task");
        Ok(updated)
    }

    /// Remove a task and return it.
    ///
    /// # Errors
    /// Returns [`StoreError::TaskNotFound`] when no task has `id`.
    pub async fn delete(&self, id: TaskId) -> StoreResult<Task> {
        pause(self.latency.delete).await;
        let mut tasks = self.tasks.lock().await;
        let index = tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::TaskNotFound(id))?;
        let removed = tasks.remove(index);
        drop(tasks);
        info!(task = %id, "Deleted task");
        Ok(removed)
    }

    /// Remove every listed task that exists, in the order given.
    ///
    /// Unknown ids are skipped. Returns the removed records in removal order.
    pub async fn bulk_delete(&self, ids: &[TaskId]) -> Vec<Task> {
        pause(self.latency.bulk_delete).await;
        let mut tasks = self.tasks.lock().await;
        let mut removed = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(index) = tasks.iter().position(|task| task.id == id) {
                removed.push(tasks.remove(index));
            } else {
                debug!(task = %id, "Skipping unknown task in bulk delete");
            }
        }
        drop(tasks);
        info!(requested = ids.len(), removed = removed.len(), "Bulk deleted tasks");
        removed
    }

    /// Shortcut for `update(id, completed = true)`.
    ///
    /// # Errors
    /// Returns [`StoreError::TaskNotFound`] when no task has `id`.
    pub async fn mark_complete(&self, id: TaskId) -> StoreResult<Task> {
        pause(self.latency.mark).await;
        self.update(id, TaskPatch::completion(true)).await
    }

    /// Shortcut for `update(id, completed = false)`.
    ///
    /// # Errors
    /// Returns [`StoreError::TaskNotFound`] when no task has `id`.
    pub async fn mark_incomplete(&self, id: TaskId) -> StoreResult<Task> {
        pause(self.latency.mark).await;
        self.update(id, TaskPatch::completion(false)).await
    }

    /// Number of stored tasks.
    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    /// Returns true when the store holds no tasks.
    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtask_core::{DueDatePatch, Priority};
    use time::Duration;
    use time::macros::{date, datetime};

    fn store_with_clock() -> (MemoryStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(datetime!(2025-04-01 08:00:00 UTC)));
        let store = MemoryStore::new()
            .with_latency(LatencyProfile::none())
            .with_clock(clock.clone());
        (store, clock)
    }

    fn ok<T>(result: StoreResult<T>) -> T {
        result.unwrap_or_else(|err| panic!("store operation failed: {err}"))
    }

    #[tokio::test]
    async fn create_on_empty_store_applies_defaults() {
        let (store, clock) = store_with_clock();
        let task = ok(store.create(NewTask::titled("Buy milk")).await);

        assert_eq!(task.id, TaskId(1));
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.created_at, clock.now());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn ids_continue_after_the_largest_existing_id() {
        let (store, _clock) = store_with_clock();
        let first = ok(store.create(NewTask::titled("a")).await);
        let second = ok(store.create(NewTask::titled("b")).await);
        let third = ok(store.create(NewTask::titled("c")).await);
        ok(store.delete(third.id).await);
        ok(store.delete(first.id).await);

        let next = ok(store.create(NewTask::titled("d")).await);
        assert_eq!(second.id, TaskId(2));
        assert_eq!(next.id, TaskId(3));
    }

    #[tokio::test]
    async fn toggle_then_untoggle_clears_completed_at() {
        let (store, clock) = store_with_clock();
        let task = ok(store.create(NewTask::titled("Buy milk")).await);

        clock.advance(Duration::hours(1));
        let done = ok(store.update(task.id, TaskPatch::completion(true)).await);
        assert_eq!(done.completed_at, Some(clock.now()));

        let reopened = ok(store.update(task.id, TaskPatch::completion(false)).await);
        assert_eq!(reopened.completed_at, None);
        assert_eq!(reopened.created_at, task.created_at);
    }

    #[tokio::test]
    async fn unrelated_edit_restamps_completed_at() {
        let (store, clock) = store_with_clock();
        let task = ok(store.create(NewTask::titled("Ship release")).await);
        let done = ok(store.mark_complete(task.id).await);

        clock.advance(Duration::days(2));
        let edited = ok(store
            .update(
                task.id,
                TaskPatch {
                    priority: Some(Priority::High),
                    due_date: Some(DueDatePatch::Set(date!(2025 - 05 - 01))),
                    ..TaskPatch::default()
                },
            )
            .await);

        assert!(edited.completed);
        assert_eq!(edited.completed_at, Some(clock.now()));
        assert_ne!(edited.completed_at, done.completed_at);
    }

    #[tokio::test]
    async fn update_replaces_record_in_place() {
        let (store, _clock) = store_with_clock();
        for title in ["a", "b", "c"] {
            ok(store.create(NewTask::titled(title)).await);
        }
        ok(store
            .update(
                TaskId(2),
                TaskPatch {
                    title: Some("B".into()),
                    ..TaskPatch::default()
                },
            )
            .await);

        let titles: Vec<String> = store.get_all().await.into_iter().map(|task| task.title).collect();
        assert_eq!(titles, vec!["a", "B", "c"]);
    }

    #[tokio::test]
    async fn missing_ids_raise_not_found() {
        let (store, _clock) = store_with_clock();
        let missing = TaskId(99);

        assert!(matches!(store.get_by_id(missing).await, Err(StoreError::TaskNotFound(id)) if id == missing));
        assert!(store.update(missing, TaskPatch::completion(true)).await.is_err());
        assert!(store.delete(missing).await.is_err_and(|err| err.is_not_found()));
        assert!(store.mark_incomplete(missing).await.is_err());
    }

    #[tokio::test]
    async fn mark_incomplete_reopens_a_completed_task() {
        let (store, _clock) = store_with_clock();
        let task = ok(store.create(NewTask::titled("Water plants")).await);
        ok(store.mark_complete(task.id).await);

        let reopened = ok(store.mark_incomplete(task.id).await);
        assert!(!reopened.completed);
        assert_eq!(reopened.completed_at, None);
        assert_eq!(ok(store.get_by_id(task.id).await), reopened);
    }

    #[tokio::test]
    async fn get_all_returns_detached_copies() {
        let (store, _clock) = store_with_clock();
        ok(store.create(NewTask::titled("original")).await);

        let mut snapshot = store.get_all().await;
        snapshot[0].title = "mutated".into();
        snapshot.clear();

        let fetched = ok(store.get_by_id(TaskId(1)).await);
        assert_eq!(fetched.title, "original");
    }

    #[tokio::test]
    async fn bulk_delete_skips_unknown_ids_and_keeps_request_order() {
        let (store, _clock) = store_with_clock();
        for title in ["a", "b", "c", "d"] {
            ok(store.create(NewTask::titled(title)).await);
        }

        let removed = store
            .bulk_delete(&[TaskId(3), TaskId(42), TaskId(1), TaskId(3)])
            .await;
        let removed_ids: Vec<TaskId> = removed.iter().map(|task| task.id).collect();
        assert_eq!(removed_ids, vec![TaskId(3), TaskId(1)]);

        let remaining: Vec<TaskId> = store.get_all().await.iter().map(|task| task.id).collect();
        assert_eq!(remaining, vec![TaskId(2), TaskId(4)]);
    }

    #[tokio::test]
    async fn bulk_delete_of_nothing_is_a_no_op() {
        let (store, _clock) = store_with_clock();
        ok(store.create(NewTask::titled("keep")).await);
        assert!(store.bulk_delete(&[]).await.is_empty());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn seeded_store_continues_from_seed_ids() {
        let json = r#"[
            {"Id": 4, "title": "seeded", "createdAt": "2024-02-01T10:00:00Z"},
            {"Id": 9, "title": "also seeded", "completed": true, "priority": "high",
             "createdAt": "2024-02-02T10:00:00Z", "completedAt": "2024-02-03T10:00:00Z"}
        ]"#;
        let store = ok(MemoryStore::from_json(json)).with_latency(LatencyProfile::none());
        let created = ok(store.create(NewTask::titled("fresh")).await);
        assert_eq!(created.id, TaskId(10));
        assert_eq!(store.len().await, 3);
    }

    #[test]
    fn seed_rejects_duplicate_ids() {
        let json = r#"[
            {"Id": 1, "title": "a", "createdAt": "2024-02-01T10:00:00Z"},
            {"Id": 1, "title": "b", "createdAt": "2024-02-01T10:00:00Z"}
        ]"#;
        assert!(matches!(
            MemoryStore::from_json(json),
            Err(StoreError::DuplicateSeedId(TaskId(1)))
        ));
        assert!(matches!(MemoryStore::from_json("{"), Err(StoreError::SeedParse(_))));
    }

    #[test]
    fn seed_rejects_ids_outside_the_assignable_range() {
        let zero = r#"[{"Id": 0, "title": "zero", "createdAt": "2024-02-01T10:00:00Z"}]"#;
        assert!(matches!(
            MemoryStore::from_json(zero),
            Err(StoreError::SeedIdOutOfRange(TaskId(0)))
        ));

        let top = r#"[{"Id": 18446744073709551615, "title": "top", "createdAt": "2024-02-01T10:00:00Z"}]"#;
        assert!(matches!(
            MemoryStore::from_json(top),
            Err(StoreError::SeedIdOutOfRange(TaskId(u64::MAX)))
        ));
    }

    #[tokio::test]
    async fn create_refuses_to_wrap_past_the_largest_id() {
        let last = materialize(TaskId::MAX, NewTask::titled("last"), datetime!(2025-01-01 00:00:00 UTC));
        let store = MemoryStore::with_tasks(vec![last]).with_latency(LatencyProfile::none());

        for _ in 0..2 {
            assert!(matches!(
                store.create(NewTask::titled("next")).await,
                Err(StoreError::IdsExhausted)
            ));
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn operations_wait_out_the_simulated_latency() {
        let store = MemoryStore::new();
        let started = tokio::time::Instant::now();
        ok(store.create(NewTask::titled("slow")).await);
        assert!(started.elapsed() >= std::time::Duration::from_millis(400));

        let started = tokio::time::Instant::now();
        ok(store.mark_complete(TaskId(1)).await);
        assert!(started.elapsed() >= std::time::Duration::from_millis(500));
    }
}
