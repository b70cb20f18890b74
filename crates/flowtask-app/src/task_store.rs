//! Async storage abstraction the orchestrator talks to.

use std::sync::Arc;

use anyhow::Error;
use flowtask_core::{NewTask, Task, TaskId, TaskPatch};
use flowtask_store::{MemoryStore, StoreError};

/// Remote-API-shaped task storage.
///
/// This is the substitution point for a real backend; [`MemoryStore`] is the
/// in-process implementation.
#[allow(async_fn_in_trait)]
pub trait TaskStore: Send + Sync {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error> + Send;

    /// Fetch every task in store order.
    ///
    /// # Errors
    /// Returns a store-specific error when listing fails.
    async fn get_all(&self) -> Result<Vec<Task>, Self::Error>;

    /// Fetch a single task.
    ///
    /// # Errors
    /// Returns a store-specific error when the task is missing or cannot be read.
    async fn get_by_id(&self, id: TaskId) -> Result<Task, Self::Error>;

    /// Create a task and return the stored record.
    ///
    /// # Errors
    /// Returns a store-specific error when persisting fails.
    async fn create(&self, input: NewTask) -> Result<Task, Self::Error>;

    /// Merge a patch onto a task and return the stored record.
    ///
    /// # Errors
    /// Returns a store-specific error when the task is missing or persisting fails.
    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, Self::Error>;

    /// Delete a task and return the removed record.
    ///
    /// # Errors
    /// Returns a store-specific error when the task is missing or deletion fails.
    async fn delete(&self, id: TaskId) -> Result<Task, Self::Error>;

    /// Delete every listed task that exists; unknown ids are skipped.
    ///
    /// # Errors
    /// Returns a store-specific error when deletion fails as a whole.
    async fn bulk_delete(&self, ids: &[TaskId]) -> Result<Vec<Task>, Self::Error>;

    /// Mark a task completed.
    ///
    /// The default implementation forwards to [`update`](Self::update).
    ///
    /// # Errors
    /// Returns a store-specific error when the task is missing or persisting fails.
    async fn mark_complete(&self, id: TaskId) -> Result<Task, Self::Error> {
        self.update(id, TaskPatch::completion(true)).await
    }

    /// Mark a task active again.
    ///
    /// The default implementation forwards to [`update`](Self::update).
    ///
    /// # Errors
    /// Returns a store-specific error when the task is missing or persisting fails.
    async fn mark_incomplete(&self, id: TaskId) -> Result<Task, Self::Error> {
        self.update(id, TaskPatch::completion(false)).await
    }
}

impl TaskStore for MemoryStore {
    type Error = StoreError;

    async fn get_all(&self) -> Result<Vec<Task>, Self::Error> {
        Ok(Self::get_all(self).await)
    }

    async fn get_by_id(&self, id: TaskId) -> Result<Task, Self::Error> {
        Self::get_by_id(self, id).await
    }

    async fn create(&self, input: NewTask) -> Result<Task, Self::Error> {
        Self::create(self, input).await
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, Self::Error> {
        Self::update(self, id, patch).await
    }

    async fn delete(&self, id: TaskId) -> Result<Task, Self::Error> {
        Self::delete(self, id).await
    }

    async fn bulk_delete(&self, ids: &[TaskId]) -> Result<Vec<Task>, Self::Error> {
        Ok(Self::bulk_delete(self, ids).await)
    }

    async fn mark_complete(&self, id: TaskId) -> Result<Task, Self::Error> {
        Self::mark_complete(self, id).await
    }

    async fn mark_incomplete(&self, id: TaskId) -> Result<Task, Self::Error> {
        Self::mark_incomplete(self, id).await
    }
}

impl<T: TaskStore> TaskStore for Arc<T> {
    type Error = T::Error;

    async fn get_all(&self) -> Result<Vec<Task>, Self::Error> {
        (**self).get_all().await
    }

    async fn get_by_id(&self, id: TaskId) -> Result<Task, Self::Error> {
        (**self).get_by_id(id).await
    }

    async fn create(&self, input: NewTask) -> Result<Task, Self::Error> {
        (**self).create(input).await
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, Self::Error> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: TaskId) -> Result<Task, Self::Error> {
        (**self).delete(id).await
    }

    async fn bulk_delete(&self, ids: &[TaskId]) -> Result<Vec<Task>, Self::Error> {
        (**self).bulk_delete(ids).await
    }

    async fn mark_complete(&self, id: TaskId) -> Result<Task, Self::Error> {
        (**self).mark_complete(id).await
    }

    async fn mark_incomplete(&self, id: TaskId) -> Result<Task, Self::Error> {
        (**self).mark_incomplete(id).await
    }
}
