//! Mock remote store for testing.

use crate::error::RemoteError;
use crate::providers::RemoteStore;
use crate::types::{NewTodo, Todo, TodoId, TodoPatch, UserId};
use chrono::{DateTime, Duration as TimeDelta, Utc};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 2025-01-01T00:00:00Z
const BASE_TIMESTAMP: i64 = 1_735_689_600;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Todo>,
    next_id: u64,
    clock_ticks: i64,
    failures: Failures,
    calls: CallCounts,
}

impl Table {
    /// Next backend timestamp; strictly increasing, one minute apart
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock_ticks += 1;
        base_time() + TimeDelta::minutes(self.clock_ticks)
    }
}

#[derive(Debug, Default, Clone)]
struct Failures {
    list: Option<RemoteError>,
    insert: Option<RemoteError>,
    update: Option<RemoteError>,
    delete: Option<RemoteError>,
}

/// Number of calls per operation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    /// `list_by_owner` calls
    pub list: usize,
    /// `insert` calls
    pub insert: usize,
    /// `update_by_id` calls
    pub update: usize,
    /// `delete_by_id` calls
    pub delete: usize,
}

impl CallCounts {
    /// Calls that would have written to the backend
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.insert + self.update + self.delete
    }
}

/// Mock remote store.
///
/// Keeps the table in memory. Ids are assigned as `todo-1`, `todo-2`, ...
/// and timestamps advance one minute per write starting at
/// 2025-01-01T00:00:00Z. Failures set with `fail_*` persist until
/// [`MockRemoteStore::clear_failures`].
#[derive(Debug, Clone, Default)]
pub struct MockRemoteStore {
    table: Arc<Mutex<Table>>,
    latency: Option<Duration>,
}

impl MockRemoteStore {
    /// Create an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before it touches the table.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a stored record for `owner` as if it had been inserted earlier.
    ///
    /// Returns the stored record.
    pub fn seed(&self, owner: &UserId, title: &str, completed: bool) -> Todo {
        self.with_table(|table| {
            table.next_id += 1;
            let now = table.tick();
            let todo = Todo {
                id: TodoId::new(format!("todo-{}", table.next_id)),
                title: title.to_string(),
                description: None,
                completed,
                created_at: now,
                updated_at: now,
                user_id: owner.clone(),
            };
            table.rows.push(todo.clone());
            todo
        })
    }

    /// Store `todo` verbatim, even if its id already exists.
    pub fn insert_raw(&self, todo: Todo) {
        self.with_table(|table| table.rows.push(todo));
    }

    /// All stored records, in insertion order.
    #[must_use]
    pub fn rows(&self) -> Vec<Todo> {
        self.with_table(|table| table.rows.clone())
    }

    /// Stored record with `id`.
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<Todo> {
        self.with_table(|table| table.rows.iter().find(|todo| &todo.id == id).cloned())
    }

    /// Calls made so far.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.with_table(|table| table.calls)
    }

    /// Make `list_by_owner` fail with `message`.
    pub fn fail_list(&self, message: &str) {
        self.with_table(|table| table.failures.list = Some(RemoteError::new(message)));
    }

    /// Make `insert` fail with `message`.
    pub fn fail_insert(&self, message: &str) {
        self.with_table(|table| table.failures.insert = Some(RemoteError::new(message)));
    }

    /// Make `update_by_id` fail with `message`.
    pub fn fail_update(&self, message: &str) {
        self.with_table(|table| table.failures.update = Some(RemoteError::new(message)));
    }

    /// Make `delete_by_id` fail with `message`.
    pub fn fail_delete(&self, message: &str) {
        self.with_table(|table| table.failures.delete = Some(RemoteError::new(message)));
    }

    /// Make every operation succeed again.
    pub fn clear_failures(&self) {
        self.with_table(|table| table.failures = Failures::default());
    }

    fn with_table<T>(&self, f: impl FnOnce(&mut Table) -> T) -> T {
        let mut table = self
            .table
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut table)
    }

    async fn wait(latency: Option<Duration>) {
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl RemoteStore for MockRemoteStore {
    fn list_by_owner(
        &self,
        owner: &UserId,
    ) -> impl Future<Output = Result<Vec<Todo>, RemoteError>> + Send {
        let store = self.clone();
        let owner = owner.clone();

        async move {
            Self::wait(store.latency).await;
            store.with_table(|table| {
                table.calls.list += 1;
                if let Some(error) = table.failures.list.clone() {
                    return Err(error);
                }

                let mut todos: Vec<Todo> = table
                    .rows
                    .iter()
                    .filter(|todo| todo.user_id == owner)
                    .cloned()
                    .collect();
                todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                Ok(todos)
            })
        }
    }

    fn insert(&self, todo: &NewTodo) -> impl Future<Output = Result<Todo, RemoteError>> + Send {
        let store = self.clone();
        let new = todo.clone();

        async move {
            Self::wait(store.latency).await;
            store.with_table(|table| {
                table.calls.insert += 1;
                if let Some(error) = table.failures.insert.clone() {
                    return Err(error);
                }

                table.next_id += 1;
                let now = table.tick();
                let todo = Todo {
                    id: TodoId::new(format!("todo-{}", table.next_id)),
                    title: new.title,
                    description: new.description,
                    completed: new.completed,
                    created_at: now,
                    updated_at: now,
                    user_id: new.user_id,
                };
                table.rows.push(todo.clone());
                Ok(todo)
            })
        }
    }

    fn update_by_id(
        &self,
        id: &TodoId,
        patch: &TodoPatch,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let store = self.clone();
        let id = id.clone();
        let patch = patch.clone();

        async move {
            Self::wait(store.latency).await;
            store.with_table(|table| {
                table.calls.update += 1;
                if let Some(error) = table.failures.update.clone() {
                    return Err(error);
                }

                // A filter matching no row is not an error
                let now = table.tick();
                if let Some(todo) = table.rows.iter_mut().find(|todo| todo.id == id) {
                    patch.apply_to(todo);
                    todo.updated_at = now;
                }
                Ok(())
            })
        }
    }

    fn delete_by_id(&self, id: &TodoId) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let store = self.clone();
        let id = id.clone();

        async move {
            Self::wait(store.latency).await;
            store.with_table(|table| {
                table.calls.delete += 1;
                if let Some(error) = table.failures.delete.clone() {
                    return Err(error);
                }

                table.rows.retain(|todo| todo.id != id);
                Ok(())
            })
        }
    }
}

fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(BASE_TIMESTAMP, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_ids_and_increasing_timestamps() {
        let store = MockRemoteStore::new();
        let owner = UserId::new("u1");

        let first = store
            .insert(&NewTodo::new("A", None, owner.clone()).unwrap())
            .await
            .unwrap();
        let second = store
            .insert(&NewTodo::new("B", Some("details"), owner.clone()).unwrap())
            .await
            .unwrap();

        assert_eq!(first.id, TodoId::new("todo-1"));
        assert_eq!(second.id, TodoId::new("todo-2"));
        assert!(second.created_at > first.created_at);
        assert_eq!(first.created_at.to_rfc3339(), "2025-01-01T00:01:00+00:00");

        let listed = store.list_by_owner(&owner).await.unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[tokio::test]
    async fn list_only_returns_owner_rows() {
        let store = MockRemoteStore::new();
        store.seed(&UserId::new("u1"), "mine", false);
        store.seed(&UserId::new("u2"), "theirs", false);

        let listed = store.list_by_owner(&UserId::new("u1")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "mine");
        assert_eq!(store.calls().list, 1);
    }

    #[tokio::test]
    async fn failures_are_injected_until_cleared() {
        let store = MockRemoteStore::new();
        let todo = store.seed(&UserId::new("u1"), "A", false);

        store.fail_update("offline");
        let result = store.update_by_id(&todo.id, &TodoPatch::completion(true)).await;
        assert_eq!(result, Err(RemoteError::new("offline")));
        assert_eq!(store.get(&todo.id).map(|t| t.completed), Some(false));

        store.clear_failures();
        store
            .update_by_id(&todo.id, &TodoPatch::completion(true))
            .await
            .unwrap();
        assert_eq!(store.get(&todo.id).map(|t| t.completed), Some(true));
        assert_eq!(store.calls().update, 2);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let store = MockRemoteStore::new();
        let todo = store.seed(&UserId::new("u1"), "A", false);
        store.delete_by_id(&todo.id).await.unwrap();
        assert!(store.rows().is_empty());
        assert_eq!(store.calls().writes(), 1);
    }
}
