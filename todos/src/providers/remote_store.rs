//! Remote todo table.

use crate::error::RemoteError;
use crate::types::{NewTodo, Todo, TodoId, TodoPatch, UserId};

/// CRUD access to the hosted `todos` table.
///
/// Row-level authorization is enforced by the backend; the client still
/// filters by owner when listing.
pub trait RemoteStore: Send + Sync {
    /// Fetch every todo owned by `owner`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn list_by_owner(
        &self,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Todo>, RemoteError>> + Send;

    /// Insert a todo and return the stored record with its assigned id and
    /// timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the insert.
    fn insert(
        &self,
        todo: &NewTodo,
    ) -> impl std::future::Future<Output = Result<Todo, RemoteError>> + Send;

    /// Apply exactly the fields present in `patch` to the todo with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    fn update_by_id(
        &self,
        id: &TodoId,
        patch: &TodoPatch,
    ) -> impl std::future::Future<Output = Result<(), RemoteError>> + Send;

    /// Delete the todo with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    fn delete_by_id(
        &self,
        id: &TodoId,
    ) -> impl std::future::Future<Output = Result<(), RemoteError>> + Send;
}
