//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.
//!
//! Methods return `Send` futures so that handlers generic over [`Database`]
//! can be used as axum handlers.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{Id, NewTodo, Tag, Todo, TodoPatch, TodoTag},
};

/// Repository for Todo operations, including the todo side of the
/// todo/tag association.
pub trait TodoRepository {
    /// Create a new todo. The returned todo has no tags.
    fn create(&self, todo: &NewTodo) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Get a todo by ID together with its tags.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Get all todos, each with its tags.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Todo>>> + Send;

    /// Apply a partial update.
    ///
    /// Fails with `Validation` for an empty patch and `NotFound` when no row
    /// matched. The returned todo is re-read from the todo table only, so its
    /// `tags` are always empty.
    fn update(&self, id: Id, patch: &TodoPatch) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Delete a todo by ID. Associations cascade.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;

    /// Delete every todo.
    fn delete_all(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Link a tag to a todo. Linking an existing pair is a no-op.
    ///
    /// Fails with `NotFound` if either side does not exist.
    fn add_tag(&self, todo_id: Id, tag_id: Id) -> impl Future<Output = DbResult<TodoTag>> + Send;

    /// Unlink a tag from a todo. Missing pairs are not an error.
    fn remove_tag(&self, todo_id: Id, tag_id: Id) -> impl Future<Output = DbResult<()>> + Send;

    /// Unlink every tag from a todo.
    fn remove_all_tags(&self, todo_id: Id) -> impl Future<Output = DbResult<()>> + Send;

    /// Get all tags linked to a todo.
    fn get_tags(&self, todo_id: Id) -> impl Future<Output = DbResult<Vec<Tag>>> + Send;
}

/// Repository for Tag operations.
pub trait TagRepository {
    /// Create a new tag.
    fn create(&self, title: &str) -> impl Future<Output = DbResult<Tag>> + Send;

    /// Get a tag by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<Tag>> + Send;

    /// Get all tags.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Tag>>> + Send;

    /// Rename a tag and return the stored row.
    fn update(&self, id: Id, title: &str) -> impl Future<Output = DbResult<Tag>> + Send;

    /// Delete a tag by ID along with its associations.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;

    /// Delete every tag.
    fn delete_all(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get all todos linked to a tag. Returned todos carry no tags.
    fn get_todos(&self, tag_id: Id) -> impl Future<Output = DbResult<Vec<Todo>>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync {
    type Todos<'a>: TodoRepository + Send + Sync
    where
        Self: 'a;
    type Tags<'a>: TagRepository + Send + Sync
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Check that the store answers queries.
    fn ping(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the todo repository.
    fn todos(&self) -> Self::Todos<'_>;

    /// Get the tag repository.
    fn tags(&self) -> Self::Tags<'_>;
}
