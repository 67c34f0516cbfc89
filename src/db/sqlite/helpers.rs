//! Shared helper functions for SQLite repositories.

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::db::{DbError, Tag, Todo};

/// Map an sqlx error onto the storage-agnostic error type.
///
/// Foreign key failures are reported as constraint violations, everything
/// else as an opaque database error.
pub fn db_error(e: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_foreign_key_violation()
    {
        return DbError::Constraint {
            message: db_err.message().to_string(),
        };
    }
    DbError::Database {
        message: e.to_string(),
    }
}

/// Build a todo (without tags) from a row selecting
/// `id, title, task_order, completed`.
pub fn todo_from_row(row: &SqliteRow) -> Todo {
    Todo {
        id: row.get("id"),
        title: row.get("title"),
        order: row.get("task_order"),
        completed: row.get("completed"),
        tags: vec![],
    }
}

/// Build a tag from a row selecting `id, title`.
pub fn tag_from_row(row: &SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        title: row.get("title"),
    }
}

/// Fold rows of `todos LEFT JOIN todo_tags LEFT JOIN tags` into todos.
///
/// Rows must be ordered by todo id so that all rows for one todo are adjacent.
/// Rows whose `tag_id` is NULL (todos without tags) contribute no tag.
pub fn fold_todo_rows(rows: &[SqliteRow]) -> Vec<Todo> {
    let mut todos: Vec<Todo> = Vec::new();

    for row in rows {
        let id: i64 = row.get("id");
        let is_new = todos.last().is_none_or(|last| last.id != id);
        if is_new {
            todos.push(todo_from_row(row));
        }

        let tag_id: Option<i64> = row.get("tag_id");
        if let (Some(tag_id), Some(todo)) = (tag_id, todos.last_mut()) {
            todo.tags.push(Tag {
                id: tag_id,
                title: row.get("tag_title"),
            });
        }
    }

    todos
}
