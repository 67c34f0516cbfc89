//! SQLite TodoRepository implementation.

use sqlx::SqlitePool;

use super::helpers::{db_error, fold_todo_rows, tag_from_row, todo_from_row};
use crate::db::{DbError, DbResult, Id, NewTodo, Tag, Todo, TodoPatch, TodoRepository, TodoTag};

/// Todos joined with their tags. Todos without tags yield one row with NULL tag columns.
const TODO_WITH_TAGS_SQL: &str = "SELECT todos.id, todos.title, todos.task_order, todos.completed, \
     tags.id AS tag_id, tags.title AS tag_title \
     FROM todos \
     LEFT JOIN todo_tags ON todos.id = todo_tags.todo_id \
     LEFT JOIN tags ON todo_tags.tag_id = tags.id";

/// SQLx-backed todo repository.
pub struct SqliteTodoRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> TodoRepository for SqliteTodoRepository<'a> {
    async fn create(&self, todo: &NewTodo) -> DbResult<Todo> {
        let result =
            sqlx::query("INSERT INTO todos (title, task_order, completed) VALUES (?, ?, 0)")
                .bind(&todo.title)
                .bind(todo.order)
                .execute(self.pool)
                .await
                .map_err(db_error)?;

        Ok(Todo {
            id: result.last_insert_rowid(),
            title: todo.title.clone(),
            order: todo.order,
            completed: false,
            tags: vec![],
        })
    }

    async fn get(&self, id: Id) -> DbResult<Todo> {
        let sql = format!("{} WHERE todos.id = ? ORDER BY tags.id", TODO_WITH_TAGS_SQL);
        let rows = sqlx::query(&sql)
            .bind(id)
            .fetch_all(self.pool)
            .await
            .map_err(db_error)?;

        fold_todo_rows(&rows)
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("Todo", id))
    }

    async fn list(&self) -> DbResult<Vec<Todo>> {
        let sql = format!("{} ORDER BY todos.id, tags.id", TODO_WITH_TAGS_SQL);
        let rows = sqlx::query(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(db_error)?;

        Ok(fold_todo_rows(&rows))
    }

    async fn update(&self, id: Id, patch: &TodoPatch) -> DbResult<Todo> {
        let mut fields: Vec<&str> = vec![];
        if patch.title.is_some() {
            fields.push("title = ?");
        }
        if patch.order.is_some() {
            fields.push("task_order = ?");
        }
        if patch.completed.is_some() {
            fields.push("completed = ?");
        }

        if fields.is_empty() {
            return Err(DbError::Validation {
                message: "No valid fields to update".to_string(),
            });
        }

        let sql = format!("UPDATE todos SET {} WHERE id = ?", fields.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(title) = &patch.title {
            query = query.bind(title);
        }
        if let Some(order) = patch.order {
            query = query.bind(order);
        }
        if let Some(completed) = patch.completed {
            query = query.bind(completed);
        }

        let result = query
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Todo", id));
        }

        // Associations are not reloaded here; callers get an untagged todo.
        let row = sqlx::query("SELECT id, title, task_order, completed FROM todos WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DbError::not_found("Todo", id))?;

        Ok(todo_from_row(&row))
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Todo", id));
        }

        Ok(())
    }

    async fn delete_all(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM todos")
            .execute(self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn add_tag(&self, todo_id: Id, tag_id: Id) -> DbResult<TodoTag> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let todo_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM todos WHERE id = ?)")
                .bind(todo_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error)?;
        if !todo_exists {
            return Err(DbError::not_found("Todo", todo_id));
        }

        let tag_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tags WHERE id = ?)")
                .bind(tag_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error)?;
        if !tag_exists {
            return Err(DbError::not_found("Tag", tag_id));
        }

        sqlx::query("INSERT OR IGNORE INTO todo_tags (todo_id, tag_id) VALUES (?, ?)")
            .bind(todo_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(TodoTag { todo_id, tag_id })
    }

    async fn remove_tag(&self, todo_id: Id, tag_id: Id) -> DbResult<()> {
        sqlx::query("DELETE FROM todo_tags WHERE todo_id = ? AND tag_id = ?")
            .bind(todo_id)
            .bind(tag_id)
            .execute(self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn remove_all_tags(&self, todo_id: Id) -> DbResult<()> {
        sqlx::query("DELETE FROM todo_tags WHERE todo_id = ?")
            .bind(todo_id)
            .execute(self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn get_tags(&self, todo_id: Id) -> DbResult<Vec<Tag>> {
        let rows = sqlx::query(
            "SELECT tags.id, tags.title FROM tags \
             INNER JOIN todo_tags ON tags.id = todo_tags.tag_id \
             WHERE todo_tags.todo_id = ? \
             ORDER BY tags.id",
        )
        .bind(todo_id)
        .fetch_all(self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.iter().map(tag_from_row).collect())
    }
}
