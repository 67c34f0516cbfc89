//! SQLite TagRepository implementation.

use sqlx::SqlitePool;

use super::helpers::{db_error, tag_from_row, todo_from_row};
use crate::db::{DbError, DbResult, Id, Tag, TagRepository, Todo};

/// SQLx-backed tag repository.
pub struct SqliteTagRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> TagRepository for SqliteTagRepository<'a> {
    async fn create(&self, title: &str) -> DbResult<Tag> {
        let result = sqlx::query("INSERT INTO tags (title) VALUES (?)")
            .bind(title)
            .execute(self.pool)
            .await
            .map_err(db_error)?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            title: title.to_string(),
        })
    }

    async fn get(&self, id: Id) -> DbResult<Tag> {
        let row = sqlx::query("SELECT id, title FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(db_error)?;

        row.as_ref()
            .map(tag_from_row)
            .ok_or_else(|| DbError::not_found("Tag", id))
    }

    async fn list(&self) -> DbResult<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, title FROM tags ORDER BY id")
            .fetch_all(self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.iter().map(tag_from_row).collect())
    }

    async fn update(&self, id: Id, title: &str) -> DbResult<Tag> {
        let result = sqlx::query("UPDATE tags SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Tag", id));
        }

        // Re-read so the response reflects what is stored; a concurrent
        // delete between the two statements still yields NotFound.
        self.get(id).await
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Tag", id));
        }

        // Cascade already covers this when foreign keys are enforced.
        sqlx::query("DELETE FROM todo_tags WHERE tag_id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn delete_all(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM tags")
            .execute(self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn get_todos(&self, tag_id: Id) -> DbResult<Vec<Todo>> {
        let rows = sqlx::query(
            "SELECT todos.id, todos.title, todos.task_order, todos.completed FROM todos \
             INNER JOIN todo_tags ON todos.id = todo_tags.todo_id \
             WHERE todo_tags.tag_id = ? \
             ORDER BY todos.id",
        )
        .bind(tag_id)
        .fetch_all(self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.iter().map(todo_from_row).collect())
    }
}
