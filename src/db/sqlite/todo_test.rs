//! Tests for SqliteTodoRepository.

use crate::db::{
    Database, DbError, NewTodo, SqliteDatabase, TagRepository, TodoPatch, TodoRepository,
};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

fn new_todo(title: &str, order: i64) -> NewTodo {
    NewTodo {
        title: title.to_string(),
        order,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn create_and_get_todo() {
    let db = setup_db().await;
    let repo = db.todos();

    let created = repo
        .create(&new_todo("Walk the dog", 3))
        .await
        .expect("Create should succeed");
    assert!(created.id > 0);
    assert!(!created.completed);
    assert!(created.tags.is_empty());

    let retrieved = repo.get(created.id).await.expect("Get should succeed");
    assert_eq!(retrieved, created);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_nonexistent_todo_returns_not_found() {
    let db = setup_db().await;

    let result = db.todos().get(404).await;
    assert!(matches!(result, Err(DbError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_todos_includes_tags() {
    let db = setup_db().await;
    let todos = db.todos();

    let first = todos.create(&new_todo("First", 0)).await.unwrap();
    let second = todos.create(&new_todo("Second", 1)).await.unwrap();
    let tag = db.tags().create("home").await.unwrap();
    todos.add_tag(second.id, tag.id).await.unwrap();

    let listed = todos.list().await.expect("List should succeed");
    assert_eq!(listed.len(), 2);

    let first_listed = listed.iter().find(|t| t.id == first.id).unwrap();
    assert!(first_listed.tags.is_empty());

    let second_listed = listed.iter().find(|t| t.id == second.id).unwrap();
    assert_eq!(second_listed.tags, vec![tag]);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_writes_only_supplied_fields() {
    let db = setup_db().await;
    let repo = db.todos();

    let created = repo.create(&new_todo("Original", 5)).await.unwrap();

    let updated = repo
        .update(
            created.id,
            &TodoPatch {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("Update should succeed");

    assert!(updated.completed);
    assert_eq!(updated.title, "Original");
    assert_eq!(updated.order, 5);

    let updated = repo
        .update(
            created.id,
            &TodoPatch {
                title: Some("Renamed".to_string()),
                order: Some(9),
                ..Default::default()
            },
        )
        .await
        .expect("Update should succeed");

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.order, 9);
    assert!(updated.completed);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_returns_todo_without_tags() {
    let db = setup_db().await;
    let todo = db.todos().create(&new_todo("Tagged", 0)).await.unwrap();
    let tag = db.tags().create("errand").await.unwrap();
    db.todos().add_tag(todo.id, tag.id).await.unwrap();

    let updated = db
        .todos()
        .update(
            todo.id,
            &TodoPatch {
                order: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // The association still exists, but update does not reload it.
    assert!(updated.tags.is_empty());
    assert_eq!(db.todos().get(todo.id).await.unwrap().tags, vec![tag]);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_with_empty_patch_is_validation_error() {
    let db = setup_db().await;
    let created = db.todos().create(&new_todo("Unchanged", 0)).await.unwrap();

    let result = db.todos().update(created.id, &TodoPatch::default()).await;
    assert!(matches!(result, Err(DbError::Validation { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_nonexistent_todo_returns_not_found() {
    let db = setup_db().await;

    let result = db
        .todos()
        .update(
            77,
            &TodoPatch {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(DbError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_todo() {
    let db = setup_db().await;
    let repo = db.todos();

    let created = repo.create(&new_todo("Temporary", 0)).await.unwrap();
    repo.delete(created.id).await.expect("Delete should succeed");

    assert!(matches!(
        repo.get(created.id).await,
        Err(DbError::NotFound { .. })
    ));
    assert!(matches!(
        repo.delete(created.id).await,
        Err(DbError::NotFound { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_all_todos() {
    let db = setup_db().await;
    let repo = db.todos();

    repo.create(&new_todo("One", 0)).await.unwrap();
    repo.create(&new_todo("Two", 0)).await.unwrap();

    repo.delete_all().await.expect("Delete all should succeed");
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn add_tag_requires_both_sides() {
    let db = setup_db().await;
    let todo = db.todos().create(&new_todo("Lonely", 0)).await.unwrap();
    let tag = db.tags().create("orphan").await.unwrap();

    let missing_tag = db.todos().add_tag(todo.id, tag.id + 100).await;
    assert!(matches!(
        missing_tag,
        Err(DbError::NotFound { ref entity_type, .. }) if entity_type == "Tag"
    ));

    let missing_todo = db.todos().add_tag(todo.id + 100, tag.id).await;
    assert!(matches!(
        missing_todo,
        Err(DbError::NotFound { ref entity_type, .. }) if entity_type == "Todo"
    ));

    assert!(db.todos().get_tags(todo.id).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn add_tag_twice_is_noop() {
    let db = setup_db().await;
    let todo = db.todos().create(&new_todo("Repeat", 0)).await.unwrap();
    let tag = db.tags().create("again").await.unwrap();

    let link = db.todos().add_tag(todo.id, tag.id).await.unwrap();
    assert_eq!(link.todo_id, todo.id);
    assert_eq!(link.tag_id, tag.id);

    db.todos()
        .add_tag(todo.id, tag.id)
        .await
        .expect("Duplicate link should not fail");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo_tags")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(db.todos().get_tags(todo.id).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_tag_is_lenient() {
    let db = setup_db().await;
    let todo = db.todos().create(&new_todo("Untag me", 0)).await.unwrap();
    let keep = db.tags().create("keep").await.unwrap();
    let gone = db.tags().create("gone").await.unwrap();
    db.todos().add_tag(todo.id, keep.id).await.unwrap();
    db.todos().add_tag(todo.id, gone.id).await.unwrap();

    db.todos()
        .remove_tag(todo.id, gone.id)
        .await
        .expect("Remove should succeed");
    db.todos()
        .remove_tag(todo.id, gone.id)
        .await
        .expect("Removing a missing link should still succeed");
    db.todos()
        .remove_tag(9999, 9999)
        .await
        .expect("Removing from unknown ids should still succeed");

    assert_eq!(db.todos().get_tags(todo.id).await.unwrap(), vec![keep]);
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_all_tags_clears_links_only() {
    let db = setup_db().await;
    let todo = db.todos().create(&new_todo("Clear", 0)).await.unwrap();
    let a = db.tags().create("a").await.unwrap();
    let b = db.tags().create("b").await.unwrap();
    db.todos().add_tag(todo.id, a.id).await.unwrap();
    db.todos().add_tag(todo.id, b.id).await.unwrap();

    db.todos()
        .remove_all_tags(todo.id)
        .await
        .expect("Remove all should succeed");

    assert!(db.todos().get_tags(todo.id).await.unwrap().is_empty());
    assert_eq!(db.tags().list().await.unwrap().len(), 2);
    assert!(db.todos().get(todo.id).await.is_ok());
}
