//! Tests for domain models.

use crate::db::{Tag, Todo, TodoPatch};

#[test]
fn todo_patch_default_is_empty() {
    assert!(TodoPatch::default().is_empty());
}

#[test]
fn todo_patch_with_any_field_is_not_empty() {
    let patch = TodoPatch {
        completed: Some(false),
        ..Default::default()
    };
    assert!(!patch.is_empty());

    let patch = TodoPatch {
        order: Some(0),
        ..Default::default()
    };
    assert!(!patch.is_empty());
}

#[test]
fn todo_deserializes_without_tags() {
    let todo: Todo =
        serde_json::from_str(r#"{"id":1,"title":"Buy milk","order":2,"completed":false}"#)
            .expect("Todo should deserialize");
    assert_eq!(todo.title, "Buy milk");
    assert_eq!(todo.order, 2);
    assert!(todo.tags.is_empty());
}

#[test]
fn todo_serializes_tags_inline() {
    let todo = Todo {
        id: 3,
        title: "Write report".to_string(),
        order: 0,
        completed: true,
        tags: vec![Tag {
            id: 9,
            title: "work".to_string(),
        }],
    };
    let value = serde_json::to_value(&todo).expect("Todo should serialize");
    assert_eq!(value["tags"][0]["title"], "work");
    assert_eq!(value["completed"], true);
}
