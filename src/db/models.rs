//! Domain models for the todo database.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application.

use serde::{Deserialize, Serialize};

/// Integer row id, generated by the store.
pub type Id = i64;

/// A todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Id,
    pub title: String,
    /// User-supplied sort hint.
    pub order: i64,
    pub completed: bool,
    /// Tags resolved through `todo_tags`. Empty when not loaded.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A tag that can be attached to any number of todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Id,
    pub title: String,
}

/// Input for creating a todo. New todos start out incomplete and untagged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTodo {
    pub title: String,
    pub order: i64,
}

/// Partial update for a todo. Only `Some` fields are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub order: Option<i64>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.order.is_none() && self.completed.is_none()
    }
}

/// A single todo/tag link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoTag {
    pub todo_id: Id,
    pub tag_id: Id,
}
