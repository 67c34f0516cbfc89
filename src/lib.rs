//! Todo list with tag annotations over a REST API, backed by SQLite.
//!
//! - [`db`]: storage traits and the SQLite implementation
//! - [`api`]: axum router, handlers and server loop

pub mod api;
pub mod db;
