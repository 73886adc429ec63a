//! Terminal task list with a persistent local store.
//!
//! Tasks are held by a [`registry::TaskRegistry`], written back to a
//! [`storage::TaskStore`] after every change, and shown through a pure
//! [`view`] projection. User intents arrive as [`context::Action`] values.

pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod registry;
pub mod storage;
pub mod tui;
pub mod view;
