//! This crate provides a client for a weekly task tracker.
//!
//! Tasks are scheduled in ISO weeks. The [`week`] module computes week keys (e.g. `2025-W01`) and week ranges, and
//! the [`picker`] module provides a year → month → week picker built on top of it.
//!
//! Tasks themselves live in a remote task API, reached through a [`TaskSource`](traits::TaskSource): usually a
//! [`Client`](client::Client), or a [`MockTaskApi`](mock_api::MockTaskApi) for tests and offline demos. \
//! An [`App`] ties a task source to a view state ([`AppState`](state::AppState)) and to the client-local
//! [`storage`] of the session.

pub mod traits;
pub mod error;
pub use error::{Error, Result};

pub mod week;
pub use week::{WeekKey, WeekRange};
pub mod picker;
pub mod task;
pub use task::{Task, TaskId, Priority, TaskDraft};
pub mod session;
pub use session::Session;

pub mod client;
pub mod storage;
pub mod mock_api;
pub mod mock_behaviour;

pub mod state;
pub mod feedback;
pub mod app;
pub use app::App;

pub mod config;
pub mod utils;
