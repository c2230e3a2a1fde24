//! Traits used by the crate's data sources

use async_trait::async_trait;

use crate::error::Result;
use crate::task::{Task, TaskDraft, TaskId};
use crate::week::WeekKey;

/// The remote task API.
///
/// The API owns every task. Implementors only forward requests, they do not cache anything.
#[async_trait]
pub trait TaskSource {
    /// Check an admin password. Any error means the login failed
    async fn login(&self, password: &str) -> Result<()>;

    /// Provision a sandbox for a demo session, pre-filled for the given week
    async fn setup_demo(&self, session_id: &str, week_key: &WeekKey) -> Result<()>;

    /// Returns the tasks scheduled in a week, in no particular order
    async fn get_tasks(&self, week_key: &WeekKey, session_id: &str) -> Result<Vec<Task>>;

    /// Create a task in a week. Returns the task as created by the server
    async fn create_task(&self, draft: &TaskDraft, week_key: &WeekKey, session_id: &str) -> Result<Task>;

    /// Replace a task with `task`
    async fn update_task(&self, task: &Task, session_id: &str) -> Result<()>;

    /// Remove a task
    async fn delete_task(&self, id: TaskId) -> Result<()>;
}
