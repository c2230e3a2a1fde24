//! This module provides a client to connect to the task API

use async_trait::async_trait;
use reqwest::Response;
use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};
use crate::task::{Priority, Task, TaskDraft, TaskId};
use crate::traits::TaskSource;
use crate::week::WeekKey;

#[derive(Serialize)]
struct LoginBody<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct DemoSetupBody<'a> {
    session_id: &'a str,
    week_key: &'a WeekKey,
}

#[derive(Serialize)]
struct NewTaskBody<'a> {
    name: &'a str,
    priority: Priority,
    notes: Option<&'a str>,
    week_key: &'a WeekKey,
    session_id: &'a str,
}

#[derive(Serialize)]
struct UpdateTaskBody<'a> {
    #[serde(flatten)]
    task: &'a Task,
    session_id: &'a str,
}


/// A task source that forwards every request to the task API over HTTP
#[derive(Clone, Debug)]
pub struct Client {
    url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self> {
        let mut url = Url::parse(url.as_ref())?;
        // Make sure endpoints are joined below the base path, not next to it
        if url.path().ends_with('/') == false {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the URL set in [`config::API_URL`](crate::config::API_URL)
    pub fn from_config() -> Result<Self> {
        Self::new(crate::config::api_url())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.url.join(path)?)
    }

    fn task_endpoint(&self, id: TaskId) -> Result<Url> {
        self.endpoint(&format!("api/tasks/{}", id))
    }
}

/// Turn non-2xx replies into errors
fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() == false {
        return Err(Error::UnexpectedStatus {
            status: response.status(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}

#[async_trait]
impl TaskSource for Client {
    async fn login(&self, password: &str) -> Result<()> {
        let response = self.http
            .post(self.endpoint("api/login")?)
            .json(&LoginBody { password })
            .send()
            .await?;
        check_status(response)?;
        log::info!("Logged in to {}", self.url);
        Ok(())
    }

    async fn setup_demo(&self, session_id: &str, week_key: &WeekKey) -> Result<()> {
        let response = self.http
            .post(self.endpoint("api/demo/setup")?)
            .json(&DemoSetupBody { session_id, week_key })
            .send()
            .await?;
        check_status(response)?;
        log::info!("Demo environment {} is ready", session_id);
        Ok(())
    }

    async fn get_tasks(&self, week_key: &WeekKey, session_id: &str) -> Result<Vec<Task>> {
        let week = week_key.to_string();
        let response = self.http
            .get(self.endpoint("api/tasks")?)
            .query(&[("week", week.as_str()), ("session_id", session_id)])
            .send()
            .await?;
        let tasks: Vec<Task> = check_status(response)?.json().await?;
        log::debug!("Fetched {} tasks for {}", tasks.len(), week_key);
        Ok(tasks)
    }

    async fn create_task(&self, draft: &TaskDraft, week_key: &WeekKey, session_id: &str) -> Result<Task> {
        let body = NewTaskBody {
            name: &draft.name,
            priority: draft.priority,
            notes: draft.notes.as_deref(),
            week_key,
            session_id,
        };
        let response = self.http
            .post(self.endpoint("api/tasks")?)
            .json(&body)
            .send()
            .await?;
        let task: Task = check_status(response)?.json().await?;
        log::debug!("Created task {} in {}", task.id(), week_key);
        Ok(task)
    }

    async fn update_task(&self, task: &Task, session_id: &str) -> Result<()> {
        let response = self.http
            .put(self.task_endpoint(task.id())?)
            .json(&UpdateTaskBody { task, session_id })
            .send()
            .await?;
        check_status(response)?;
        log::debug!("Updated task {}", task.id());
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        let response = self.http
            .delete(self.task_endpoint(id)?)
            .send()
            .await?;
        check_status(response)?;
        log::debug!("Deleted task {}", id);
        Ok(())
    }
}
