//! An in-memory task API, that can be used instead of a real server in tests or for offline demos

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ADMIN_SESSION_ID;
use crate::error::{Error, Result};
use crate::mock_behaviour::MockBehaviour;
use crate::task::{CompletionStatus, Priority, Task, TaskDraft, TaskId};
use crate::traits::TaskSource;
use crate::week::WeekKey;

#[derive(Default)]
struct MockData {
    /// Tasks, and the session they belong to
    tasks: Vec<(String, Task)>,
    next_id: u64,
    demo_sessions: HashSet<String>,
    /// Artificial delays for `get_tasks`, per week
    latencies: HashMap<WeekKey, Duration>,
}

/// A task API that lives in memory
pub struct MockTaskApi {
    password: String,
    data: Mutex<MockData>,
    behaviour: Arc<Mutex<MockBehaviour>>,
}

impl MockTaskApi {
    /// Create an empty API, that accepts `password` for admin logins
    pub fn new<S: ToString>(password: S) -> Self {
        Self {
            password: password.to_string(),
            data: Mutex::new(MockData { next_id: 1, ..MockData::default() }),
            behaviour: Arc::new(Mutex::new(MockBehaviour::new())),
        }
    }

    /// Create an API that will behave as described by `behaviour`
    pub fn with_behaviour<S: ToString>(password: S, behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        Self { behaviour, ..Self::new(password) }
    }

    /// The behaviour of this instance. It can be tweaked during a test
    pub fn behaviour(&self) -> Arc<Mutex<MockBehaviour>> {
        Arc::clone(&self.behaviour)
    }

    /// Delay every `get_tasks` for this week
    pub fn set_latency(&self, week_key: WeekKey, latency: Duration) {
        self.data.lock().unwrap().latencies.insert(week_key, latency);
    }

    /// Directly add a task, bypassing the mock behaviour
    pub fn insert_task(&self, session_id: &str, draft: &TaskDraft, week_key: WeekKey) -> Task {
        let mut data = self.data.lock().unwrap();
        insert(&mut data, session_id, draft, week_key)
    }

    /// Every task of a session, in insertion order
    pub fn tasks_of(&self, session_id: &str) -> Vec<Task> {
        self.data.lock().unwrap().tasks.iter()
            .filter(|(session, _)| session == session_id)
            .map(|(_, task)| task.clone())
            .collect()
    }

    pub fn has_demo_session(&self, session_id: &str) -> bool {
        self.data.lock().unwrap().demo_sessions.contains(session_id)
    }

    fn check_session(data: &MockData, session_id: &str) -> Result<()> {
        if session_id == ADMIN_SESSION_ID || data.demo_sessions.contains(session_id) {
            Ok(())
        } else {
            Err(Error::Other(format!("Unknown session {}", session_id)))
        }
    }
}

fn insert(data: &mut MockData, session_id: &str, draft: &TaskDraft, week_key: WeekKey) -> Task {
    let id = TaskId::from(data.next_id);
    data.next_id += 1;

    let task = Task::new(id, draft.name.clone(), draft.priority, draft.notes.clone(), CompletionStatus::Uncompleted, week_key);
    data.tasks.push((session_id.to_string(), task.clone()));
    task
}

/// The tasks a fresh demo environment starts with
fn demo_drafts() -> Vec<TaskDraft> {
    vec![
        TaskDraft::new("Try out the tracker", Priority::High).with_notes("Tick this task once you're done"),
        TaskDraft::new("Plan next week", Priority::Medium),
        TaskDraft::new("Water the plants", Priority::Low),
    ]
}

#[async_trait]
impl TaskSource for MockTaskApi {
    async fn login(&self, password: &str) -> Result<()> {
        self.behaviour.lock().unwrap().can_login()?;
        if password != self.password {
            return Err(Error::Other("Wrong password".to_string()));
        }
        Ok(())
    }

    async fn setup_demo(&self, session_id: &str, week_key: &WeekKey) -> Result<()> {
        self.behaviour.lock().unwrap().can_setup_demo()?;
        let mut data = self.data.lock().unwrap();
        data.demo_sessions.insert(session_id.to_string());
        for draft in demo_drafts() {
            insert(&mut data, session_id, &draft, *week_key);
        }
        Ok(())
    }

    async fn get_tasks(&self, week_key: &WeekKey, session_id: &str) -> Result<Vec<Task>> {
        self.behaviour.lock().unwrap().can_get_tasks()?;

        let latency = self.data.lock().unwrap().latencies.get(week_key).cloned();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let data = self.data.lock().unwrap();
        Self::check_session(&data, session_id)?;
        Ok(data.tasks.iter()
            .filter(|(session, task)| session == session_id && task.week_key() == week_key)
            .map(|(_, task)| task.clone())
            .collect())
    }

    async fn create_task(&self, draft: &TaskDraft, week_key: &WeekKey, session_id: &str) -> Result<Task> {
        self.behaviour.lock().unwrap().can_create_task()?;
        let mut data = self.data.lock().unwrap();
        Self::check_session(&data, session_id)?;
        Ok(insert(&mut data, session_id, draft, *week_key))
    }

    async fn update_task(&self, task: &Task, session_id: &str) -> Result<()> {
        self.behaviour.lock().unwrap().can_update_task()?;
        let mut data = self.data.lock().unwrap();
        Self::check_session(&data, session_id)?;
        match data.tasks.iter_mut().find(|(_, t)| t.id() == task.id()) {
            None => Err(Error::UnknownTask(task.id())),
            Some((_, stored)) => {
                *stored = task.clone();
                Ok(())
            }
        }
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.behaviour.lock().unwrap().can_delete_task()?;
        let mut data = self.data.lock().unwrap();
        let count_before = data.tasks.len();
        data.tasks.retain(|(_, t)| t.id() != id);
        if data.tasks.len() == count_before {
            return Err(Error::UnknownTask(id));
        }
        Ok(())
    }
}
