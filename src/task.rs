//! To-do tasks, as served by the task API

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use csscolorparser::Color;

use crate::week::WeekKey;

/// The identifier the task API gave to a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl TaskId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// Sort rank: high priorities come first
    fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// The color tasks of this priority are displayed with
    pub fn color(&self) -> Color {
        match self {
            Priority::High => Color::from_rgb_u8(0xef, 0x44, 0x44),
            Priority::Medium => Color::from_rgb_u8(0xea, 0xb3, 0x08),
            Priority::Low => Color::from_rgb_u8(0x22, 0xc5, 0x5e),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}


/// The API describes completion with two fields (`completed` and `completed_week_key`), yet some combinations make no sense.
/// This enum provides an API that forbids them: a week of completion only exists for completed tasks.
#[derive(Clone, Debug, PartialEq)]
pub enum CompletionStatus {
    /// Completed, during the given week (if known)
    Completed(Option<WeekKey>),
    Uncompleted,
}
impl CompletionStatus {
    pub fn is_completed(&self) -> bool {
        match self {
            CompletionStatus::Completed(_) => true,
            _ => false,
        }
    }

    pub fn completed_week_key(&self) -> Option<&WeekKey> {
        match self {
            CompletionStatus::Completed(key) => key.as_ref(),
            CompletionStatus::Uncompleted => None,
        }
    }
}


/// The flat representation of a task, as exchanged with the API
#[derive(Clone, Debug, Serialize, Deserialize)]
struct TaskRecord {
    id: TaskId,
    name: String,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    completed: bool,
    week_key: WeekKey,
    #[serde(default)]
    completed_week_key: Option<WeekKey>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        let completion_status = match (record.completed, record.completed_week_key) {
            (true, key) => CompletionStatus::Completed(key),
            (false, Some(key)) => {
                log::debug!("Task {} is not completed but has a completion week ({}). Ignoring it", record.id, key);
                CompletionStatus::Uncompleted
            },
            (false, None) => CompletionStatus::Uncompleted,
        };

        Task {
            id: record.id,
            name: record.name,
            priority: record.priority,
            notes: record.notes,
            completion_status,
            week_key: record.week_key,
        }
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        TaskRecord {
            id: task.id,
            completed: task.completed(),
            completed_week_key: task.completion_status.completed_week_key().cloned(),
            name: task.name,
            priority: task.priority,
            notes: task.notes,
            week_key: task.week_key,
        }
    }
}


/// A to-do task, scheduled in a given week
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    id: TaskId,
    name: String,
    priority: Priority,
    notes: Option<String>,
    completion_status: CompletionStatus,
    /// The week this task is scheduled in
    week_key: WeekKey,
}

impl Task {
    /// Create a Task instance, as it exists on the server
    pub fn new(id: TaskId, name: String, priority: Priority, notes: Option<String>,
               completion_status: CompletionStatus, week_key: WeekKey) -> Self
    {
        Self { id, name, priority, notes, completion_status, week_key }
    }

    pub fn id(&self) -> TaskId            { self.id }
    pub fn name(&self) -> &str            { &self.name }
    pub fn priority(&self) -> Priority    { self.priority }
    pub fn notes(&self) -> Option<&str>   { self.notes.as_deref() }
    pub fn week_key(&self) -> &WeekKey    { &self.week_key }
    pub fn completed(&self) -> bool       { self.completion_status.is_completed() }
    pub fn completion_status(&self) -> &CompletionStatus { &self.completion_status }
    pub fn completed_week_key(&self) -> Option<&WeekKey> { self.completion_status.completed_week_key() }

    /// Set the completion status
    pub fn set_completion_status(&mut self, new_completion_status: CompletionStatus) {
        self.completion_status = new_completion_status;
    }

    /// Flip the completion status.
    ///
    /// A task completed this way records `viewed_week` as its week of completion. Uncompleting clears it.
    pub fn toggle_completion(&mut self, viewed_week: WeekKey) {
        let new_status = match self.completed() {
            true => CompletionStatus::Uncompleted,
            false => CompletionStatus::Completed(Some(viewed_week)),
        };
        self.set_completion_status(new_status);
    }

    /// Overwrite the user-editable fields with the ones of a draft
    pub fn apply_draft(&mut self, draft: &TaskDraft) {
        self.name = draft.name.clone();
        self.priority = draft.priority;
        self.notes = draft.notes.clone();
    }

    /// The order tasks are displayed in: incomplete tasks first, then by priority
    pub fn display_order(&self, other: &Task) -> Ordering {
        self.completed().cmp(&other.completed())
            .then_with(|| self.priority.rank().cmp(&other.priority.rank()))
    }
}

/// Sort tasks in display order (see [`Task::display_order`]). The sort is stable.
pub fn sort_tasks(tasks: &mut Vec<Task>) {
    tasks.sort_by(|a, b| a.display_order(b));
}


/// The fields a user fills in the task editor
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub priority: Priority,
    pub notes: Option<String>,
}

impl TaskDraft {
    pub fn new<S: ToString>(name: S, priority: Priority) -> Self {
        Self { name: name.to_string(), priority, notes: None }
    }

    pub fn with_notes<S: ToString>(mut self, notes: S) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            priority: task.priority,
            notes: task.notes.clone(),
        }
    }
}
