//! The view state of the tracker, and the events that change it
//!
//! [`AppState`] is plain data: every change goes through [`AppState::apply`], which makes it easy to render and to test.
//! Network calls are done by [`App`](crate::app::App), that feeds their outcomes back as [`AppEvent`]s.

use chrono::NaiveDate;

use crate::feedback::Notice;
use crate::picker::WeekPicker;
use crate::session::Session;
use crate::task::{sort_tasks, Task, TaskDraft, TaskId};
use crate::week::{week_key, week_range, WeekKey, WeekRange};

/// Which way the last navigation went (front-ends use it to animate the task list)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Still,
    Forward,
}

/// Identifies a refresh of the task list. Only the latest one may update the list
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchToken(u64);

impl FetchToken {
    pub fn as_u64(&self) -> u64 { self.0 }
}

/// Everything needed to fetch the task list
#[derive(Clone, Debug, PartialEq)]
pub struct FetchRequest {
    pub token: FetchToken,
    pub week_key: WeekKey,
    pub session_id: String,
}

/// The task editor modal
#[derive(Clone, Debug, PartialEq)]
pub struct Editor {
    /// The task being edited, or `None` for a new task
    pub editing: Option<Task>,
    /// The initial content of the form
    pub draft: TaskDraft,
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    LoginStarted,
    LoginFailed,
    DemoSetupFailed,
    SessionStarted(Session),
    SessionEnded,
    DateChanged { date: NaiveDate, direction: Direction },
    TasksLoaded { token: FetchToken, tasks: Vec<Task> },
    FetchFailed { token: FetchToken },
    EditorOpened(Option<Task>),
    EditorClosed,
    DeleteRequested(Task),
    DeleteCancelled,
    /// Optimistic removal, before the server confirms it
    TaskRemoved(TaskId),
    /// Optimistic completion toggle, before the server confirms it
    CompletionToggled(TaskId),
    PickerOpened,
    PickerClosed,
    PickerShowYears,
    PickerShowMonths,
    PickerYearSelected(i32),
    PickerMonthSelected(u32),
}

#[derive(Clone, Debug)]
pub struct AppState {
    session: Option<Session>,
    current_date: NaiveDate,
    current_week_key: WeekKey,
    direction: Direction,
    tasks: Vec<Task>,

    is_logging_in: bool,
    login_error: Option<String>,

    editor: Option<Editor>,
    task_to_delete: Option<Task>,
    picker: Option<WeekPicker>,

    latest_fetch: FetchToken,
}

impl AppState {
    /// The state of a freshly started app, displaying the week of `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            session: None,
            current_date: today,
            current_week_key: week_key(today),
            direction: Direction::Still,
            tasks: Vec::new(),
            is_logging_in: false,
            login_error: None,
            editor: None,
            task_to_delete: None,
            picker: None,
            latest_fetch: FetchToken(0),
        }
    }

    pub fn session(&self) -> Option<&Session>        { self.session.as_ref() }
    pub fn current_date(&self) -> NaiveDate          { self.current_date }
    pub fn current_week_key(&self) -> &WeekKey       { &self.current_week_key }
    pub fn current_week(&self) -> WeekRange          { week_range(self.current_date) }
    pub fn direction(&self) -> Direction             { self.direction }
    pub fn tasks(&self) -> &[Task]                   { &self.tasks }
    pub fn is_logging_in(&self) -> bool              { self.is_logging_in }
    pub fn login_error(&self) -> Option<&str>        { self.login_error.as_deref() }
    pub fn editor(&self) -> Option<&Editor>          { self.editor.as_ref() }
    pub fn task_to_delete(&self) -> Option<&Task>    { self.task_to_delete.as_ref() }
    pub fn picker(&self) -> Option<&WeekPicker>      { self.picker.as_ref() }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// Start a new refresh of the task list. This supersedes every previous refresh.
    ///
    /// Returns `None` when there is no session to fetch tasks for
    pub fn begin_fetch(&mut self) -> Option<FetchRequest> {
        let session_id = self.session.as_ref()?.id().to_string();
        self.latest_fetch = FetchToken(self.latest_fetch.0 + 1);
        Some(FetchRequest {
            token: self.latest_fetch,
            week_key: self.current_week_key,
            session_id,
        })
    }

    /// Whether a newer refresh has been started after this one, or the session has ended since
    pub fn is_superseded(&self, token: FetchToken) -> bool {
        token != self.latest_fetch
    }

    /// The token of the latest refresh, or of the latest session end
    pub fn latest_fetch(&self) -> FetchToken {
        self.latest_fetch
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoginStarted => {
                self.is_logging_in = true;
                self.login_error = None;
            },
            AppEvent::LoginFailed => {
                self.is_logging_in = false;
                self.login_error = Some(Notice::LoginFailed.to_string());
            },
            AppEvent::DemoSetupFailed => {
                self.is_logging_in = false;
            },
            AppEvent::SessionStarted(session) => {
                log::info!("Starting {}", session);
                self.session = Some(session);
                self.is_logging_in = false;
                self.login_error = None;
                self.tasks.clear();
            },
            AppEvent::SessionEnded => {
                // Whatever is still being fetched belongs to the old session
                self.latest_fetch = FetchToken(self.latest_fetch.0 + 1);
                self.session = None;
                self.tasks.clear();
                self.editor = None;
                self.task_to_delete = None;
                self.picker = None;
            },
            AppEvent::DateChanged{ date, direction } => {
                self.current_date = date;
                self.current_week_key = week_key(date);
                self.direction = direction;
            },
            AppEvent::TasksLoaded{ token, mut tasks } => {
                if self.is_superseded(token) {
                    log::debug!("Ignoring tasks of superseded fetch #{}", token.0);
                    return;
                }
                sort_tasks(&mut tasks);
                self.tasks = tasks;
            },
            AppEvent::FetchFailed{ token } => {
                log::debug!("Fetch #{} failed, keeping the current list", token.0);
            },
            AppEvent::EditorOpened(task) => {
                let draft = task.as_ref().map(TaskDraft::from).unwrap_or_default();
                self.editor = Some(Editor { editing: task, draft });
            },
            AppEvent::EditorClosed => {
                self.editor = None;
            },
            AppEvent::DeleteRequested(task) => {
                self.task_to_delete = Some(task);
            },
            AppEvent::DeleteCancelled => {
                self.task_to_delete = None;
            },
            AppEvent::TaskRemoved(id) => {
                self.tasks.retain(|t| t.id() != id);
                self.task_to_delete = None;
            },
            AppEvent::CompletionToggled(id) => {
                let viewed_week = self.current_week_key;
                match self.tasks.iter_mut().find(|t| t.id() == id) {
                    None => log::warn!("Cannot toggle unknown task {}", id),
                    Some(task) => {
                        task.toggle_completion(viewed_week);
                        sort_tasks(&mut self.tasks);
                    },
                }
            },
            AppEvent::PickerOpened => {
                self.picker = Some(WeekPicker::open(self.current_date));
            },
            AppEvent::PickerClosed => {
                self.picker = None;
            },
            AppEvent::PickerShowYears => {
                self.picker.as_mut().map(|p| p.show_years());
            },
            AppEvent::PickerShowMonths => {
                self.picker.as_mut().map(|p| p.show_months());
            },
            AppEvent::PickerYearSelected(year) => {
                self.picker.as_mut().map(|p| p.select_year(year));
            },
            AppEvent::PickerMonthSelected(month) => {
                if let Some(picker) = self.picker.as_mut() {
                    if let Err(err) = picker.select_month(month) {
                        log::warn!("{}", err);
                    }
                }
            },
        }
    }
}
