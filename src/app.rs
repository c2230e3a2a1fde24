//! The tracker application: view state, local storage and a task source, wired together
//!
//! Every user action is an async method of [`App`]. Each one updates the [`AppState`] through [`AppEvent`]s, and talks
//! to the [`TaskSource`] when needed.
//!
//! Deleting a task and toggling its completion are optimistic: the local list is updated first, and the current week
//! is fetched again in case the server refuses the change.

use std::convert::TryFrom;
use std::sync::Mutex;

use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::feedback::{Feedback, FeedbackSender, Notice};
use crate::session::{random_demo_id, Session};
use crate::state::{AppEvent, AppState, Direction, FetchToken};
use crate::storage::LocalStore;
use crate::task::{TaskDraft, Task, TaskId};
use crate::traits::TaskSource;
use crate::week::{week_key, WeekRange};

/// The tracker application
pub struct App<S: TaskSource> {
    source: S,
    store: Mutex<LocalStore>,
    state: Mutex<AppState>,
    /// The token of the latest refresh. Older refreshes watch it to know when to give up
    latest_fetch: watch::Sender<u64>,
    feedback: Feedback,
}

impl<S: TaskSource> App<S> {
    /// Create an app, displaying the week of `today`
    pub fn new(source: S, store: LocalStore, today: NaiveDate) -> Self {
        Self::new_with_feedback(source, store, today, Feedback::new())
    }

    /// Create an app that sends its [`Notice`]s to `channel`
    pub fn new_with_feedback_channel(source: S, store: LocalStore, today: NaiveDate, channel: FeedbackSender) -> Self {
        Self::new_with_feedback(source, store, today, Feedback::new_with_feedback_channel(channel))
    }

    fn new_with_feedback(source: S, store: LocalStore, today: NaiveDate, feedback: Feedback) -> Self {
        let (latest_fetch, _) = watch::channel(0);
        Self {
            source,
            store: Mutex::new(store),
            state: Mutex::new(AppState::new(today)),
            latest_fetch,
            feedback,
        }
    }

    /// A snapshot of the current state
    pub fn state(&self) -> AppState {
        self.state.lock().unwrap().clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn dispatch(&self, event: AppEvent) {
        self.state.lock().unwrap().apply(event);
    }

    fn session_id(&self) -> Result<String> {
        self.state.lock().unwrap()
            .session()
            .map(|s| s.id().to_string())
            .ok_or(Error::NoSession)
    }

    /// Restore the previous session (if any), and load its tasks
    pub async fn bootstrap(&self) -> Option<Session> {
        let session = self.store.lock().unwrap().restore(Utc::now());
        if let Some(session) = &session {
            self.dispatch(AppEvent::SessionStarted(session.clone()));
            self.refresh().await;
        }
        session
    }

    /// Log in with the admin password.
    ///
    /// Any failure (wrong password or unreachable server) is reported as an incorrect password
    pub async fn login(&self, password: &str) -> Result<()> {
        self.dispatch(AppEvent::LoginStarted);
        self.feedback.clear();

        if let Err(err) = self.source.login(password).await {
            log::info!("Login failed: {}", err);
            self.dispatch(AppEvent::LoginFailed);
            self.feedback.warn(Notice::LoginFailed);
            return Err(err);
        }

        let session = Session::admin_from(Utc::now());
        if let Some(expiry) = session.expiry() {
            if let Err(err) = self.store.lock().unwrap().save_admin(expiry) {
                log::warn!("Unable to persist the admin session: {}", err);
            }
        }
        self.dispatch(AppEvent::SessionStarted(session));
        self.refresh().await;
        Ok(())
    }

    /// Start a demo session in a fresh sandbox. A failure is not retried
    pub async fn start_demo(&self) -> Result<()> {
        self.dispatch(AppEvent::LoginStarted);
        self.feedback.clear();

        let id = random_demo_id();
        let this_week = week_key(crate::utils::today());
        if let Err(err) = self.source.setup_demo(&id, &this_week).await {
            log::info!("Demo setup failed: {}", err);
            self.dispatch(AppEvent::DemoSetupFailed);
            self.feedback.error(Notice::DemoSetupFailed);
            return Err(err);
        }

        self.store.lock().unwrap().set_demo(id.clone());
        self.dispatch(AppEvent::SessionStarted(Session::Demo { id }));
        self.refresh().await;
        Ok(())
    }

    /// Leave the demo session
    pub fn logout_demo(&self) {
        let is_demo = self.state.lock().unwrap().session().map(|s| s.is_demo()).unwrap_or(false);
        if is_demo == false {
            log::warn!("Not in a demo session, ignoring logout");
            return;
        }
        self.store.lock().unwrap().clear_demo();

        let mut state = self.state.lock().unwrap();
        state.apply(AppEvent::SessionEnded);
        // Stop the refresh that may still be running for this session
        self.latest_fetch.send_replace(state.latest_fetch().as_u64());
    }

    /// Move the displayed date by `days`, and load the tasks of its week.
    ///
    /// Fails without moving when the new date cannot be represented
    pub async fn change_week(&self, days: i64) -> Result<()> {
        let current = self.state.lock().unwrap().current_date();
        let date = i32::try_from(days).ok()
            .and_then(|days| current.checked_add_signed(Duration::days(i64::from(days))))
            .ok_or(Error::DateOutOfRange { date: current, days })?;
        let direction = match days {
            d if d > 0 => Direction::Forward,
            d if d < 0 => Direction::Backward,
            _ => Direction::Still,
        };
        self.dispatch(AppEvent::DateChanged { date, direction });
        self.refresh().await;
        Ok(())
    }

    pub async fn next_week(&self) -> Result<()> {
        self.change_week(7).await
    }

    pub async fn previous_week(&self) -> Result<()> {
        self.change_week(-7).await
    }

    /// Display another date, and load the tasks of its week
    pub async fn set_absolute_date(&self, date: NaiveDate) {
        self.dispatch(AppEvent::DateChanged { date, direction: Direction::Still });
        self.refresh().await;
    }

    /// Fetch the tasks of the displayed week.
    ///
    /// A refresh is abandoned as soon as a newer one starts, so that the latest navigation always wins.
    /// Failures are logged, and leave the current list untouched.
    pub async fn refresh(&self) {
        let (request, mut newer_fetches) = {
            let mut state = self.state.lock().unwrap();
            let request = match state.begin_fetch() {
                None => return,
                Some(request) => request,
            };
            self.latest_fetch.send_replace(request.token.as_u64());
            (request, self.latest_fetch.subscribe())
        };

        let fetch = self.source.get_tasks(&request.week_key, &request.session_id);
        tokio::select! {
            result = fetch => {
                match result {
                    Ok(tasks) => self.dispatch(AppEvent::TasksLoaded { token: request.token, tasks }),
                    Err(err) => {
                        log::error!("Unable to fetch the tasks of {}: {}", request.week_key, err);
                        self.dispatch(AppEvent::FetchFailed { token: request.token });
                    },
                }
            },
            _ = superseded(&mut newer_fetches, request.token) => {
                log::debug!("Fetch #{} of {} has been superseded", request.token.as_u64(), request.week_key);
            },
        }
    }

    /// Open the task editor, for an existing task or for a new one
    pub fn open_editor(&self, task: Option<Task>) {
        self.dispatch(AppEvent::EditorOpened(task));
    }

    pub fn close_editor(&self) {
        self.dispatch(AppEvent::EditorClosed);
    }

    /// Save the content of the editor: update the edited task, or create a new one in the displayed week.
    ///
    /// On success the editor closes and the week is fetched again. On failure the editor stays open.
    pub async fn save_task(&self, draft: TaskDraft) -> Result<()> {
        if draft.name.trim().is_empty() {
            return Err(Error::InvalidDraft("a task needs a name"));
        }
        let session_id = self.session_id()?;
        let (editing, week) = {
            let state = self.state.lock().unwrap();
            // Start from the latest known version of the task, not from the one the editor was opened with
            let editing = state.editor()
                .and_then(|e| e.editing.as_ref())
                .map(|task| state.task(task.id()).unwrap_or(task).clone());
            (editing, *state.current_week_key())
        };

        let result = match editing {
            Some(mut task) => {
                task.apply_draft(&draft);
                self.source.update_task(&task, &session_id).await
            },
            None => self.source.create_task(&draft, &week, &session_id).await.map(|_| ()),
        };

        match result {
            Err(err) => {
                self.feedback.error(Notice::SaveFailed { details: err.to_string() });
                Err(err)
            },
            Ok(()) => {
                self.dispatch(AppEvent::EditorClosed);
                self.refresh().await;
                Ok(())
            },
        }
    }

    /// Ask for a confirmation before deleting a task
    pub fn request_delete(&self, task: Task) {
        self.dispatch(AppEvent::DeleteRequested(task));
    }

    pub fn cancel_delete(&self) {
        self.dispatch(AppEvent::DeleteCancelled);
    }

    /// Delete the task that is waiting for a confirmation (if any)
    pub async fn confirm_delete(&self) -> Result<()> {
        let task_id = match self.state.lock().unwrap().task_to_delete() {
            None => return Ok(()),
            Some(task) => task.id(),
        };

        self.dispatch(AppEvent::TaskRemoved(task_id));
        if let Err(err) = self.source.delete_task(task_id).await {
            self.revert(&err).await;
            return Err(err);
        }
        Ok(())
    }

    /// Mark a task as completed (during the displayed week), or as not completed
    pub async fn toggle_complete(&self, task_id: TaskId) -> Result<()> {
        let session_id = self.session_id()?;
        let updated = {
            let mut state = self.state.lock().unwrap();
            if state.task(task_id).is_none() {
                return Err(Error::UnknownTask(task_id));
            }
            state.apply(AppEvent::CompletionToggled(task_id));
            state.task(task_id).cloned()
        };
        let updated = updated.ok_or(Error::UnknownTask(task_id))?;

        if let Err(err) = self.source.update_task(&updated, &session_id).await {
            self.revert(&err).await;
            return Err(err);
        }
        Ok(())
    }

    /// An optimistic change has been refused: get the list from the server again
    async fn revert(&self, err: &Error) {
        self.feedback.warn(Notice::ChangeReverted { details: err.to_string() });
        self.refresh().await;
    }

    /// Open the week picker on the displayed month
    pub fn open_picker(&self) {
        self.dispatch(AppEvent::PickerOpened);
    }

    pub fn close_picker(&self) {
        self.dispatch(AppEvent::PickerClosed);
    }

    pub fn picker_show_years(&self) {
        self.dispatch(AppEvent::PickerShowYears);
    }

    pub fn picker_show_months(&self) {
        self.dispatch(AppEvent::PickerShowMonths);
    }

    pub fn picker_select_year(&self, year: i32) {
        self.dispatch(AppEvent::PickerYearSelected(year));
    }

    /// Select a month (1 = January)
    pub fn picker_select_month(&self, month: u32) -> Result<()> {
        if month == 0 || month > 12 {
            return Err(Error::InvalidMonth(month));
        }
        self.dispatch(AppEvent::PickerMonthSelected(month));
        Ok(())
    }

    /// Jump to a week offered by the picker, and close it
    pub async fn picker_select_week(&self, week: &WeekRange) -> Result<()> {
        let monday = self.state.lock().unwrap()
            .picker()
            .and_then(|picker| picker.select_week(week));
        let monday = match monday {
            None => return Err(Error::Other(format!("Week {} is not offered by the picker", week.label()))),
            Some(monday) => monday,
        };

        self.dispatch(AppEvent::PickerClosed);
        self.set_absolute_date(monday).await;
        Ok(())
    }
}

/// Resolves once a refresh newer than `token` has started
async fn superseded(newer_fetches: &mut watch::Receiver<u64>, token: FetchToken) {
    loop {
        if newer_fetches.changed().await.is_err() {
            // The app is gone, nothing can supersede this fetch anymore
            std::future::pending::<()>().await;
        }
        if *newer_fetches.borrow() != token.as_u64() {
            return;
        }
    }
}
