//! Tests of the tracker application, against a mocked task API

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use url::Url;

use week_tracker::App;
use week_tracker::feedback::{feedback_channel, Notice};
use week_tracker::mock_api::MockTaskApi;
use week_tracker::mock_behaviour::MockBehaviour;
use week_tracker::picker::PickerView;
use week_tracker::storage::LocalStore;
use week_tracker::task::{Priority, TaskDraft};
use week_tracker::week::{week_key, WeekKey};
use week_tracker::Session;

const PASSWORD: &str = "correct horse";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn key(s: &str) -> WeekKey {
    s.parse().unwrap()
}

fn temp_folder() -> PathBuf {
    std::env::temp_dir().join(format!("week-tracker-tests-{}", uuid::Uuid::new_v4()))
}

fn store_in(folder: &PathBuf) -> LocalStore {
    LocalStore::new(folder, &Url::parse("http://mock.api/").unwrap())
}

/// An app, logged in as admin, displaying the week of 2025-03-12 (2025-W11)
async fn admin_app(api: MockTaskApi) -> App<MockTaskApi> {
    let folder = temp_folder();
    let app = App::new(api, store_in(&folder), date(2025, 3, 12));
    app.login(PASSWORD).await.unwrap();
    let _ = std::fs::remove_dir_all(folder);
    app
}

fn names(app: &App<MockTaskApi>) -> Vec<String> {
    app.state().tasks().iter().map(|t| t.name().to_string()).collect()
}


#[tokio::test]
async fn login_and_fetch_sorted_tasks() {
    let _ = env_logger::builder().is_test(true).try_init();

    let api = MockTaskApi::new(PASSWORD);
    api.insert_task("admin", &TaskDraft::new("low", Priority::Low), key("2025-W11"));
    api.insert_task("admin", &TaskDraft::new("high", Priority::High), key("2025-W11"));
    api.insert_task("admin", &TaskDraft::new("other week", Priority::High), key("2025-W12"));
    api.insert_task("admin", &TaskDraft::new("medium", Priority::Medium), key("2025-W11"));

    let app = admin_app(api).await;
    assert!(matches!(app.state().session(), Some(Session::Admin { .. })));
    assert_eq!(names(&app), vec!["high", "medium", "low"]);

    app.next_week().await.unwrap();
    assert_eq!(app.state().current_week_key(), &key("2025-W12"));
    assert_eq!(names(&app), vec!["other week"]);
}

#[tokio::test]
async fn wrong_password() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (sender, receiver) = feedback_channel();
    let folder = temp_folder();
    let app = App::new_with_feedback_channel(MockTaskApi::new(PASSWORD), store_in(&folder), date(2025, 3, 12), sender);

    assert!(app.login("hunter2").await.is_err());
    let state = app.state();
    assert!(state.session().is_none());
    assert!(state.is_logging_in() == false);
    assert_eq!(state.login_error(), Some("Incorrect password. Try again."));
    assert_eq!(*receiver.borrow(), Notice::LoginFailed);
    assert!(store_in(&folder).auth_file().exists() == false);
}

#[tokio::test]
async fn unreachable_server_looks_like_a_wrong_password() {
    let _ = env_logger::builder().is_test(true).try_init();

    let api = MockTaskApi::new(PASSWORD);
    api.behaviour().lock().unwrap().login_behaviour = (0, 1);
    let app = App::new(api, store_in(&temp_folder()), date(2025, 3, 12));

    assert!(app.login(PASSWORD).await.is_err());
    assert_eq!(app.state().login_error(), Some("Incorrect password. Try again."));

    app.login(PASSWORD).await.unwrap();
    assert!(app.state().session().is_some());
}

#[tokio::test]
async fn admin_session_survives_restarts() {
    let _ = env_logger::builder().is_test(true).try_init();

    let folder = temp_folder();
    let app = App::new(MockTaskApi::new(PASSWORD), store_in(&folder), date(2025, 3, 12));
    app.login(PASSWORD).await.unwrap();

    let restarted = App::new(MockTaskApi::new(PASSWORD), store_in(&folder), date(2025, 3, 12));
    let session = restarted.bootstrap().await;
    assert_eq!(session.as_ref().map(|s| s.id()), Some("admin"));
    assert!(restarted.state().session().is_some());

    let _ = std::fs::remove_dir_all(folder);
}

#[tokio::test]
async fn demo_session() {
    let _ = env_logger::builder().is_test(true).try_init();

    let folder = temp_folder();
    let app = App::new(MockTaskApi::new(PASSWORD), store_in(&folder), week_tracker::utils::today());
    app.start_demo().await.unwrap();

    let state = app.state();
    let session_id = state.session().unwrap().id().to_string();
    assert!(session_id.starts_with("demo_"));
    assert!(app.source().has_demo_session(&session_id));
    assert_eq!(state.tasks().len(), 3);
    assert_eq!(state.tasks()[0].priority(), Priority::High);
    assert!(state.tasks().iter().all(|t| t.week_key() == &week_key(week_tracker::utils::today())));

    // The demo session does not outlive its store
    let other_tab = App::new(MockTaskApi::new(PASSWORD), store_in(&folder), date(2025, 3, 12));
    assert_eq!(other_tab.bootstrap().await, None);

    app.logout_demo();
    assert!(app.state().session().is_none());
    assert!(app.state().tasks().is_empty());
}

#[tokio::test]
async fn logout_during_a_slow_fetch() {
    let _ = env_logger::builder().is_test(true).try_init();

    let today = week_tracker::utils::today();
    let app = App::new(MockTaskApi::new(PASSWORD), store_in(&temp_folder()), today);
    app.start_demo().await.unwrap();
    let session_id = app.state().session().unwrap().id().to_string();

    let next_week = week_key(today + chrono::Duration::weeks(1));
    app.source().insert_task(&session_id, &TaskDraft::new("ghost", Priority::High), next_week);
    app.source().set_latency(next_week, Duration::from_millis(200));

    let navigate = app.next_week();
    let logout = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        app.logout_demo();
    };
    let (navigate, ()) = tokio::join!(navigate, logout);
    navigate.unwrap();

    assert!(app.state().session().is_none());
    assert!(app.state().tasks().is_empty());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(app.state().tasks().is_empty());
}

#[tokio::test]
async fn demo_setup_failure_is_a_blocking_alert() {
    let _ = env_logger::builder().is_test(true).try_init();

    let api = MockTaskApi::new(PASSWORD);
    api.behaviour().lock().unwrap().setup_demo_behaviour = (0, 1);
    let (sender, receiver) = feedback_channel();
    let app = App::new_with_feedback_channel(api, store_in(&temp_folder()), date(2025, 3, 12), sender);

    assert!(app.start_demo().await.is_err());
    assert!(app.state().session().is_none());
    assert!(app.state().is_logging_in() == false);
    assert_eq!(*receiver.borrow(), Notice::DemoSetupFailed);
    assert!(receiver.borrow().is_blocking());
}

#[tokio::test]
async fn fetch_failure_keeps_the_list() {
    let _ = env_logger::builder().is_test(true).try_init();

    let api = MockTaskApi::new(PASSWORD);
    api.insert_task("admin", &TaskDraft::new("kept", Priority::Low), key("2025-W11"));
    let app = admin_app(api).await;
    assert_eq!(names(&app), vec!["kept"]);

    app.source().behaviour().lock().unwrap().get_tasks_behaviour = (0, 1);
    app.next_week().await.unwrap();
    assert_eq!(app.state().current_week_key(), &key("2025-W12"));
    assert_eq!(names(&app), vec!["kept"]);
}

#[tokio::test]
async fn create_and_edit_tasks() {
    let _ = env_logger::builder().is_test(true).try_init();

    let app = admin_app(MockTaskApi::new(PASSWORD)).await;

    app.open_editor(None);
    app.save_task(TaskDraft::new("Write report", Priority::Medium).with_notes("due friday")).await.unwrap();
    assert!(app.state().editor().is_none());
    assert_eq!(names(&app), vec!["Write report"]);
    let created = app.state().tasks()[0].clone();
    assert_eq!(created.week_key(), &key("2025-W11"));
    assert_eq!(created.notes(), Some("due friday"));

    app.open_editor(Some(created.clone()));
    assert_eq!(app.state().editor().unwrap().draft.name, "Write report");
    app.save_task(TaskDraft::new("Write the report", Priority::High)).await.unwrap();
    let edited = app.state().tasks()[0].clone();
    assert_eq!(edited.id(), created.id());
    assert_eq!(edited.name(), "Write the report");
    assert_eq!(edited.priority(), Priority::High);
    assert_eq!(app.source().tasks_of("admin").len(), 1);

    app.open_editor(None);
    assert!(app.save_task(TaskDraft::new("   ", Priority::Low)).await.is_err());
}

#[tokio::test]
async fn editing_keeps_changes_made_while_the_editor_is_open() {
    let _ = env_logger::builder().is_test(true).try_init();

    let api = MockTaskApi::new(PASSWORD);
    let task = api.insert_task("admin", &TaskDraft::new("draft", Priority::Low), key("2025-W11"));
    let app = admin_app(api).await;

    app.open_editor(Some(task.clone()));
    app.toggle_complete(task.id()).await.unwrap();
    app.save_task(TaskDraft::new("final", Priority::Low)).await.unwrap();

    let stored = app.source().tasks_of("admin").into_iter().find(|t| t.id() == task.id()).unwrap();
    assert_eq!(stored.name(), "final");
    assert!(stored.completed());
    assert_eq!(stored.completed_week_key(), Some(&key("2025-W11")));
}

#[tokio::test]
async fn unreachable_dates_are_refused() {
    let _ = env_logger::builder().is_test(true).try_init();

    let app = admin_app(MockTaskApi::new(PASSWORD)).await;
    assert!(app.change_week(i64::MAX).await.is_err());
    assert!(app.change_week(i64::MIN).await.is_err());
    assert!(app.change_week(-10_000_000_000).await.is_err());
    assert_eq!(app.state().current_date(), date(2025, 3, 12));

    app.change_week(0).await.unwrap();
    assert_eq!(app.state().direction(), week_tracker::state::Direction::Still);
    app.previous_week().await.unwrap();
    assert_eq!(app.state().current_week_key(), &key("2025-W10"));
}

#[tokio::test]
async fn save_failure_keeps_the_editor_open() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (sender, receiver) = feedback_channel();
    let folder = temp_folder();
    let api = MockTaskApi::new(PASSWORD);
    api.behaviour().lock().unwrap().create_task_behaviour = (0, 1);
    let app = App::new_with_feedback_channel(api, store_in(&folder), date(2025, 3, 12), sender);
    app.login(PASSWORD).await.unwrap();

    app.open_editor(None);
    assert!(app.save_task(TaskDraft::new("Lost?", Priority::Low)).await.is_err());
    assert!(app.state().editor().is_some());
    assert!(matches!(*receiver.borrow(), Notice::SaveFailed { .. }));
    assert!(app.state().tasks().is_empty());

    // The user can simply try again
    app.save_task(TaskDraft::new("Lost?", Priority::Low)).await.unwrap();
    assert!(app.state().editor().is_none());
    assert_eq!(names(&app), vec!["Lost?"]);

    let _ = std::fs::remove_dir_all(folder);
}

#[tokio::test]
async fn toggle_completion() {
    let _ = env_logger::builder().is_test(true).try_init();

    let api = MockTaskApi::new(PASSWORD);
    let first = api.insert_task("admin", &TaskDraft::new("first", Priority::High), key("2025-W11"));
    api.insert_task("admin", &TaskDraft::new("second", Priority::Low), key("2025-W11"));
    let app = admin_app(api).await;

    app.toggle_complete(first.id()).await.unwrap();
    assert_eq!(names(&app), vec!["second", "first"]);
    let stored = app.source().tasks_of("admin").into_iter().find(|t| t.id() == first.id()).unwrap();
    assert!(stored.completed());
    assert_eq!(stored.completed_week_key(), Some(&key("2025-W11")));

    app.toggle_complete(first.id()).await.unwrap();
    assert_eq!(names(&app), vec!["first", "second"]);
    let stored = app.source().tasks_of("admin").into_iter().find(|t| t.id() == first.id()).unwrap();
    assert!(stored.completed() == false);
    assert_eq!(stored.completed_week_key(), None);
}

#[tokio::test]
async fn refused_toggle_is_reverted() {
    let _ = env_logger::builder().is_test(true).try_init();

    let api = MockTaskApi::new(PASSWORD);
    let task = api.insert_task("admin", &TaskDraft::new("stubborn", Priority::Medium), key("2025-W11"));
    let app = admin_app(api).await;

    app.source().behaviour().lock().unwrap().update_task_behaviour = (0, 1);
    assert!(app.toggle_complete(task.id()).await.is_err());
    assert!(app.state().tasks()[0].completed() == false);
}

#[tokio::test]
async fn refused_delete_is_reverted() {
    let _ = env_logger::builder().is_test(true).try_init();

    let api = MockTaskApi::new(PASSWORD);
    let task = api.insert_task("admin", &TaskDraft::new("survivor", Priority::Medium), key("2025-W11"));
    let app = admin_app(api).await;

    // Nothing happens without a confirmation
    app.request_delete(task.clone());
    app.cancel_delete();
    app.confirm_delete().await.unwrap();
    assert_eq!(names(&app), vec!["survivor"]);

    app.source().behaviour().lock().unwrap().delete_task_behaviour = (0, 1);
    app.request_delete(task.clone());
    assert!(app.confirm_delete().await.is_err());
    assert!(app.state().task_to_delete().is_none());
    assert_eq!(names(&app), vec!["survivor"]);

    app.request_delete(task.clone());
    app.confirm_delete().await.unwrap();
    assert!(app.state().tasks().is_empty());
    assert!(app.source().tasks_of("admin").is_empty());
}

#[tokio::test]
async fn latest_navigation_wins() {
    let _ = env_logger::builder().is_test(true).try_init();

    let api = MockTaskApi::new(PASSWORD);
    api.insert_task("admin", &TaskDraft::new("slow week", Priority::Low), key("2025-W12"));
    api.insert_task("admin", &TaskDraft::new("fast week", Priority::Low), key("2025-W13"));
    let app = admin_app(api).await;
    app.source().set_latency(key("2025-W12"), Duration::from_millis(300));

    let slow = app.next_week();
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        app.next_week().await.unwrap();
    };
    let (slow, ()) = tokio::join!(slow, fast);
    slow.unwrap();

    assert_eq!(app.state().current_week_key(), &key("2025-W13"));
    assert_eq!(names(&app), vec!["fast week"]);

    // Even once the slow request would have landed
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(names(&app), vec!["fast week"]);
}

#[tokio::test]
async fn pick_a_week() {
    let _ = env_logger::builder().is_test(true).try_init();

    let api = MockTaskApi::new(PASSWORD);
    api.insert_task("admin", &TaskDraft::new("far away", Priority::High), key("2027-W06"));
    let app = admin_app(api).await;

    // Closing the picker does not move
    app.open_picker();
    app.picker_show_years();
    app.picker_select_year(2030);
    app.close_picker();
    assert!(app.state().picker().is_none());
    assert_eq!(app.state().current_date(), date(2025, 3, 12));

    app.open_picker();
    let picker = app.state().picker().cloned().unwrap();
    assert_eq!(picker.view(), PickerView::Weeks);
    assert_eq!((picker.year(), picker.month()), (2025, 3));

    app.picker_show_years();
    app.picker_select_year(2027);
    assert_eq!(app.state().picker().unwrap().view(), PickerView::Months);
    assert!(app.picker_select_month(0).is_err());
    app.picker_select_month(2).unwrap();

    let weeks = app.state().picker().unwrap().weeks();
    let chosen = weeks[1].range;
    assert_eq!(chosen.monday(), date(2027, 2, 8));
    app.picker_select_week(&chosen).await.unwrap();

    let state = app.state();
    assert!(state.picker().is_none());
    assert_eq!(state.current_date(), date(2027, 2, 8));
    assert_eq!(state.current_week_key(), &key("2027-W06"));
    assert_eq!(names(&app), vec!["far away"]);

    // Once closed, the picker cannot be used anymore
    assert!(app.picker_select_week(&chosen).await.is_err());
}

#[tokio::test]
async fn mock_behaviour_can_fail_everything() {
    let _ = env_logger::builder().is_test(true).try_init();

    let behaviour = std::sync::Arc::new(std::sync::Mutex::new(MockBehaviour::fail_now(1)));
    let api = MockTaskApi::with_behaviour(PASSWORD, behaviour);
    let app = App::new(api, store_in(&temp_folder()), date(2025, 3, 12));

    assert!(app.login(PASSWORD).await.is_err());
    assert!(app.login(PASSWORD).await.is_ok());
}
