//! Support for library configuration options

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// Environment variable that sets the initial value of [`API_URL`]
pub const API_URL_VAR: &str = "WEEK_TRACKER_API_URL";
/// Environment variable that sets the initial value of [`DATA_FOLDER`]
pub const DATA_FOLDER_VAR: &str = "WEEK_TRACKER_DATA_DIR";

/// Base URL of the task API.
/// Defaults to `$WEEK_TRACKER_API_URL`, or to a local server. Feel free to override it when initing this library.
pub static API_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new(
    env_or(API_URL_VAR, "http://localhost:5000")
)));

/// Folder where client-local state (the admin auth marker) is persisted.
/// Defaults to `$WEEK_TRACKER_DATA_DIR`, or to `.week-tracker` in the working directory.
pub static DATA_FOLDER: Lazy<Arc<Mutex<PathBuf>>> = Lazy::new(|| Arc::new(Mutex::new(
    PathBuf::from(env_or(DATA_FOLDER_VAR, ".week-tracker"))
)));

/// How long a password login lasts
pub const ADMIN_SESSION_HOURS: i64 = 24;
/// The session id the task API expects for admin sessions
pub const ADMIN_SESSION_ID: &str = "admin";
/// Prefix of every demo session id
pub const DEMO_ID_PREFIX: &str = "demo_";
/// Count of random characters after [`DEMO_ID_PREFIX`]
pub const DEMO_ID_LENGTH: usize = 9;
/// How many years the year picker lists
pub const PICKER_YEAR_COUNT: i32 = 12;
/// How many of them come before the current picker year
pub const PICKER_YEARS_BEFORE: i32 = 4;

fn env_or(var: &str, default: &str) -> String {
    match std::env::var(var) {
        Ok(value) => value,
        Err(_) => {
            log::debug!("{} not set, using default: {}", var, default);
            default.to_string()
        }
    }
}

/// The current value of [`API_URL`]
pub fn api_url() -> String {
    match API_URL.lock() {
        Ok(url) => url.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// The current value of [`DATA_FOLDER`]
pub fn data_folder() -> PathBuf {
    match DATA_FOLDER.lock() {
        Ok(folder) => folder.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
