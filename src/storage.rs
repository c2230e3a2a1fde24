//! This module persists the client-local state: which session is active.
//!
//! * an admin login leaves an "auth marker" (its expiry date) in a file, so that it survives restarts
//! * a demo session id only lives in memory, as long as the [`LocalStore`] (the equivalent of a browser tab)

use std::path::{Path, PathBuf};
use std::error::Error;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use url::Url;

use crate::session::Session;

const AUTH_FILE_PREFIX: &str = "auth";

/// The content of the auth marker file
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct AuthMarker {
    expiry: DateTime<Utc>,
}

/// Client-local storage for the current session
#[derive(Debug)]
pub struct LocalStore {
    auth_file: PathBuf,
    demo_id: Option<String>,
}

impl LocalStore {
    /// Create a store that keeps its auth marker in `folder`.
    ///
    /// Each API server gets its own marker file, so that logging into a server does not log into another one
    pub fn new(folder: &Path, api_url: &Url) -> Self {
        let host = api_url.host_str().unwrap_or("local");
        let file_name = match api_url.port() {
            None => format!("{}-{}.json", AUTH_FILE_PREFIX, host),
            Some(port) => format!("{}-{}-{}.json", AUTH_FILE_PREFIX, host, port),
        };
        Self {
            auth_file: folder.join(sanitize_filename::sanitize(file_name)),
            demo_id: None,
        }
    }

    /// The file the auth marker is stored into
    pub fn auth_file(&self) -> &Path {
        &self.auth_file
    }

    /// Read the auth marker, if any
    fn load_auth_marker(&self) -> Result<Option<AuthMarker>, Box<dyn Error>> {
        if self.auth_file.exists() == false {
            return Ok(None);
        }
        let file = match std::fs::File::open(&self.auth_file) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", self.auth_file, err).into());
            },
            Ok(file) => file,
        };
        Ok(Some(serde_json::from_reader(file)?))
    }

    /// Persist an admin login
    pub fn save_admin(&self, expiry: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
        if let Some(folder) = self.auth_file.parent() {
            std::fs::create_dir_all(folder)?;
        }
        let file = std::fs::File::create(&self.auth_file)?;
        serde_json::to_writer(file, &AuthMarker{ expiry })?;
        log::debug!("Saved auth marker to {:?}", self.auth_file);
        Ok(())
    }

    /// Forget an admin login
    pub fn clear_admin(&self) {
        if self.auth_file.exists() {
            if let Err(err) = std::fs::remove_file(&self.auth_file) {
                log::warn!("Unable to remove {:?}: {}", self.auth_file, err);
            }
        }
    }

    /// Remember the demo session id for as long as this store lives
    pub fn set_demo(&mut self, id: String) {
        self.demo_id = Some(id);
    }

    pub fn clear_demo(&mut self) {
        self.demo_id = None;
    }

    /// Restore the session that was active before.
    ///
    /// A valid admin marker wins over a demo session. An expired (or unreadable) admin marker is removed.
    pub fn restore(&self, now: DateTime<Utc>) -> Option<Session> {
        match self.load_auth_marker() {
            Ok(Some(marker)) => {
                let session = Session::Admin { expiry: marker.expiry };
                if session.is_valid_at(now) {
                    log::info!("Restored an admin session");
                    return Some(session);
                }
                log::info!("Admin session has expired");
                self.clear_admin();
            },
            Ok(None) => (),
            Err(err) => {
                log::warn!("Invalid auth marker: {}. Removing it", err);
                self.clear_admin();
            },
        }

        self.demo_id.as_ref().map(|id| {
            log::info!("Restored demo session {}", id);
            Session::Demo { id: id.clone() }
        })
    }
}
