//! Who is using the tracker

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{ADMIN_SESSION_HOURS, ADMIN_SESSION_ID, DEMO_ID_LENGTH, DEMO_ID_PREFIX};

/// An authenticated session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Session {
    /// A password-authenticated session, valid until `expiry`
    Admin { expiry: DateTime<Utc> },
    /// A sandboxed session, identified by a random id, that does not survive its [`LocalStore`](crate::storage::LocalStore)
    Demo { id: String },
}

impl Session {
    /// A new admin session, starting at `now`
    pub fn admin_from(now: DateTime<Utc>) -> Self {
        Session::Admin { expiry: now + Duration::hours(ADMIN_SESSION_HOURS) }
    }

    /// The id this session is known as by the task API
    pub fn id(&self) -> &str {
        match self {
            Session::Admin { .. } => ADMIN_SESSION_ID,
            Session::Demo { id } => id,
        }
    }

    /// When this session ends, if it ever does
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        match self {
            Session::Admin { expiry } => Some(*expiry),
            Session::Demo { .. } => None,
        }
    }

    pub fn is_demo(&self) -> bool {
        match self {
            Session::Demo { .. } => true,
            _ => false,
        }
    }

    /// Whether this session can still be used at `now`. Demo sessions never expire
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Session::Admin { expiry } => now < *expiry,
            Session::Demo { .. } => true,
        }
    }
}

impl Display for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Session::Admin { expiry } => write!(f, "admin session (until {})", expiry),
            Session::Demo { id } => write!(f, "demo session {}", id),
        }
    }
}

/// Generate a demo session id, e.g. `demo_3f9a0c2b1`
pub fn random_demo_id() -> String {
    let random = Uuid::new_v4().to_simple().to_string();
    format!("{}{}", DEMO_ID_PREFIX, &random[..DEMO_ID_LENGTH])
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_ids() {
        let id = random_demo_id();
        assert!(id.starts_with("demo_"));
        assert_eq!(id.len(), "demo_".len() + 9);
        assert!(id["demo_".len()..].chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_uppercase()));
        assert_ne!(id, random_demo_id());
    }

    #[test]
    fn session_ids() {
        let now = Utc::now();
        let admin = Session::admin_from(now);
        assert_eq!(admin.id(), "admin");
        assert!(admin.is_valid_at(now + Duration::hours(23)));
        assert!(admin.is_valid_at(now + Duration::hours(24)) == false);

        let demo = Session::Demo { id: "demo_abc".to_string() };
        assert_eq!(demo.id(), "demo_abc");
        assert!(demo.is_demo());
        assert!(demo.is_valid_at(now + Duration::days(1000)));
    }
}
