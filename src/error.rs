//! Errors returned by this crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected HTTP status code {status} for {url}")]
    UnexpectedStatus { status: reqwest::StatusCode, url: String },

    #[error("Invalid week key {0:?}")]
    InvalidWeekKey(String),

    #[error("Invalid month {0} (expected 1 to 12)")]
    InvalidMonth(u32),

    #[error("Cannot move {days} days away from {date}")]
    DateOutOfRange { date: chrono::NaiveDate, days: i64 },

    #[error("No active session")]
    NoSession,

    #[error("No task with id {0}")]
    UnknownTask(crate::task::TaskId),

    #[error("Invalid task: {0}")]
    InvalidDraft(&'static str),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
