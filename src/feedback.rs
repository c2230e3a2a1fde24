//! Utilities to report outcomes to the user

use std::fmt::{Display, Error, Formatter};

/// Something the user should be told about
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Nothing to report
    None,
    /// The password was refused, or the server could not be reached
    LoginFailed,
    /// The demo sandbox could not be created. This is a blocking alert
    DemoSetupFailed,
    /// A task could not be saved. The editor stays open
    SaveFailed { details: String },
    /// A delete or a completion toggle failed, and the week has been re-fetched
    ChangeReverted { details: String },
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Notice::None => Ok(()),
            Notice::LoginFailed => write!(f, "Incorrect password. Try again."),
            Notice::DemoSetupFailed => write!(f, "Unable to create the demo environment."),
            Notice::SaveFailed{details} => write!(f, "Unable to save the task ({})", details),
            Notice::ChangeReverted{details} => write!(f, "Your change could not be saved ({})", details),
        }
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::None
    }
}

impl Notice {
    /// Whether the front-end should block until the user acknowledges this notice
    pub fn is_blocking(&self) -> bool {
        match self {
            Notice::DemoSetupFailed => true,
            _ => false,
        }
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<Notice>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<Notice>;

/// Create a feeback channel, that can be used to retrieve the latest notice of an [`App`](crate::app::App)
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(Notice::default())
}



/// A structure that logs the outcomes of the operations of an `App`, and forwards notices to a listener (if any)
pub struct Feedback {
    channel: Option<FeedbackSender>,
}
impl Feedback {
    pub fn new() -> Self {
        Self { channel: None }
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { channel: Some(channel) }
    }

    /// Log an error, and tell the user about it
    pub fn error(&self, notice: Notice) {
        log::error!("{}", notice);
        self.send(notice);
    }
    /// Log a warning, and tell the user about it
    pub fn warn(&self, notice: Notice) {
        log::warn!("{}", notice);
        self.send(notice);
    }
    /// Clear the current notice
    pub fn clear(&self) {
        self.send(Notice::None);
    }

    fn send(&self, notice: Notice) {
        if let Some(sender) = &self.channel {
            sender.send_replace(notice);
        }
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new()
    }
}
