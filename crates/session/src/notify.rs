//! Fire-and-forget user notification sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    Success,
    Info,
    Error,
}

/// A user-facing toast/log message.
///
/// Not part of the state contract; emitted alongside transitions for UI
/// feedback only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    fn new(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotifyLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotifyLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotifyLevel::Error, message)
    }
}

/// Notification sink port.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Notifier that forwards to the process tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotifyLevel::Success | NotifyLevel::Info => {
                tracing::info!(message = %notification.message, "notification");
            }
            NotifyLevel::Error => {
                tracing::error!(message = %notification.message, "notification");
            }
        }
    }
}
