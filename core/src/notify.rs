//! User-facing notifications (toasts).
//!
//! The client layer reports every operation outcome through an injected
//! `Notifier` instead of reaching for a global toast API, so hosts decide how
//! messages are shown and tests can observe them.

use std::fmt;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Forwards notifications to `tracing` under the `toast` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => tracing::info!(target: "toast", "{}", notification.message),
            Level::Error => tracing::warn!(target: "toast", "{}", notification.message),
        }
    }
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == Level::Error)
            .collect()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
