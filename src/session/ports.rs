//! Ports injected into a summarization session
//!
//! The session never touches the terminal, filesystem or clipboard directly.
//! Each side effect goes through one of these traits. The in-memory
//! implementations share their state through `Arc` so a test can keep a
//! handle while the session owns the port.

use crate::errors::Result;
use crate::session::state::RequestState;
use std::sync::{Arc, Mutex};

/// Addressable location of the current summary
pub trait Navigator: Send + Sync {
    /// Replace the current location with `path` (e.g. `/2023/01/31/example`)
    fn replace(&self, path: &str) -> Result<()>;

    /// Current location, if any was recorded
    fn current(&self) -> Result<Option<String>>;

    /// Forget the current location
    fn clear(&self) -> Result<()>;
}

/// Transient user notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Copy target for links and summaries
pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}

/// Surface the summary is drawn on
pub trait DisplaySurface: Send + Sync {
    /// Request state flipped; show the prompt or a busy indicator
    fn state_changed(&self, state: RequestState);

    /// Accumulated summary text after a chunk
    fn publish(&self, text: &str);
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// One toast-style message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub icon: Option<String>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
            icon: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Navigator that keeps the location in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryNavigator {
    location: Arc<Mutex<Option<String>>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(path: impl Into<String>) -> Self {
        Self {
            location: Arc::new(Mutex::new(Some(path.into()))),
        }
    }
}

impl Navigator for MemoryNavigator {
    fn replace(&self, path: &str) -> Result<()> {
        if let Ok(mut location) = self.location.lock() {
            *location = Some(path.to_string());
        }
        Ok(())
    }

    fn current(&self) -> Result<Option<String>> {
        Ok(self.location.lock().ok().and_then(|l| l.clone()))
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut location) = self.location.lock() {
            *location = None;
        }
        Ok(())
    }
}

/// Notifier that records every notification
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

/// Clipboard that keeps the last copied text
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        if let Ok(mut contents) = self.contents.lock() {
            *contents = Some(text.to_string());
        }
        Ok(())
    }
}

/// Display that records every frame it is given
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    frames: Arc<Mutex<Vec<String>>>,
    states: Arc<Mutex<Vec<RequestState>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated text as published after each chunk
    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    /// Every state change seen, in order
    pub fn states(&self) -> Vec<RequestState> {
        self.states.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn state_changed(&self, state: RequestState) {
        if let Ok(mut states) = self.states.lock() {
            states.push(state);
        }
    }

    fn publish(&self, text: &str) {
        if let Ok(mut frames) = self.frames.lock() {
            frames.push(text.to_string());
        }
    }
}
