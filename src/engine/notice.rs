//! User-facing notices

use std::sync::Mutex;

/// Shows a blocking message to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Prints notices to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Keeps notices until someone drains them
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<String>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything collected so far
    pub fn take(&self) -> Vec<String> {
        self.notices
            .lock()
            .map(|mut notices| std::mem::take(&mut *notices))
            .unwrap_or_default()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(message.to_string());
        }
    }
}
