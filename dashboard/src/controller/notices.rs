//! Transient user notifications ("toasts")

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A dismissible message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Sink for user notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: String);
}

impl dyn Notifier {
    pub fn success(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Success, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Error, message.into());
    }
}

/// Bounded queue of notices waiting to be shown. The oldest notice is
/// dropped when the queue is full.
pub struct ToastQueue {
    notices: Mutex<VecDeque<Notice>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl ToastQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            notices: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
            capacity: capacity.max(1),
        }
    }

    /// Take every pending notice, oldest first
    pub fn drain(&self) -> Vec<Notice> {
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        notices.drain(..).collect()
    }

    /// Pending notices, oldest first, without removing them
    pub fn pending(&self) -> Vec<Notice> {
        let notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        notices.iter().cloned().collect()
    }

    /// Dismiss a single notice. Returns whether it was still pending.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        let before = notices.len();
        notices.retain(|n| n.id != id);
        notices.len() != before
    }

    pub fn len(&self) -> usize {
        let notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, level: NoticeLevel, message: String) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        while notices.len() >= self.capacity {
            notices.pop_front();
        }
        notices.push_back(Notice { id, level, message });
    }
}
