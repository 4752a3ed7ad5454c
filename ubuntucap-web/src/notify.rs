//! The toast notice board.

use std::rc::Rc;
use strum::Display;
use yewdux::{Context, Dispatch, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeLevel {
    /// daisyUI alert class.
    #[must_use]
    pub fn alert_class(self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Error => "alert-error",
            Self::Warning => "alert-warning",
            Self::Info => "alert-info",
        }
    }
}

/// A toast message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Toasts waiting to be shown, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Store)]
pub struct NoticeQueue {
    next_id: u64,
    pub notices: Vec<Notice>,
}

/// Writes to the [`NoticeQueue`]. The toast component dismisses each notice
/// after the configured delay.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    dispatch: Dispatch<NoticeQueue>,
}

impl NoticeBoard {
    pub fn new(cx: &Context) -> Self {
        Self {
            dispatch: Dispatch::new(cx),
        }
    }

    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        let message = message.into();
        tracing::debug!(%level, %message, "notice");
        self.dispatch.reduce_mut(|queue| {
            let id = queue.next_id;
            queue.next_id += 1;
            queue.notices.push(Notice { id, level, message });
            id
        })
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Warning, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Info, message)
    }

    /// Removes notice `id`. Subscribers are not notified when it is already gone.
    pub fn dismiss(&self, id: u64) {
        if !self.dispatch.get().notices.iter().any(|notice| notice.id == id) {
            return;
        }
        self.dispatch
            .reduce_mut(|queue| queue.notices.retain(|notice| notice.id != id));
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.dispatch.get().notices.clone()
    }

    /// Current queue without copying it.
    pub fn queue(&self) -> Rc<NoticeQueue> {
        self.dispatch.get()
    }
}
