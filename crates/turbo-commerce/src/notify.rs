//! Shopper-facing notifications.

use serde::{Deserialize, Serialize};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
}

impl ToastKind {
    /// CSS modifier / ARIA-friendly name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Fire-and-forget notification sink.
pub trait Notifier {
    fn info(&mut self, message: &str);
    fn success(&mut self, message: &str);
}

/// Notifier that records toasts in order, for flashing on the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastLog {
    toasts: Vec<Toast>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded toasts, oldest first.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Take every recorded toast, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    fn push(&mut self, kind: ToastKind, message: &str) {
        self.toasts.push(Toast {
            kind,
            message: message.to_string(),
        });
    }
}

impl Notifier for ToastLog {
    fn info(&mut self, message: &str) {
        self.push(ToastKind::Info, message);
    }

    fn success(&mut self, message: &str) {
        self.push(ToastKind::Success, message);
    }
}
