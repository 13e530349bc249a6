use std::sync::Mutex;

use serde::Serialize;
use ts_rs::TS;

/// A single user-visible notification. The UI shell decides how to render it
/// (toast, banner, OS notification).
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub kind: ToastKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// Sink for user-visible notifications. Injected into `SettingsApp` so the
/// UI shell owns the delivery channel.
pub trait Notify: Send + Sync {
    fn toast(&self, toast: Toast);
}

/// Logs toasts through tracing. Useful for headless runs and as a default.
pub struct LogNotifier;

impl Notify for LogNotifier {
    fn toast(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => tracing::info!(title = %toast.title, "{}", toast.body),
            ToastKind::Error => tracing::warn!(title = %toast.title, "{}", toast.body),
        }
    }
}

/// Buffers toasts for the UI shell to drain on its next tick.
#[derive(Default)]
pub struct QueueNotifier {
    queue: Mutex<Vec<Toast>>,
}

impl QueueNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending toasts, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        match self.queue.lock() {
            Ok(mut q) => q.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Notify for QueueNotifier {
    fn toast(&self, toast: Toast) {
        if let Ok(mut q) = self.queue.lock() {
            q.push(toast);
        }
    }
}

// ---------------------------------------------------------------------------
// Public notification helpers
// ---------------------------------------------------------------------------

pub fn notify_settings_saved(notifier: &dyn Notify) {
    send(
        notifier,
        ToastKind::Success,
        "Settings Saved",
        "Agent environment and credentials updated.",
    );
}

pub fn notify_settings_save_failed(notifier: &dyn Notify, detail: &str) {
    send(
        notifier,
        ToastKind::Error,
        "Save Failed",
        &format!("Settings were not saved: {}", detail),
    );
}

pub fn notify_invalid_settings(notifier: &dyn Notify) {
    send(
        notifier,
        ToastKind::Error,
        "Invalid Settings",
        "Fix the highlighted JSON fields before saving.",
    );
}

// ---------------------------------------------------------------------------
// Low-level send
// ---------------------------------------------------------------------------

fn send(notifier: &dyn Notify, kind: ToastKind, title: &str, body: &str) {
    notifier.toast(Toast {
        title: title.to_string(),
        body: body.to_string(),
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_notifier_drains_in_order() {
        let notifier = QueueNotifier::new();
        notify_invalid_settings(&notifier);
        notify_settings_saved(&notifier);

        let toasts = notifier.drain();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[1].kind, ToastKind::Success);
        assert!(notifier.drain().is_empty());
    }

    #[test]
    fn test_save_failed_includes_detail() {
        let notifier = QueueNotifier::new();
        notify_settings_save_failed(&notifier, "profile endpoint returned 503");

        let toasts = notifier.drain();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].body.contains("503"));
    }
}
