//! Transient notifications ("toasts")
//!
//! Each toast owns a timer task that removes it after the configured
//! timeout. Dismissing a toast by hand aborts its timer.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::domain::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
}

struct Entry {
    toast: Toast,
    seq: u64,
    timer: Option<AbortHandle>,
}

struct Inner {
    toasts: DashMap<Uuid, Entry>,
    next_seq: AtomicU64,
    timeout: Duration,
}

/// Cloneable handle shared by every view that reports outcomes.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Notifier {
    pub fn new(timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                toasts: DashMap::new(),
                next_seq: AtomicU64::new(0),
                timeout,
            }),
        }
    }

    /// Show a toast. Must be called from within a tokio runtime.
    pub fn push(&self, message: impl Into<String>, kind: ToastKind) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
        };
        let id = toast.id;
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Toast {} ({:?}): {}", id, kind, toast.message);

        self.inner.toasts.insert(
            id,
            Entry {
                toast,
                seq,
                timer: None,
            },
        );

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let timeout = self.inner.timeout;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(inner) = weak.upgrade() {
                inner.toasts.remove(&id);
            }
        });

        // The timer may already have fired for a zero timeout
        match self.inner.toasts.get_mut(&id) {
            Some(mut entry) => entry.timer = Some(handle.abort_handle()),
            None => handle.abort(),
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(message, ToastKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(message, ToastKind::Info)
    }

    /// Surface a failed action to the user
    pub fn report_error(&self, err: &ClientError) -> Uuid {
        tracing::warn!("Action failed: {}", err);
        self.error(err.user_message())
    }

    /// Manual close. Cancels the auto-dismiss timer.
    pub fn dismiss(&self, id: Uuid) -> bool {
        match self.inner.toasts.remove(&id) {
            Some((_, entry)) => {
                if let Some(timer) = entry.timer {
                    timer.abort();
                }
                true
            }
            None => false,
        }
    }

    /// Live toasts, oldest first
    pub fn toasts(&self) -> Vec<Toast> {
        let mut entries: Vec<(u64, Toast)> = self
            .inner
            .toasts
            .iter()
            .map(|e| (e.seq, e.toast.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, t)| t).collect()
    }

    /// Drop every toast and cancel every timer (teardown)
    pub fn clear(&self) {
        let ids: Vec<Uuid> = self.inner.toasts.iter().map(|e| *e.key()).collect();
        for id in ids {
            self.dismiss(id);
        }
    }
}
