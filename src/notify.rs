use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Sink for user-visible notifications. Fire and forget.
pub trait Notifier: Send + Sync {
    fn add_toast_with_timeout(&self, kind: ToastKind, message: &str);
}

/// Toast list that drops each toast once its timeout elapses.
///
/// Must be used from within a Tokio runtime; expiry runs on a spawned task.
#[derive(Clone)]
pub struct Toasts {
    list: Store<Vec<Toast>>,
    next_id: Arc<AtomicU64>,
    timeout: Duration,
}

impl Toasts {
    pub fn new(timeout: Duration) -> Self {
        Self {
            list: Store::default(),
            next_id: Arc::new(AtomicU64::new(1)),
            timeout,
        }
    }

    pub fn current(&self) -> Vec<Toast> {
        self.list.get()
    }

    pub fn store(&self) -> &Store<Vec<Toast>> {
        &self.list
    }

    pub fn dismiss(&self, id: u64) {
        self.list.update(|toasts| toasts.retain(|t| t.id != id));
    }
}

impl Notifier for Toasts {
    fn add_toast_with_timeout(&self, kind: ToastKind, message: &str) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.list.update(|toasts| {
            toasts.push(Toast {
                id,
                kind,
                message: message.to_string(),
            });
        });

        match kind {
            ToastKind::Success => tracing::info!(id, message, "toast"),
            ToastKind::Error => tracing::warn!(id, message, "toast"),
        }

        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(this.timeout).await;
            this.dismiss(id);
        });
    }
}
