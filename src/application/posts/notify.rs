use std::time::Duration;

use uuid::Uuid;

const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(6000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn as_variant(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

/// A transient user-facing notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub text: String,
    pub ttl: Duration,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self::with_kind(ToastKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::with_kind(ToastKind::Error, text)
    }

    fn with_kind(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            text: text.into(),
            ttl: DEFAULT_TOAST_TTL,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}
