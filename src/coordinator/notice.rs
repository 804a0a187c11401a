use crate::api::{ApiError, ErrorKind};

/// Transient user-facing message published when a write is rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: ErrorKind,
    pub message: String,
}

impl Notice {
    pub fn failed(action: &str, err: &ApiError) -> Self {
        let message = match err.kind() {
            ErrorKind::Transport => format!("Couldn't {}. Check your connection.", action),
            _ => format!("Couldn't {}: {}", action, err),
        };
        Self {
            kind: err.kind(),
            message,
        }
    }
}
