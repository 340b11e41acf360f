use std::time::{Duration, Instant};

/// How long a status banner stays visible
pub const STATUS_TTL: Duration = Duration::from_secs(5);

/// Status message type
#[derive(Debug, Clone, PartialEq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Transient status banner
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub created_at: Instant,
}

impl StatusMessage {
    fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, StatusKind::Info)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, StatusKind::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, StatusKind::Error)
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }

    /// Check if message is still visible
    pub fn is_valid(&self) -> bool {
        self.created_at.elapsed() < STATUS_TTL
    }
}
