//! Notification sink trait for delivering messages

use async_trait::async_trait;

/// Telegram rejects `sendMessage` text longer than this many characters
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Why a message was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    StatusChange,
    FailureAlert,
}

/// Record of a delivery attempt
#[derive(Debug, Clone)]
pub struct NotificationRecord {
    pub kind: NotificationKind,
    pub message: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Trait for delivering a rendered message to the single recipient
#[async_trait]
pub trait NotificationSink: Send + Sync + std::fmt::Debug {
    /// Get the sink type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Deliver `message` once. No retries; failures surface as
    /// [`crate::ReviewError::Delivery`].
    async fn send(&self, message: &str) -> crate::Result<()>;
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `…`
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
