use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by [`EventAccessService`](super::EventAccessService).
///
/// The `Display` text is what callers show to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Database not configured")]
    NotConfigured,

    #[error("{0}")]
    Transport(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("Event not found")]
    NotFound,

    #[error("Invalid event date/time: {0}")]
    InvalidDate(String),
}

impl AccessError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            AccessError::Transport("Unknown error".to_string())
        } else {
            AccessError::Transport(message)
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            AccessError::Timeout(timeout)
        } else {
            AccessError::transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_user_facing_text() {
        assert_eq!(
            AccessError::NotConfigured.to_string(),
            "Database not configured"
        );
        assert_eq!(AccessError::NotFound.to_string(), "Event not found");
        assert_eq!(
            AccessError::Remote {
                status: 400,
                message: "Title is required".to_string()
            }
            .to_string(),
            "Title is required"
        );
        assert_eq!(
            AccessError::Timeout(Duration::from_secs(30)).to_string(),
            "Request timed out after 30s"
        );
    }

    #[test]
    fn test_empty_transport_message_becomes_unknown() {
        assert_eq!(
            AccessError::transport("  ").to_string(),
            "Unknown error"
        );
        assert_eq!(
            AccessError::transport("connection refused").to_string(),
            "connection refused"
        );
    }
}
