//! Errors raised by the client while talking to the queue server.

use thiserror::Error;

/// Everything that can go wrong in a user action or a poll cycle.
///
/// None of these escape the event loop: each is turned into a status
/// message (or a log line) where the action or cycle started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The request never produced an HTTP response.
    #[error("request to {path} failed: {detail}")]
    Transport { path: String, detail: String },

    /// Non-success HTTP status. `message` is the body's `error` field.
    #[error("{path} returned HTTP {status}{}", suffix(.message))]
    Server {
        path: String,
        status: u16,
        message: Option<String>,
    },

    /// The body did not have the expected shape.
    #[error("unexpected response from {path}: {detail}")]
    Decode { path: String, detail: String },

    #[error("{0}")]
    Submission(String),

    #[error("{0}")]
    Deletion(String),
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ClientError {
    pub(crate) fn transport(path: &str, err: reqwest::Error) -> Self {
        Self::Transport {
            path: path.to_string(),
            detail: err.to_string(),
        }
    }

    pub(crate) fn decode(path: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.to_string(),
            detail: err.to_string(),
        }
    }

    /// The server-supplied `error` text, if this error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display_includes_body_message() {
        let err = ClientError::Server {
            path: "/api/status".into(),
            status: 500,
            message: Some("disk full".into()),
        };
        assert_eq!(err.to_string(), "/api/status returned HTTP 500: disk full");
        assert_eq!(err.server_message(), Some("disk full"));

        let bare = ClientError::Server {
            path: "/api/status".into(),
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "/api/status returned HTTP 502");
    }

    #[test]
    fn user_facing_variants_display_verbatim() {
        assert_eq!(
            ClientError::Validation("Please enter a URL.".into()).to_string(),
            "Please enter a URL."
        );
        assert_eq!(ClientError::Deletion("locked".into()).to_string(), "locked");
    }
}
