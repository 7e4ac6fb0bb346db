//! Client-side error type
//!
//! Every backend and Open Library call funnels its failures through
//! [`ClientError`]. The views decide which of these are shown to the user
//! and which are silently degraded.

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend rejected the passcode.
    #[error("invalid passcode")]
    InvalidCredential,

    /// A mutation was attempted without a session token.
    #[error("no session token")]
    Unauthenticated,

    /// The server answered with a non-2xx status.
    #[error("{context}: server returned {status}")]
    Status {
        status: StatusCode,
        context: &'static str,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
