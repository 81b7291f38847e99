//! Client error types.

use http::StatusCode;
use thiserror::Error;

/// Result type alias for workflow service calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the workflow service client.
///
/// HTTP failures (including 401/403 from an auth proxy) come back as
/// [`ClientError::Http`] with the status and body exactly as the server sent
/// them.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid request URI: {0}")]
    InvalidUri(String),

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tls error: {0}")]
    Tls(String),

    #[error("transport error: {0}")]
    Transport(#[from] hyper::Error),

    #[error("request to {uri} timed out after {timeout_ms}ms")]
    Timeout { uri: String, timeout_ms: u128 },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("server returned {status}: {body}")]
    Http { status: StatusCode, body: String },
}

impl ClientError {
    /// The HTTP status, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401 / 403 responses.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}
