use thiserror::Error;

pub const TRANSPORT_ERROR_MESSAGE: &str = "Could not reach the server, check your connection";

/// Coarse classification used by callers to decide how to react to a
/// failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The request never produced an HTTP response.
    Transport,
    /// Missing or expired session.
    Unauthorized,
    /// The server rejected the request with a message meant for the user.
    Validation,
    Unexpected,
}

/// Error returned by every remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
    kind: ApiErrorKind,
    server_message: bool,
}

impl ApiError {
    pub fn transport() -> Self {
        Self {
            status: None,
            message: TRANSPORT_ERROR_MESSAGE.to_string(),
            kind: ApiErrorKind::Transport,
            server_message: false,
        }
    }

    /// A rejection by the server carrying a message the server wrote.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            kind: kind_for_status(status),
            server_message: true,
        }
    }

    /// A failure that is neither a transport problem nor a rejection by the
    /// server, e.g. an undecodable body on a successful response.
    pub fn unexpected(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            kind: ApiErrorKind::Unexpected,
            server_message: false,
        }
    }

    /// Builds the error for a non-success response, preferring the message
    /// carried by the server's JSON error payload.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        match extract_server_message(body) {
            Some(message) => Self::with_status(status, message),
            None => Self::generic(status),
        }
    }

    fn generic(status: u16) -> Self {
        Self {
            status: Some(status),
            message: format!("Request failed with status {}", status),
            kind: kind_for_status(status),
            server_message: false,
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    /// False when `message` is a fallback written by the client.
    pub fn has_server_message(&self) -> bool {
        self.server_message
    }
}

fn kind_for_status(status: u16) -> ApiErrorKind {
    match status {
        401 | 419 | 440 => ApiErrorKind::Unauthorized,
        400..=499 => ApiErrorKind::Validation,
        _ => ApiErrorKind::Unexpected,
    }
}

fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .filter_map(|key| value.get(key))
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::generic(status.as_u16()),
            None => Self::transport(),
        }
    }
}
