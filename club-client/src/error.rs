//! Client error types
//!
//! Two layers: [`RemoteError`] is what a [`Remote`](crate::remote::Remote)
//! implementation reports for a single backend call, [`ClientError`] is the
//! taxonomy the facade converts it into. Views and the session context only
//! ever see `ClientError`.

use thiserror::Error;

use crate::session::OperationKind;

/// Raw failure of one backend call
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// Request never produced a response (DNS, TLS, timeout, connection reset)
    #[error("transport error: {0}")]
    Transport(String),

    /// Backend answered with an error body
    #[error("{message} ({kind}, HTTP {code})")]
    Api {
        code: u16,
        /// Backend error type, e.g. `user_invalid_credentials`
        kind: String,
        message: String,
    },

    /// Response body was not valid JSON
    #[error("decode error: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn api(code: u16, kind: impl Into<String>, message: impl Into<String>) -> Self {
        RemoteError::Api {
            code,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}

/// Client error type
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Bad credentials, duplicate account, weak password or missing session
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend unreachable
    #[error("Network error: {0}")]
    Network(String),

    /// Backend rejected the request for another reason
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Payload did not match the expected row shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Operation needs a signed-in member
    #[error("Not signed in")]
    NotAuthenticated,

    /// Same kind of session command is already queued or running
    #[error("{0} already in progress")]
    InFlight(OperationKind),

    /// Client could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Maps a failure of an account/session call.
    ///
    /// Every API answer from the auth service is an authentication problem
    /// from the user's point of view (wrong password, email taken, password
    /// too weak), so they all become [`ClientError::Auth`].
    pub fn from_auth(err: RemoteError) -> Self {
        match err {
            RemoteError::Api { message, .. } => ClientError::Auth(message),
            other => other.into(),
        }
    }

    /// Text shown inline to the user
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Auth(message) | ClientError::Rejected(message) => message.clone(),
            ClientError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ClientError::NotAuthenticated => "You must be logged in to see this page.".to_string(),
            ClientError::InFlight(_) => "Please wait for the current request to finish.".to_string(),
            _ => "Something went wrong.".to_string(),
        }
    }
}

impl From<RemoteError> for ClientError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Transport(message) => ClientError::Network(message),
            RemoteError::Decode(message) => ClientError::InvalidResponse(message),
            RemoteError::Api { code: 401, message, .. } => ClientError::Auth(message),
            RemoteError::Api { code: 404, message, .. } => ClientError::NotFound(message),
            RemoteError::Api { message, .. } => ClientError::Rejected(message),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type for raw backend calls
pub type RemoteResult<T> = Result<T, RemoteError>;
