//! Client error taxonomy
//!
//! Every failure a user action can hit ends up as one of these variants.
//! None of them are retried: the host surfaces them as a transient
//! notification and waits for the user to try again.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Connectivity or transport failure before a response arrived
    Network(String),
    /// Non-2xx response, carrying the server message when there was one
    Api { status: u16, message: String },
    /// Rejected credentials, or a missing/expired session token
    Unauthorized(String),
    /// Client-side form validation failure
    Validation(String),
    /// Payload or response body that could not be understood
    Decode(String),
    /// Camera or scanner failure
    Scanner(String),
    /// Token store I/O failure
    Storage(String),
}

impl ClientError {
    /// Text shown to the user in an error toast.
    ///
    /// Business-rule rejections from the server ("book unavailable",
    /// "already borrowed") are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Network(_) => "Could not reach the library server.".into(),
            ClientError::Unauthorized(msg)
            | ClientError::Validation(msg)
            | ClientError::Decode(msg)
            | ClientError::Scanner(msg)
            | ClientError::Storage(msg) => msg.clone(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Api { status, message } => write!(f, "API error {}: {}", status, message),
            ClientError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ClientError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ClientError::Decode(msg) => write!(f, "Decode error: {}", msg),
            ClientError::Scanner(msg) => write!(f, "Scanner error: {}", msg),
            ClientError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}
