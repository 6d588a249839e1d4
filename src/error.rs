//! Error handling types for showtype
//!
//! This module provides the error type shared by the transport, the
//! configuration loader and the session driver. The type-inspection core
//! itself never surfaces these to the user: failures degrade to "show nothing".

use thiserror::Error;

/// Comprehensive error type for showtype operations
#[derive(Debug, Error)]
pub enum ShowTypeError {
    /// Language server process could not be started
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// LSP base protocol framing violation
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// The language server answered with a JSON-RPC error object
    #[error("Remote error {code}: {message}")]
    Remote { code: i64, message: String },

    /// No response arrived within the configured timeout
    #[error("Request '{method}' timed out after {millis}ms")]
    Timeout { method: String, millis: u64 },

    /// The connection went away before a response arrived
    #[error("Connection to language server closed")]
    ConnectionClosed,

    /// The response had an unexpected shape
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// A host event line could not be parsed
    #[error("Invalid event: {message}")]
    InvalidEvent { message: String },
}

/// Result type for showtype operations
pub type ShowTypeResult<T> = Result<T, ShowTypeError>;

/// Helper functions for common error patterns
impl ShowTypeError {
    /// Create a spawn error
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        ShowTypeError::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Create a protocol (framing) error
    pub fn protocol(message: impl Into<String>) -> Self {
        ShowTypeError::Protocol {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(method: impl Into<String>, millis: u64) -> Self {
        ShowTypeError::Timeout {
            method: method.into(),
            millis,
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        ShowTypeError::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        ShowTypeError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid event error
    pub fn invalid_event(message: impl Into<String>) -> Self {
        ShowTypeError::InvalidEvent {
            message: message.into(),
        }
    }

    /// Build a `Remote` error from a JSON-RPC error object.
    ///
    /// Missing fields fall back to code 0 and a placeholder message.
    pub fn from_rpc_error(error: &serde_json::Value) -> Self {
        ShowTypeError::Remote {
            code: error.get("code").and_then(|c| c.as_i64()).unwrap_or(0),
            message: error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("<no message>")
                .to_string(),
        }
    }
}
