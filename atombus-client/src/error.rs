//! Client error types.

use http::StatusCode;

use atombus_core::CodecError;

/// Errors raised by client operations.
///
/// Argument and state errors are raised before any request is issued; the
/// remaining variants surface transport, status and decoding failures of the
/// one HTTP exchange an operation performs.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ClientError {
    /// A caller-supplied value is missing, empty or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An entity is not in the state the operation requires.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Connection or protocol failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response status is outside the operation's accepted set.
    ///
    /// The body is carried for diagnostics; no result object is produced.
    #[error("unexpected status {status} (expected {expected}): {body}")]
    UnexpectedStatus {
        status: StatusCode,
        expected: StatusCode,
        body: String,
    },

    /// The response could not be decoded into the expected structure.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Create an invalid-argument error.
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        ClientError::InvalidArgument(message.into())
    }

    /// Create an invalid-state error.
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        ClientError::InvalidState(message.into())
    }

    /// Create a transport error.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        ClientError::Transport(message.into())
    }

    /// Create a decode error.
    pub fn decode<S: Into<String>>(message: S) -> Self {
        ClientError::Decode(message.into())
    }

    /// The response status, for unexpected-status failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<CodecError> for ClientError {
    fn from(err: CodecError) -> Self {
        ClientError::Decode(err.to_string())
    }
}
