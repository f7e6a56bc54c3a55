//! Error types for the backend API client

use thiserror::Error;

/// Errors that can occur when talking to the ProntoTicket backend
///
/// The taxonomy mirrors the three ways a call site can fail: the request
/// never completed, the backend answered with a non-success status, or the
/// body did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Network or transport failure; the request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// Backend answered with a non-success HTTP status
    ///
    /// The body is carried along because the payment endpoint returns its
    /// error message as plain text.
    #[error("Backend returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body text
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}
