//! Error types for storefront operations.

use prontoticket_backend::BackendError;
use thiserror::Error;

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Error taxonomy for the storefront core.
///
/// Backend failures keep their own taxonomy (transport / status / shape);
/// the session store adds two failure modes of its own. Reducers never
/// carry these values in state; they surface `to_string()` messages so
/// state stays `Clone` and serializable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorefrontError {
    /// A backend API call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The session store could not be read.
    #[error("Session store unavailable: {0}")]
    SessionStore(String),

    /// The session store was readable but its contents did not parse.
    #[error("Corrupt session data: {0}")]
    CorruptSession(String),
}
